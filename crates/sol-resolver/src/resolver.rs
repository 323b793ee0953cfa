//! Enum resolution over compiled artifacts.
//!
//! Given a contract name, the resolver follows the artifact back to the build
//! that produced it, re-parses the exact source text that was compiled, and
//! reads the enum declaration out of the syntax tree:
//!
//! ```text
//! contract ──read_artifact──▶ sourceName
//!          ──get_build_info─▶ input.sources[sourceName].content
//!          ──parse──────────▶ SourceUnit ──walk──▶ first `enum <name>`
//! ```

use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use sol_artifacts::ArtifactStore;
use sol_parser::{collect_enums, find_enum, SolidityParser, SourceParser, SourceUnit};
use sol_sandbox_types::{EnumIndexMapping, FullyQualifiedName};

use crate::error::ResolveError;

/// An enum declaration together with its index mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclaredEnum {
    pub name: String,
    pub mapping: EnumIndexMapping,
}

/// Resolves enum declarations of compiled contracts.
///
/// Holds no state between calls; every call re-reads and re-parses.
pub struct EnumResolver<S: ?Sized, P = SolidityParser> {
    store: Arc<S>,
    parser: P,
}

impl<S: ArtifactStore + ?Sized> EnumResolver<S, SolidityParser> {
    /// A resolver using the built-in Solidity parser.
    pub fn with_store(store: Arc<S>) -> Self {
        Self::new(store, SolidityParser)
    }
}

impl<S, P> EnumResolver<S, P>
where
    S: ArtifactStore + ?Sized,
    P: SourceParser,
{
    pub fn new(store: Arc<S>, parser: P) -> Self {
        Self { store, parser }
    }

    /// The artifact store this resolver reads from.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Resolve `enum_name` in the source file that `contract` was compiled from.
    ///
    /// The first declaration with that name in traversal order wins.
    pub async fn resolve_enum(
        &self,
        contract: &str,
        enum_name: &str,
    ) -> Result<EnumIndexMapping, ResolveError> {
        let (fqn, unit) = self.load_source(contract).await?;

        match find_enum(&unit, enum_name) {
            Some(definition) => {
                debug!(
                    contract,
                    enum_name,
                    source_name = %fqn.source_name,
                    members = definition.members.len(),
                    "resolved enum"
                );
                Ok(definition.index_mapping())
            }
            None => {
                debug!(contract, enum_name, source_name = %fqn.source_name, "enum not found");
                Err(ResolveError::NotFound {
                    contract: contract.to_string(),
                    enum_name: enum_name.to_string(),
                })
            }
        }
    }

    /// Every enum declared in `contract`'s source file, in traversal order.
    pub async fn declared_enums(&self, contract: &str) -> Result<Vec<DeclaredEnum>, ResolveError> {
        let (fqn, unit) = self.load_source(contract).await?;
        let enums: Vec<DeclaredEnum> = collect_enums(&unit)
            .into_iter()
            .map(|definition| DeclaredEnum {
                name: definition.name.clone(),
                mapping: definition.index_mapping(),
            })
            .collect();
        debug!(contract, source_name = %fqn.source_name, count = enums.len(), "listed enums");
        Ok(enums)
    }

    async fn load_source(
        &self,
        contract: &str,
    ) -> Result<(FullyQualifiedName, SourceUnit), ResolveError> {
        let artifact = self.store.read_artifact(contract).await?;
        let fqn = FullyQualifiedName::new(&artifact.source_name, &artifact.contract_name);
        debug!(contract, fqn = %fqn, "found artifact");

        let build_info = self.store.get_build_info(&fqn).await?;
        debug!(contract, build_info = %build_info.id, "found build info");

        let source = build_info.source_content(&fqn.source_name)?;
        let unit = self.parser.parse(source)?;
        debug!(contract, source_name = %fqn.source_name, items = unit.items.len(), "parsed source");
        Ok((fqn, unit))
    }
}

impl<S: ?Sized, P: std::fmt::Debug> std::fmt::Debug for EnumResolver<S, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnumResolver")
            .field("parser", &self.parser)
            .finish_non_exhaustive()
    }
}
