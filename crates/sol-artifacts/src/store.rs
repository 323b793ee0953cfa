//! Artifact store abstraction.
//!
//! Lets the enum resolver (and anything else reading compiled output) work
//! against the filesystem layout, an in-memory fixture, or any other backend
//! without coupling callers to one implementation.

use anyhow::{anyhow, Result};
use std::sync::Arc;

use sol_sandbox_types::FullyQualifiedName;

use crate::types::{Artifact, BuildInfo};

/// Read access to compiled artifacts and the builds that produced them.
#[async_trait::async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Read the artifact for a bare or fully qualified contract name.
    ///
    /// Bare names must match exactly one compiled contract.
    async fn read_artifact(&self, name: &str) -> Result<Artifact>;

    /// Fetch the build info whose input compiled `fqn`.
    async fn get_build_info(&self, fqn: &FullyQualifiedName) -> Result<BuildInfo>;

    /// Every compiled contract, sorted.
    async fn all_fully_qualified_names(&self) -> Result<Vec<FullyQualifiedName>>;

    /// Check if an artifact can be read (without surfacing the error).
    async fn artifact_exists(&self, name: &str) -> bool {
        self.read_artifact(name).await.is_ok()
    }
}

#[async_trait::async_trait]
impl<S: ArtifactStore + ?Sized> ArtifactStore for Arc<S> {
    async fn read_artifact(&self, name: &str) -> Result<Artifact> {
        (**self).read_artifact(name).await
    }

    async fn get_build_info(&self, fqn: &FullyQualifiedName) -> Result<BuildInfo> {
        (**self).get_build_info(fqn).await
    }

    async fn all_fully_qualified_names(&self) -> Result<Vec<FullyQualifiedName>> {
        (**self).all_fully_qualified_names().await
    }
}

/// Resolve a bare contract name against the known fully qualified names.
///
/// Fails when no contract has that name, or when several source files declare
/// a contract with it.
pub fn resolve_bare_name(
    name: &str,
    candidates: &[FullyQualifiedName],
) -> Result<FullyQualifiedName> {
    let mut matches: Vec<&FullyQualifiedName> = candidates
        .iter()
        .filter(|fqn| fqn.contract_name == name)
        .collect();
    matches.sort();

    match matches.as_slice() {
        [] => Err(anyhow!("Artifact for contract \"{}\" not found.", name)),
        [only] => Ok((*only).clone()),
        many => {
            let listing: Vec<String> = many.iter().map(|fqn| format!("  {}", fqn)).collect();
            tracing::warn!(contract = name, candidates = many.len(), "ambiguous contract name");
            Err(anyhow!(
                "There are multiple artifacts for contract \"{}\", please use a fully qualified name instead:\n{}",
                name,
                listing.join("\n")
            ))
        }
    }
}
