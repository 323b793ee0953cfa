//! In-memory artifact store, for tests and embedding.

use anyhow::{anyhow, Result};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

use sol_sandbox_types::FullyQualifiedName;

use crate::store::{resolve_bare_name, ArtifactStore};
use crate::types::{Artifact, BuildInfo};

#[derive(Debug, Default)]
struct Inner {
    artifacts: BTreeMap<FullyQualifiedName, Artifact>,
    /// Contract -> id of the build that produced it.
    build_of: HashMap<FullyQualifiedName, String>,
    builds: HashMap<String, BuildInfo>,
}

/// Artifact store held entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryArtifactStore {
    inner: RwLock<Inner>,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a build and the artifacts it produced.
    ///
    /// Artifacts already present under the same fully qualified name are
    /// replaced, matching a recompilation.
    pub fn insert_build(&self, build_info: BuildInfo, artifacts: Vec<Artifact>) -> Result<()> {
        let mut build_info = build_info;
        if build_info.id.is_empty() {
            build_info.id = build_info.compute_id();
        }
        for artifact in &artifacts {
            if !build_info.input.sources.contains_key(&artifact.source_name) {
                return Err(anyhow!(
                    "Artifact {} was not compiled from build {}",
                    artifact.fully_qualified_name(),
                    build_info.id
                ));
            }
        }

        let mut inner = self.inner.write();
        for artifact in artifacts {
            let fqn = artifact.fully_qualified_name();
            inner.build_of.insert(fqn.clone(), build_info.id.clone());
            inner.artifacts.insert(fqn, artifact);
        }
        inner.builds.insert(build_info.id.clone(), build_info);
        Ok(())
    }

    /// Number of stored artifacts.
    pub fn len(&self) -> usize {
        self.inner.read().artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl ArtifactStore for InMemoryArtifactStore {
    async fn read_artifact(&self, name: &str) -> Result<Artifact> {
        let inner = self.inner.read();
        let fqn = match FullyQualifiedName::parse(name) {
            Some(fqn) => fqn,
            None => {
                let known: Vec<FullyQualifiedName> = inner.artifacts.keys().cloned().collect();
                resolve_bare_name(name, &known)?
            }
        };
        inner
            .artifacts
            .get(&fqn)
            .cloned()
            .ok_or_else(|| anyhow!("Artifact for contract \"{}\" not found.", fqn))
    }

    async fn get_build_info(&self, fqn: &FullyQualifiedName) -> Result<BuildInfo> {
        let inner = self.inner.read();
        inner
            .build_of
            .get(fqn)
            .and_then(|id| inner.builds.get(id))
            .cloned()
            .ok_or_else(|| anyhow!("No build info found for contract \"{}\"", fqn))
    }

    async fn all_fully_qualified_names(&self) -> Result<Vec<FullyQualifiedName>> {
        Ok(self.inner.read().artifacts.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BuildInput;

    fn store_with(sources: &[(&str, &str, &str)]) -> InMemoryArtifactStore {
        let store = InMemoryArtifactStore::new();
        let input = BuildInput::solidity(sources.iter().map(|(path, _, src)| (*path, *src)));
        let artifacts = sources
            .iter()
            .map(|(path, contract, _)| Artifact::new(*path, *contract))
            .collect();
        store
            .insert_build(BuildInfo::new("0.8.13", input), artifacts)
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_lookup_by_bare_and_qualified_name() {
        let store = store_with(&[
            ("contracts/Vault.sol", "Vault", "contract Vault {}"),
            ("contracts/Pool.sol", "Pool", "contract Pool {}"),
        ]);
        assert_eq!(store.len(), 2);

        let vault = store.read_artifact("Vault").await.unwrap();
        assert_eq!(vault.source_name, "contracts/Vault.sol");

        let pool = store.read_artifact("contracts/Pool.sol:Pool").await.unwrap();
        let info = store
            .get_build_info(&pool.fully_qualified_name())
            .await
            .unwrap();
        assert_eq!(
            info.source_content("contracts/Pool.sol").unwrap(),
            "contract Pool {}"
        );
    }

    #[tokio::test]
    async fn test_unknown_and_ambiguous_names() {
        let store = store_with(&[
            ("contracts/a/Token.sol", "Token", "contract Token {}"),
            ("contracts/b/Token.sol", "Token", "contract Token {}"),
        ]);

        let err = store.read_artifact("Token").await.unwrap_err();
        assert!(err.to_string().contains("multiple artifacts"));

        let err = store.read_artifact("contracts/c/Token.sol:Token").await.unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert!(!store.artifact_exists("Missing").await);
    }

    #[test]
    fn test_insert_rejects_artifact_outside_build() {
        let store = InMemoryArtifactStore::new();
        let build = BuildInfo::new("0.8.13", BuildInput::solidity([("A.sol", "contract A {}")]));
        let err = store
            .insert_build(build, vec![Artifact::new("B.sol", "B")])
            .unwrap_err();
        assert!(err.to_string().contains("was not compiled"));
        assert!(store.is_empty());
    }
}
