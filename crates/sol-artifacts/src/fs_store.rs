//! Filesystem-backed artifact store (Hardhat directory layout).

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use sol_sandbox_types::FullyQualifiedName;

use crate::paths::{
    artifact_path, atomic_write_json, atomic_write_json_pretty, build_info_path, debug_file_path,
    relative_build_info_path, validate_fully_qualified_name, BUILD_INFO_DIR, DEBUG_FILE_SUFFIX,
};
use crate::store::{resolve_bare_name, ArtifactStore};
use crate::types::{Artifact, BuildInfo, DebugFile, DEBUG_FILE_FORMAT};

/// Artifact store reading a compiled `artifacts/` directory.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: Arc<Path>,
}

impl FsArtifactStore {
    /// Open a store rooted at an artifacts directory.
    ///
    /// The directory does not need to exist yet; lookups against a missing
    /// directory simply find nothing.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: Arc::from(root.as_ref()),
        }
    }

    /// Get the artifacts root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist one compilation: its build info, every artifact, and a debug
    /// file per artifact pointing back at the build info.
    ///
    /// An empty build info id is replaced by the content-derived id. Returns
    /// the path of the written build info file.
    pub fn save_build(&self, build_info: &BuildInfo, artifacts: &[Artifact]) -> Result<PathBuf> {
        let mut build_info = build_info.clone();
        if build_info.id.is_empty() {
            build_info.id = build_info.compute_id();
        }

        for artifact in artifacts {
            validate_fully_qualified_name(&artifact.fully_qualified_name())?;
            if !build_info.input.sources.contains_key(&artifact.source_name) {
                return Err(anyhow!(
                    "Artifact {} was not compiled from build {}",
                    artifact.fully_qualified_name(),
                    build_info.id
                ));
            }
        }

        let info_path = build_info_path(&self.root, &build_info.id);
        atomic_write_json(&info_path, &build_info)?;

        for artifact in artifacts {
            let fqn = artifact.fully_qualified_name();
            atomic_write_json_pretty(&artifact_path(&self.root, &fqn), artifact)?;

            let debug_file = DebugFile {
                format: DEBUG_FILE_FORMAT.to_string(),
                build_info: relative_build_info_path(&fqn.source_name, &build_info.id),
            };
            atomic_write_json_pretty(&debug_file_path(&self.root, &fqn), &debug_file)?;
        }

        debug!(
            build_info = %build_info.id,
            artifacts = artifacts.len(),
            "saved build"
        );
        Ok(info_path)
    }

    async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("Failed to parse {}", path.display()))
    }

    async fn read_by_fqn(&self, fqn: &FullyQualifiedName) -> Result<Artifact> {
        validate_fully_qualified_name(fqn)?;
        let path = artifact_path(&self.root, fqn);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(anyhow!("Artifact for contract \"{}\" not found.", fqn));
        }
        Self::read_json(&path).await
    }

    /// Walk the tree collecting `<sourceName>/<Contract>.json` entries.
    async fn scan(&self) -> Result<Vec<FullyQualifiedName>> {
        let mut found = Vec::new();
        if !tokio::fs::try_exists(&self.root).await.unwrap_or(false) {
            return Ok(found);
        }

        let mut pending: Vec<PathBuf> = vec![self.root.to_path_buf()];
        while let Some(dir) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir)
                .await
                .with_context(|| format!("Failed to list {}", dir.display()))?;

            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                let file_type = entry.file_type().await?;

                if file_type.is_dir() {
                    if dir.as_path() == &*self.root && entry.file_name() == BUILD_INFO_DIR {
                        continue;
                    }
                    pending.push(path);
                    continue;
                }

                let file_name = entry.file_name().to_string_lossy().to_string();
                if file_name.ends_with(DEBUG_FILE_SUFFIX) {
                    continue;
                }
                let Some(contract_name) = file_name.strip_suffix(".json") else {
                    continue;
                };
                // Artifacts always live inside their source file's directory.
                if dir.as_path() == &*self.root {
                    continue;
                }
                let source_name = dir
                    .strip_prefix(&self.root)
                    .map_err(|e| anyhow!("Path {} outside artifacts root: {}", dir.display(), e))?
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().to_string())
                    .collect::<Vec<_>>()
                    .join("/");
                found.push(FullyQualifiedName::new(source_name, contract_name));
            }
        }

        found.sort();
        Ok(found)
    }
}

#[async_trait::async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn read_artifact(&self, name: &str) -> Result<Artifact> {
        let fqn = match FullyQualifiedName::parse(name) {
            Some(fqn) => fqn,
            None => resolve_bare_name(name, &self.scan().await?)?,
        };
        debug!(contract = name, fqn = %fqn, "reading artifact");
        self.read_by_fqn(&fqn).await
    }

    async fn get_build_info(&self, fqn: &FullyQualifiedName) -> Result<BuildInfo> {
        validate_fully_qualified_name(fqn)?;
        let debug_path = debug_file_path(&self.root, fqn);
        if !tokio::fs::try_exists(&debug_path).await.unwrap_or(false) {
            return Err(anyhow!("No build info found for contract \"{}\"", fqn));
        }
        let debug_file: DebugFile = Self::read_json(&debug_path).await?;

        let base = debug_path.parent().unwrap_or(&self.root);
        let info_path = base.join(&debug_file.build_info);
        debug!(fqn = %fqn, build_info = %info_path.display(), "reading build info");
        Self::read_json(&info_path)
            .await
            .with_context(|| format!("Failed to load build info for contract \"{}\"", fqn))
    }

    async fn all_fully_qualified_names(&self) -> Result<Vec<FullyQualifiedName>> {
        self.scan().await
    }
}
