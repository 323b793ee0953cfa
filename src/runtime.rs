//! The shared session environment.
//!
//! A [`Runtime`] is built once per build/test session and handed to every
//! consumer. It owns the configuration, the selected network and the artifact
//! store, and exposes the enum resolver on top of them.

use anyhow::{anyhow, Result};
use std::sync::Arc;
use tracing::debug;

use sol_artifacts::{ArtifactStore, FsArtifactStore};
use sol_resolver::{DeclaredEnum, EnumResolver, ResolveError};
use sol_sandbox_types::EnumIndexMapping;

use crate::config::{NetworkConfig, ToolchainConfig};

pub struct Runtime {
    config: ToolchainConfig,
    network_name: String,
    resolver: EnumResolver<dyn ArtifactStore>,
}

impl Runtime {
    /// Build a runtime over an explicit artifact store.
    pub fn new(config: ToolchainConfig, store: Arc<dyn ArtifactStore>) -> Result<Self> {
        config.validate()?;
        let network_name = config.default_network.clone();
        Ok(Self {
            config,
            network_name,
            resolver: EnumResolver::with_store(store),
        })
    }

    /// Build a runtime reading artifacts from `paths.artifacts`.
    pub fn from_config(config: ToolchainConfig) -> Result<Self> {
        let artifacts = config.paths.artifacts_dir();
        debug!(artifacts = %artifacts.display(), network = %config.default_network, "creating runtime");
        Self::new(config, Arc::new(FsArtifactStore::new(artifacts)))
    }

    /// Switch to another configured network.
    pub fn with_network(mut self, name: &str) -> Result<Self> {
        if self.config.network(name).is_none() {
            let known: Vec<&str> = self.config.networks.keys().map(String::as_str).collect();
            return Err(anyhow!(
                "Network \"{}\" is not configured (available: {})",
                name,
                known.join(", ")
            ));
        }
        self.network_name = name.to_string();
        Ok(self)
    }

    pub fn config(&self) -> &ToolchainConfig {
        &self.config
    }

    pub fn network_name(&self) -> &str {
        &self.network_name
    }

    pub fn network(&self) -> &NetworkConfig {
        // checked in new() / with_network()
        &self.config.networks[&self.network_name]
    }

    pub fn artifacts(&self) -> &Arc<dyn ArtifactStore> {
        self.resolver.store()
    }

    /// Member ↔ index mapping of `enum_name` as declared in the source file
    /// `contract` was compiled from.
    pub async fn get_enum(
        &self,
        contract: &str,
        enum_name: &str,
    ) -> Result<EnumIndexMapping, ResolveError> {
        self.resolver.resolve_enum(contract, enum_name).await
    }

    /// Every enum declared in the source file of `contract`.
    pub async fn declared_enums(&self, contract: &str) -> Result<Vec<DeclaredEnum>, ResolveError> {
        self.resolver.declared_enums(contract).await
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("network", &self.network_name)
            .field("artifacts", &self.config.paths.artifacts_dir())
            .finish_non_exhaustive()
    }
}
