//! CLI subcommand implementations for sol-sandbox

pub mod config;
pub mod enums;
pub mod output;

use anyhow::Result;
use std::path::{Path, PathBuf};

use sol_sandbox::{Runtime, ToolchainConfig};

/// Options shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalOpts {
    pub config: Option<PathBuf>,
    pub artifacts: Option<PathBuf>,
    pub network: Option<String>,
}

impl GlobalOpts {
    /// Load the effective configuration: file (explicit or discovered), then
    /// environment overrides, then command-line flags.
    pub fn load_config(&self) -> Result<ToolchainConfig> {
        let mut config = match &self.config {
            Some(path) => ToolchainConfig::load(path)?,
            None => ToolchainConfig::discover(&std::env::current_dir()?)?,
        };
        config.apply_env_overrides()?;
        if let Some(artifacts) = &self.artifacts {
            config.paths.artifacts = absolute(artifacts)?;
        }
        if let Some(network) = &self.network {
            config.default_network = network.clone();
        }
        Ok(config)
    }

    pub fn runtime(&self) -> Result<Runtime> {
        Runtime::from_config(self.load_config()?)
    }
}

/// Command-line paths are relative to the working directory, not the project root.
fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
