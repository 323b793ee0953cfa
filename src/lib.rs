//! sol-sandbox
//!
//! Configuration and runtime helpers for a local Solidity development
//! toolchain:
//!
//! - **Configuration**: compiler versions and optimizer settings, networks,
//!   test-runner timeout and project layout ([`config`])
//! - **Runtime**: the session environment handed to scripts and tests,
//!   including enum resolution over compiled artifacts ([`runtime`])
//!
//! The building blocks live in the workspace crates and are re-exported here:
//! [`sol_parser`], [`sol_artifacts`], [`sol_resolver`] and
//! [`sol_sandbox_types`].
//!
//! # Example
//!
//! ```no_run
//! # async fn demo() -> anyhow::Result<()> {
//! use sol_sandbox::{Runtime, ToolchainConfig};
//!
//! let config = ToolchainConfig::discover(&std::env::current_dir()?)?;
//! let runtime = Runtime::from_config(config)?;
//! let status = runtime.get_enum("MyContract", "Status").await?;
//! assert_eq!(status["Active"], 1);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod runtime;

pub use config::{
    CompilerConfig, CompilerSettings, NetworkConfig, OptimizerSettings, PathsConfig,
    SolidityConfig, TestConfig, ToolchainConfig,
};
pub use runtime::Runtime;

pub use sol_artifacts;
pub use sol_parser;
pub use sol_resolver;
pub use sol_sandbox_types;

pub use sol_resolver::{DeclaredEnum, ResolveError};
pub use sol_sandbox_types::EnumIndexMapping;
