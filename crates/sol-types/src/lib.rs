//! Shared types for the sol-sandbox workspace.
//!
//! The parser, artifact store, resolver and runtime all speak in these types,
//! so they live here rather than in any one of those crates.
//!
//! - [`names`]: contract names and `<sourceName>:<contractName>` identifiers
//! - [`enum_mapping`]: the bidirectional enum member ↔ index mapping
//! - [`version`]: compiler versions and `pragma solidity` requirements
//! - [`env_utils`]: environment variable parsing helpers

pub mod enum_mapping;
pub mod env_utils;
pub mod names;
pub mod version;

pub use enum_mapping::{EnumIndexMapping, MappingEntry};
pub use names::{is_fully_qualified_name, FullyQualifiedName};
pub use version::{SolcVersion, VersionReq};
