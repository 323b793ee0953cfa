//! On-disk artifact formats.
//!
//! These mirror the JSON files a Hardhat-style build writes:
//! - `hh-sol-artifact-1`: one per compiled contract
//! - `hh-sol-dbg-1`: sits next to each artifact and points at its build info
//! - `hh-sol-build-info-1`: the full compiler input and output of one run

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use sol_sandbox_types::FullyQualifiedName;

pub const ARTIFACT_FORMAT: &str = "hh-sol-artifact-1";
pub const DEBUG_FILE_FORMAT: &str = "hh-sol-dbg-1";
pub const BUILD_INFO_FORMAT: &str = "hh-sol-build-info-1";

/// Compiled output for one contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    #[serde(rename = "_format")]
    pub format: String,
    pub contract_name: String,
    /// Source file the contract was compiled from.
    pub source_name: String,
    #[serde(default)]
    pub abi: Vec<Value>,
    #[serde(default)]
    pub bytecode: String,
    #[serde(default)]
    pub deployed_bytecode: String,
    #[serde(default)]
    pub link_references: Value,
    #[serde(default)]
    pub deployed_link_references: Value,
}

impl Artifact {
    /// An artifact with empty ABI and bytecode.
    pub fn new(source_name: impl Into<String>, contract_name: impl Into<String>) -> Self {
        Self {
            format: ARTIFACT_FORMAT.to_string(),
            contract_name: contract_name.into(),
            source_name: source_name.into(),
            abi: Vec::new(),
            bytecode: "0x".to_string(),
            deployed_bytecode: "0x".to_string(),
            link_references: Value::Object(Default::default()),
            deployed_link_references: Value::Object(Default::default()),
        }
    }

    pub fn fully_qualified_name(&self) -> FullyQualifiedName {
        FullyQualifiedName::new(&self.source_name, &self.contract_name)
    }
}

/// Pointer from an artifact to the build info that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugFile {
    #[serde(rename = "_format")]
    pub format: String,
    /// Path of the build info file, relative to the debug file's directory.
    pub build_info: String,
}

/// One source file of a compiler input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub content: String,
}

/// Standard JSON compiler input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildInput {
    pub language: String,
    /// Source path -> source file.
    pub sources: BTreeMap<String, SourceFile>,
    #[serde(default)]
    pub settings: Value,
}

impl BuildInput {
    /// A Solidity input over the given `(path, content)` pairs.
    pub fn solidity<I, P, C>(sources: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: Into<String>,
    {
        Self {
            language: "Solidity".to_string(),
            sources: sources
                .into_iter()
                .map(|(path, content)| {
                    (
                        path.into(),
                        SourceFile {
                            content: content.into(),
                        },
                    )
                })
                .collect(),
            settings: Value::Object(Default::default()),
        }
    }
}

/// A compilation run: input bundle plus compiler output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    #[serde(rename = "_format")]
    pub format: String,
    pub id: String,
    pub solc_version: String,
    pub solc_long_version: String,
    pub input: BuildInput,
    #[serde(default)]
    pub output: Value,
}

impl BuildInfo {
    /// A build info whose id is derived from its contents.
    pub fn new(solc_version: impl Into<String>, input: BuildInput) -> Self {
        let solc_version = solc_version.into();
        let mut build_info = Self {
            format: BUILD_INFO_FORMAT.to_string(),
            id: String::new(),
            solc_long_version: solc_version.clone(),
            solc_version,
            input,
            output: Value::Object(Default::default()),
        };
        build_info.id = build_info.compute_id();
        build_info
    }

    /// Hex SHA-256 over the compiler version and the canonical input JSON.
    pub fn compute_id(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(BUILD_INFO_FORMAT.as_bytes());
        hasher.update(self.solc_version.as_bytes());
        hasher.update(self.solc_long_version.as_bytes());
        hasher.update(serde_json::to_vec(&self.input).unwrap_or_default());
        hex::encode(hasher.finalize())
    }

    /// Raw text of a source file in this build's input.
    pub fn source_content(&self, source_name: &str) -> Result<&str> {
        self.input
            .sources
            .get(source_name)
            .map(|source| source.content.as_str())
            .ok_or_else(|| {
                anyhow!(
                    "Source \"{}\" not found in build info {}",
                    source_name,
                    self.id
                )
            })
    }
}
