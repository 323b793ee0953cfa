//! Contract naming.
//!
//! Compiled contracts are addressed either by their bare name (`"Token"`) or by
//! a fully qualified name that pins the source file the contract came from:
//!
//! - Bare: `"Token"`
//! - Fully qualified: `"contracts/tokens/Token.sol:Token"`
//!
//! Source names may themselves contain `:` (e.g. `"C:/work/Token.sol"`), so the
//! contract name is always whatever follows the **last** colon.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A `<sourceName>:<contractName>` identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FullyQualifiedName {
    pub source_name: String,
    pub contract_name: String,
}

impl FullyQualifiedName {
    /// Combine a source path and a contract name.
    pub fn new(source_name: impl Into<String>, contract_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            contract_name: contract_name.into(),
        }
    }

    /// Parse a fully qualified name, returning None for bare names.
    pub fn parse(name: &str) -> Option<Self> {
        let (source, contract) = name.rsplit_once(':')?;
        if source.is_empty() || contract.is_empty() {
            return None;
        }
        Some(Self::new(source, contract))
    }
}

impl fmt::Display for FullyQualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source_name, self.contract_name)
    }
}

impl FromStr for FullyQualifiedName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| {
            anyhow!(
                "Invalid fully qualified contract name \"{}\": expected <sourceName>:<contractName>",
                s
            )
        })
    }
}

/// Check whether a contract identifier is already fully qualified.
///
/// # Examples
///
/// ```
/// use sol_sandbox_types::names::is_fully_qualified_name;
///
/// assert!(is_fully_qualified_name("contracts/Token.sol:Token"));
/// assert!(!is_fully_qualified_name("Token"));
/// ```
pub fn is_fully_qualified_name(name: &str) -> bool {
    FullyQualifiedName::parse(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_with_colon() {
        let fqn = FullyQualifiedName::new("contracts/Vault.sol", "Vault");
        assert_eq!(fqn.to_string(), "contracts/Vault.sol:Vault");
    }

    #[test]
    fn test_parse_splits_on_last_colon() {
        let fqn: FullyQualifiedName = "C:/work/Vault.sol:Vault".parse().unwrap();
        assert_eq!(fqn.source_name, "C:/work/Vault.sol");
        assert_eq!(fqn.contract_name, "Vault");
    }

    #[test]
    fn test_parse_rejects_bare_and_empty_parts() {
        assert!(FullyQualifiedName::parse("Vault").is_none());
        assert!(FullyQualifiedName::parse(":Vault").is_none());
        assert!(FullyQualifiedName::parse("contracts/Vault.sol:").is_none());
        assert!("Vault".parse::<FullyQualifiedName>().is_err());
    }
}
