//! Toolchain configuration.
//!
//! One file (`sol-sandbox.yaml`, `.yml` or `.json`) describes the compilers,
//! the networks, the test runner and the project layout:
//!
//! ```yaml
//! solidity:
//!   settings:
//!     optimizer: { enabled: true, runs: 200 }
//!   compilers:
//!     - version: 0.8.13
//!     - version: 0.8.0
//!       settings:
//!         optimizer: { enabled: false, runs: 200 }
//! defaultNetwork: hardhat
//! networks:
//!   localhost: { url: "http://127.0.0.1:8545" }
//! test:
//!   timeoutMs: 20000
//! ```
//!
//! Every section is optional; omitted values fall back to
//! [`ToolchainConfig::default`].

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use sol_parser::SourceUnit;
use sol_sandbox_types::env_utils::{env_nonempty, env_parse};
use sol_sandbox_types::{SolcVersion, VersionReq};

/// File names searched by [`ToolchainConfig::discover`], in priority order.
pub const CONFIG_FILE_NAMES: &[&str] = &["sol-sandbox.yaml", "sol-sandbox.yml", "sol-sandbox.json"];

/// Name of the in-process simulated network.
pub const IN_PROCESS_NETWORK: &str = "hardhat";

pub const ENV_NETWORK: &str = "SOL_SANDBOX_NETWORK";
pub const ENV_TEST_TIMEOUT_MS: &str = "SOL_SANDBOX_TEST_TIMEOUT_MS";
pub const ENV_ARTIFACTS: &str = "SOL_SANDBOX_ARTIFACTS";
pub const ENV_OPTIMIZER_RUNS: &str = "SOL_SANDBOX_OPTIMIZER_RUNS";

const DEFAULT_COMPILERS: &[&str] = &["0.8.13", "0.8.11", "0.8.6", "0.8.0"];
const DEFAULT_CHAIN_ID: u64 = 31337;
const DEFAULT_LOCALHOST_URL: &str = "http://127.0.0.1:8545";
const DEFAULT_TEST_TIMEOUT_MS: u64 = 20_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolchainConfig {
    pub solidity: SolidityConfig,
    pub default_network: String,
    pub networks: BTreeMap<String, NetworkConfig>,
    pub test: TestConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SolidityConfig {
    /// Settings shared by every compiler unless it overrides them.
    pub settings: CompilerSettings,
    pub compilers: Vec<CompilerConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerConfig {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<CompilerSettings>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompilerSettings {
    pub optimizer: OptimizerSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evm_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptimizerSettings {
    pub enabled: bool,
    pub runs: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_gas_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<u64>,
    pub throw_on_transaction_failures: bool,
    pub throw_on_call_failures: bool,
    pub allow_unlimited_contract_size: bool,
    /// Private keys of the accounts to use.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub accounts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestConfig {
    pub timeout_ms: u64,
}

/// Project layout. `sources`, `artifacts` and `cache` are relative to `root`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PathsConfig {
    pub root: PathBuf,
    pub sources: PathBuf,
    pub artifacts: PathBuf,
    pub cache: PathBuf,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        let mut networks = BTreeMap::new();
        networks.insert(IN_PROCESS_NETWORK.to_string(), NetworkConfig::in_process());
        networks.insert("localhost".to_string(), NetworkConfig::localhost());
        Self {
            solidity: SolidityConfig::default(),
            default_network: IN_PROCESS_NETWORK.to_string(),
            networks,
            test: TestConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

impl Default for SolidityConfig {
    fn default() -> Self {
        Self {
            settings: CompilerSettings::default(),
            compilers: DEFAULT_COMPILERS
                .iter()
                .map(|version| CompilerConfig {
                    version: version.to_string(),
                    settings: None,
                })
                .collect(),
        }
    }
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            runs: 200,
        }
    }
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TEST_TIMEOUT_MS,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            sources: PathBuf::from("contracts"),
            artifacts: PathBuf::from("artifacts"),
            cache: PathBuf::from("cache"),
        }
    }
}

impl NetworkConfig {
    /// The in-process simulated network.
    pub fn in_process() -> Self {
        Self {
            chain_id: Some(DEFAULT_CHAIN_ID),
            throw_on_transaction_failures: true,
            throw_on_call_failures: true,
            allow_unlimited_contract_size: true,
            ..Self::default()
        }
    }

    /// A node running on the local machine.
    pub fn localhost() -> Self {
        Self {
            url: Some(DEFAULT_LOCALHOST_URL.to_string()),
            throw_on_transaction_failures: true,
            throw_on_call_failures: true,
            allow_unlimited_contract_size: true,
            ..Self::default()
        }
    }
}

impl TestConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl PathsConfig {
    fn under_root(&self, path: &Path) -> PathBuf {
        // join() keeps absolute paths as-is
        self.root.join(path)
    }

    pub fn sources_dir(&self) -> PathBuf {
        self.under_root(&self.sources)
    }

    pub fn artifacts_dir(&self) -> PathBuf {
        self.under_root(&self.artifacts)
    }

    /// Locate a source file: `path` itself when it exists, otherwise the
    /// same path under [`sources_dir`](Self::sources_dir).
    pub fn source_path(&self, path: &Path) -> PathBuf {
        if path.is_file() {
            path.to_path_buf()
        } else {
            self.sources_dir().join(path)
        }
    }
}

impl SolidityConfig {
    /// Settings used when compiling with `version`: the compiler's own
    /// settings if it declares any, the shared settings otherwise.
    pub fn effective_settings(&self, version: &str) -> Option<&CompilerSettings> {
        self.compilers
            .iter()
            .find(|compiler| compiler.version == version)
            .map(|compiler| compiler.settings.as_ref().unwrap_or(&self.settings))
    }

    /// Configured compiler versions, newest first.
    pub fn versions(&self) -> Result<Vec<SolcVersion>> {
        let mut versions = self
            .compilers
            .iter()
            .map(|compiler| compiler.version.parse::<SolcVersion>())
            .collect::<Result<Vec<_>>>()?;
        versions.sort_by(|a, b| b.cmp(a));
        versions.dedup();
        Ok(versions)
    }

    /// Pick the newest configured compiler satisfying every
    /// `pragma solidity` of `unit`.
    pub fn compiler_for(&self, unit: &SourceUnit) -> Result<SolcVersion> {
        let requirements = unit
            .pragmas("solidity")
            .map(|raw| {
                raw.parse::<VersionReq>()
                    .with_context(|| format!("Invalid pragma solidity \"{}\"", raw))
            })
            .collect::<Result<Vec<_>>>()?;

        let versions = self.versions()?;
        let chosen = versions
            .iter()
            .find(|version| requirements.iter().all(|req| req.matches(version)));

        match chosen {
            Some(version) => {
                debug!(version = %version, pragmas = requirements.len(), "selected compiler");
                Ok(version.clone())
            }
            None if versions.is_empty() => bail!("No compilers configured"),
            None => {
                let pragmas: Vec<&str> = requirements.iter().map(VersionReq::as_str).collect();
                let configured: Vec<String> = versions.iter().map(ToString::to_string).collect();
                bail!(
                    "No configured compiler matches pragma solidity \"{}\" (configured: {})",
                    pragmas.join("\" and \""),
                    configured.join(", ")
                )
            }
        }
    }
}

impl ToolchainConfig {
    /// Load a config file. `.yaml`/`.yml` are read as YAML, `.json` as JSON.
    ///
    /// A relative `paths.root` is resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|value| value.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let mut config = match ext.as_str() {
            "yaml" | "yml" => serde_yaml::from_str::<Self>(&raw)
                .with_context(|| format!("Invalid YAML config in {}", path.display()))?,
            "json" => serde_json::from_str::<Self>(&raw)
                .with_context(|| format!("Invalid JSON config in {}", path.display()))?,
            other => bail!(
                "Unsupported config format \"{}\" for {} (expected .yaml, .yml or .json)",
                other,
                path.display()
            ),
        };

        config
            .networks
            .entry(IN_PROCESS_NETWORK.to_string())
            .or_insert_with(NetworkConfig::in_process);

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.paths.root = base.join(&config.paths.root);
        debug!(path = %path.display(), root = %config.paths.root.display(), "loaded config");
        Ok(config)
    }

    /// Find the nearest config file at or above `start_dir`.
    ///
    /// Falls back to the defaults rooted at `start_dir` when none exists.
    pub fn discover(start_dir: &Path) -> Result<Self> {
        match Self::find_config_file(start_dir) {
            Some(path) => Self::load(&path),
            None => {
                debug!(start = %start_dir.display(), "no config file, using defaults");
                let mut config = Self::default();
                config.paths.root = start_dir.to_path_buf();
                Ok(config)
            }
        }
    }

    pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
        start_dir.ancestors().find_map(|dir| {
            CONFIG_FILE_NAMES
                .iter()
                .map(|name| dir.join(name))
                .find(|candidate| candidate.is_file())
        })
    }

    /// Apply `SOL_SANDBOX_*` environment overrides.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(network) = env_nonempty(ENV_NETWORK) {
            self.default_network = network;
        }
        if let Some(timeout_ms) = env_parse(ENV_TEST_TIMEOUT_MS)? {
            self.test.timeout_ms = timeout_ms;
        }
        if let Some(artifacts) = env_nonempty(ENV_ARTIFACTS) {
            self.paths.artifacts = PathBuf::from(artifacts);
        }
        if let Some(runs) = env_parse(ENV_OPTIMIZER_RUNS)? {
            self.solidity.settings.optimizer.runs = runs;
        }
        Ok(())
    }

    pub fn network(&self, name: &str) -> Option<&NetworkConfig> {
        self.networks.get(name)
    }

    /// The network selected by `defaultNetwork`.
    pub fn active_network(&self) -> Result<&NetworkConfig> {
        self.network(&self.default_network)
            .ok_or_else(|| anyhow!("Default network \"{}\" is not defined", self.default_network))
    }

    pub fn validate(&self) -> Result<()> {
        let mut issues = Vec::new();
        self.collect_validation_issues(&mut issues);
        if issues.is_empty() {
            return Ok(());
        }

        let formatted = issues
            .into_iter()
            .enumerate()
            .map(|(idx, issue)| format!("  {}. {}", idx + 1, issue))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("Configuration validation failed:\n{formatted}");
    }

    fn collect_validation_issues(&self, issues: &mut Vec<String>) {
        if self.solidity.compilers.is_empty() {
            issues.push("solidity.compilers must list at least one compiler".to_string());
        }

        let mut seen = HashSet::new();
        for compiler in &self.solidity.compilers {
            match compiler.version.parse::<SolcVersion>() {
                Ok(version) => {
                    if !seen.insert(version.clone()) {
                        issues.push(format!("compiler {} is listed more than once", version));
                    }
                }
                Err(err) => issues.push(err.to_string()),
            }
            if let Some(settings) = &compiler.settings {
                check_optimizer(
                    &settings.optimizer,
                    &format!("compiler {}", compiler.version),
                    issues,
                );
            }
        }
        check_optimizer(&self.solidity.settings.optimizer, "solidity.settings", issues);

        if !self.networks.contains_key(&self.default_network) {
            issues.push(format!(
                "defaultNetwork \"{}\" is not defined in networks",
                self.default_network
            ));
        }
        for (name, network) in &self.networks {
            match (name.as_str(), network.url.as_deref()) {
                (IN_PROCESS_NETWORK, Some(_)) => issues.push(format!(
                    "network \"{}\" runs in-process and cannot have a url",
                    name
                )),
                (IN_PROCESS_NETWORK, None) => {}
                (_, None) => issues.push(format!("network \"{}\" is missing a url", name)),
                (_, Some(url)) if url.trim().is_empty() => {
                    issues.push(format!("network \"{}\" has an empty url", name))
                }
                _ => {}
            }
        }

        if self.test.timeout_ms == 0 {
            issues.push("test.timeoutMs must be greater than 0".to_string());
        }
    }
}

fn check_optimizer(optimizer: &OptimizerSettings, owner: &str, issues: &mut Vec<String>) {
    if optimizer.enabled && optimizer.runs == 0 {
        issues.push(format!(
            "{}: optimizer runs must be greater than 0 when enabled",
            owner
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_toolchain() {
        let config = ToolchainConfig::default();

        let versions: Vec<&str> = config
            .solidity
            .compilers
            .iter()
            .map(|c| c.version.as_str())
            .collect();
        assert_eq!(versions, ["0.8.13", "0.8.11", "0.8.6", "0.8.0"]);
        assert_eq!(
            config.solidity.settings.optimizer,
            OptimizerSettings {
                enabled: true,
                runs: 200
            }
        );
        assert_eq!(config.default_network, "hardhat");

        let hardhat = config.network("hardhat").unwrap();
        assert_eq!(hardhat.chain_id, Some(31337));
        assert!(hardhat.url.is_none());
        assert!(hardhat.throw_on_transaction_failures);
        assert!(hardhat.throw_on_call_failures);
        assert!(hardhat.allow_unlimited_contract_size);

        let localhost = config.network("localhost").unwrap();
        assert_eq!(localhost.url.as_deref(), Some("http://127.0.0.1:8545"));
        assert!(localhost.allow_unlimited_contract_size);

        assert_eq!(config.test.timeout(), Duration::from_secs(20));
        assert_eq!(config.paths.artifacts_dir(), PathBuf::from("./artifacts"));
        config.validate().unwrap();
    }

    #[test]
    fn test_load_yaml_merges_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sol-sandbox.yaml");
        std::fs::write(
            &path,
            r#"
solidity:
  compilers:
    - version: 0.8.20
      settings:
        optimizer: { enabled: true, runs: 1000 }
    - version: 0.7.6
defaultNetwork: sepolia
networks:
  sepolia:
    url: https://rpc.sepolia.example
    accounts: ["0xabc"]
paths:
  artifacts: out
"#,
        )
        .unwrap();

        let config = ToolchainConfig::load(&path).unwrap();
        config.validate().unwrap();

        assert_eq!(config.solidity.compilers.len(), 2);
        assert_eq!(
            config.solidity.effective_settings("0.8.20").unwrap().optimizer.runs,
            1000
        );
        assert_eq!(
            config.solidity.effective_settings("0.7.6").unwrap().optimizer.runs,
            200
        );
        assert!(config.solidity.effective_settings("0.6.0").is_none());

        // in-process network is always available
        assert!(config.network("hardhat").is_some());
        assert_eq!(config.active_network().unwrap().accounts, ["0xabc"]);
        assert_eq!(config.paths.artifacts_dir(), dir.path().join(".").join("out"));
        assert_eq!(config.test.timeout_ms, 20_000);
    }

    #[test]
    fn test_load_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sol-sandbox.json");
        std::fs::write(&path, r#"{"test": {"timeoutMs": 5000}, "defaultNetwork": "localhost"}"#)
            .unwrap();

        let config = ToolchainConfig::load(&path).unwrap();
        assert_eq!(config.test.timeout_ms, 5000);
        assert_eq!(config.default_network, "localhost");
        assert_eq!(config.solidity.compilers.len(), 4);
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sol-sandbox.toml");
        std::fs::write(&path, "").unwrap();

        let err = ToolchainConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported config format"));
    }

    #[test]
    fn test_discover_walks_up() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("sol-sandbox.yaml"), "test: { timeoutMs: 42 }\n").unwrap();
        let nested = dir.path().join("contracts/tokens");
        std::fs::create_dir_all(&nested).unwrap();

        let config = ToolchainConfig::discover(&nested).unwrap();
        assert_eq!(config.test.timeout_ms, 42);
        assert_eq!(config.paths.root, dir.path().join("."));

        let empty = TempDir::new().unwrap();
        let config = ToolchainConfig::discover(empty.path()).unwrap();
        assert_eq!(config.test.timeout_ms, 20_000);
        assert_eq!(config.paths.artifacts_dir(), empty.path().join("artifacts"));
    }

    #[test]
    fn test_validate_collects_every_issue() {
        let mut config = ToolchainConfig::default();
        config.solidity.compilers.push(CompilerConfig {
            version: "0.8.13".to_string(),
            settings: None,
        });
        config.solidity.compilers.push(CompilerConfig {
            version: "0.8".to_string(),
            settings: None,
        });
        config.solidity.settings.optimizer.runs = 0;
        config.default_network = "mainnet".to_string();
        config.networks.get_mut("hardhat").unwrap().url = Some("http://x".to_string());
        config.networks.get_mut("localhost").unwrap().url = None;
        config.test.timeout_ms = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("compiler 0.8.13 is listed more than once"), "{err}");
        assert!(err.contains("Invalid compiler version \"0.8\""), "{err}");
        assert!(err.contains("optimizer runs must be greater than 0"), "{err}");
        assert!(err.contains("defaultNetwork \"mainnet\""), "{err}");
        assert!(err.contains("cannot have a url"), "{err}");
        assert!(err.contains("\"localhost\" is missing a url"), "{err}");
        assert!(err.contains("timeoutMs"), "{err}");
    }

    #[test]
    fn test_env_overrides() {
        std::env::set_var(ENV_NETWORK, "localhost");
        std::env::set_var(ENV_TEST_TIMEOUT_MS, " 900 ");
        std::env::set_var(ENV_ARTIFACTS, "/tmp/build/artifacts");
        std::env::set_var(ENV_OPTIMIZER_RUNS, "10000");

        let mut config = ToolchainConfig::default();
        config.apply_env_overrides().unwrap();
        assert_eq!(config.default_network, "localhost");
        assert_eq!(config.test.timeout_ms, 900);
        assert_eq!(config.paths.artifacts_dir(), PathBuf::from("/tmp/build/artifacts"));
        assert_eq!(config.solidity.settings.optimizer.runs, 10_000);

        std::env::set_var(ENV_OPTIMIZER_RUNS, "many");
        let err = ToolchainConfig::default().apply_env_overrides().unwrap_err();
        assert!(
            err.to_string().starts_with("Invalid SOL_SANDBOX_OPTIMIZER_RUNS=\"many\""),
            "{err}"
        );

        for key in [ENV_NETWORK, ENV_TEST_TIMEOUT_MS, ENV_ARTIFACTS, ENV_OPTIMIZER_RUNS] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_source_path_falls_back_to_sources_dir() {
        let dir = TempDir::new().unwrap();
        let mut config = ToolchainConfig::default();
        config.paths.root = dir.path().to_path_buf();

        let local = dir.path().join("Local.sol");
        std::fs::write(&local, "contract Local {}").unwrap();
        assert_eq!(config.paths.source_path(&local), local);

        assert_eq!(
            config.paths.source_path(Path::new("Token.sol")),
            dir.path().join("contracts").join("Token.sol")
        );
    }

    #[test]
    fn test_disabled_optimizer_allows_zero_runs() {
        let mut config = ToolchainConfig::default();
        config.solidity.settings.optimizer = OptimizerSettings {
            enabled: false,
            runs: 0,
        };
        config.validate().unwrap();
    }

    #[test]
    fn test_compiler_selection() {
        let config = SolidityConfig::default();
        let pick = |source: &str| {
            let unit = sol_parser::parse_source(source).unwrap();
            config.compiler_for(&unit)
        };

        assert_eq!(pick("contract A {}").unwrap().to_string(), "0.8.13");
        assert_eq!(
            pick("pragma solidity ^0.8.0;").unwrap().to_string(),
            "0.8.13"
        );
        assert_eq!(
            pick("pragma solidity >=0.8.0 <0.8.10;").unwrap().to_string(),
            "0.8.6"
        );
        assert_eq!(
            pick("pragma solidity 0.8.11;").unwrap().to_string(),
            "0.8.11"
        );
        assert_eq!(
            pick("pragma solidity 0.7.6 || ~0.8.0;").unwrap().to_string(),
            "0.8.13"
        );
        assert_eq!(
            pick("pragma solidity ^0.8.0;\npragma solidity <0.8.7;")
                .unwrap()
                .to_string(),
            "0.8.6"
        );

        let err = pick("pragma solidity ^0.6.0;").unwrap_err().to_string();
        assert!(err.contains("^0.6.0"), "{err}");
        assert!(err.contains("0.8.13, 0.8.11, 0.8.6, 0.8.0"), "{err}");

        let err = pick("pragma solidity ^0.6.0 ||;").unwrap_err().to_string();
        assert!(err.contains("Invalid pragma solidity \"^0.6.0 ||\""), "{err}");
    }
}
