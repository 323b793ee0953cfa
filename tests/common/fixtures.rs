//! On-disk project fixtures for integration tests.
//!
//! Writes a compiled artifacts tree (artifacts, debug files, build info) into
//! a temporary project directory, the same shape a real build leaves behind.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use sol_sandbox::sol_artifacts::{Artifact, BuildInfo, BuildInput, FsArtifactStore};

/// `contracts/MyContract.sol`: the canonical `Status` example.
pub const MY_CONTRACT_SOL: &str = r#"// SPDX-License-Identifier: MIT
pragma solidity ^0.8.0;

/// @notice Tracks a request lifecycle. { braces in comments are ignored }
contract MyContract {
    enum Status { Pending, Active, Closed }

    struct Request {
        address owner;
        Status status;
    }

    string public constant NOTE = "enum Status { Fake }";
    mapping(uint256 => Request) public requests;

    event StatusChanged(uint256 indexed id, Status status);

    function close(uint256 id) external {
        requests[id].status = Status.Closed;
        emit StatusChanged(id, Status.Closed);
    }
}
"#;

/// `contracts/Market.sol`: a library enum used by a contract in the same file.
pub const MARKET_SOL: &str = r#"pragma solidity >=0.8.0 <0.8.10;

library Orders {
    enum Side { Buy, Sell }
}

abstract contract Base {
    enum Phase { Open, Halted }
}

contract Market is Base {
    enum Phase { Auction, Continuous, Closed }

    function side() external pure returns (Orders.Side) {
        return Orders.Side.Sell;
    }
}
"#;

/// A temporary project: `<root>/artifacts` holds one build of the sources
/// above, plus two unrelated `Token` contracts to exercise ambiguity.
pub struct ProjectFixture {
    dir: TempDir,
}

impl ProjectFixture {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let fixture = Self { dir };
        let store = FsArtifactStore::new(fixture.artifacts_dir());

        let main_build = BuildInfo::new(
            "0.8.13",
            BuildInput::solidity([
                ("contracts/MyContract.sol", MY_CONTRACT_SOL),
                ("contracts/Market.sol", MARKET_SOL),
            ]),
        );
        store
            .save_build(
                &main_build,
                &[
                    Artifact::new("contracts/MyContract.sol", "MyContract"),
                    Artifact::new("contracts/Market.sol", "Orders"),
                    Artifact::new("contracts/Market.sol", "Base"),
                    Artifact::new("contracts/Market.sol", "Market"),
                ],
            )
            .expect("save main build");

        let token_build = BuildInfo::new(
            "0.8.11",
            BuildInput::solidity([
                (
                    "contracts/v1/Token.sol",
                    "contract Token { enum Mode { Paused, Live } }",
                ),
                (
                    "contracts/v2/Token.sol",
                    "contract Token { enum Mode { Paused, Live, Frozen } }",
                ),
            ]),
        );
        store
            .save_build(
                &token_build,
                &[
                    Artifact::new("contracts/v1/Token.sol", "Token"),
                    Artifact::new("contracts/v2/Token.sol", "Token"),
                ],
            )
            .expect("save token build");

        fixture
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn artifacts_dir(&self) -> PathBuf {
        self.root().join("artifacts")
    }

    /// Write `sol-sandbox.yaml` at the project root.
    pub fn write_config(&self, yaml: &str) -> PathBuf {
        let path = self.root().join("sol-sandbox.yaml");
        std::fs::write(&path, yaml).expect("write config");
        path
    }

    /// Write a source file under the project root.
    pub fn write_source(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create source dir");
        }
        std::fs::write(&path, content).expect("write source");
        path
    }
}
