//! Compiled artifact storage.
//!
//! Reads (and writes) the output of a Solidity build: per-contract artifacts,
//! the debug files linking them to a build, and the build info files holding
//! the full compiler input.
//!
//! - [`FsArtifactStore`]: the on-disk `artifacts/` layout
//! - [`InMemoryArtifactStore`]: the same contract, held in memory
//!
//! Both implement [`ArtifactStore`], which is what consumers should depend on.

pub mod fs_store;
pub mod memory;
pub mod paths;
pub mod store;
pub mod types;

pub use fs_store::FsArtifactStore;
pub use memory::InMemoryArtifactStore;
pub use store::{resolve_bare_name, ArtifactStore};
pub use types::{Artifact, BuildInfo, BuildInput, DebugFile, SourceFile};
