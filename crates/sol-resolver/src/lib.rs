//! Enum resolver for compiled Solidity contracts.
//!
//! Tests and scripts talking to a deployed contract see enums as bare
//! integers. [`EnumResolver`] recovers the member ↔ index mapping from the
//! source file the contract was actually compiled from, so callers can write
//! `mapping["Active"]` instead of a magic `1`.
//!
//! The resolver is built from two collaborators, injected at construction:
//! - an [`ArtifactStore`](sol_artifacts::ArtifactStore) that knows where the
//!   compiled output and its build info live
//! - a [`SourceParser`](sol_parser::SourceParser) that turns source text into
//!   a traversable syntax tree
//!
//! Failures are either [`ResolveError::Lookup`] (a collaborator failed; its
//! error is carried as-is) or [`ResolveError::NotFound`] (the source has no
//! such enum).

pub mod error;
pub mod resolver;

pub use error::ResolveError;
pub use resolver::{DeclaredEnum, EnumResolver};
