#![allow(dead_code)]
//! Shared test utilities for integration tests.
//!
//! - `fixtures`: temporary projects with a compiled artifacts tree

pub mod fixtures;

pub use fixtures::{ProjectFixture, MARKET_SOL, MY_CONTRACT_SOL};
