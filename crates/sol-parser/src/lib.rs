//! Solidity Parser
//!
//! Parses Solidity source text into a declaration-level syntax tree and walks
//! it with a visitor.
//!
//! This crate provides:
//! - [`lexer`]: logos-based tokenizer (comments and string literals handled)
//! - [`parser`]: recursive-descent parser for pragmas, imports, contracts,
//!   enums and structs
//! - [`ast`]: the syntax tree
//! - [`visit`]: pre-order visitor traversal with early exit
//!
//! # Example
//!
//! ```
//! use sol_parser::{parse_source, visit::find_enum};
//!
//! let unit = parse_source("contract C { enum Status { Pending, Active } }").unwrap();
//! let status = find_enum(&unit, "Status").unwrap();
//! assert_eq!(status.index_mapping().index_of("Active"), Some(1));
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod visit;

pub use ast::{
    ContractDefinition, ContractKind, ContractMember, EnumDefinition, ImportDirective, OtherItem,
    PragmaDirective, SourceItem, SourceUnit, Span, StructDefinition,
};
pub use error::ParseError;
pub use parser::parse_source;
pub use visit::{collect_enums, find_enum, visit_enums, walk, Visitor};

/// Turns source text into a syntax tree.
///
/// The resolver depends on this trait rather than on [`SolidityParser`] so
/// callers can plug in a different front end.
pub trait SourceParser: Send + Sync {
    fn parse(&self, source: &str) -> anyhow::Result<SourceUnit>;
}

/// The built-in parser.
#[derive(Debug, Default, Clone, Copy)]
pub struct SolidityParser;

impl SourceParser for SolidityParser {
    fn parse(&self, source: &str) -> anyhow::Result<SourceUnit> {
        Ok(parse_source(source)?)
    }
}
