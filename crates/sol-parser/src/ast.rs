//! Syntax tree for the declaration level of a Solidity source unit.
//!
//! Function bodies, state variables, events and the like are kept only as
//! opaque [`OtherItem`]s with their span; enums and structs are parsed fully.

use std::ops::Range;

use sol_sandbox_types::EnumIndexMapping;

/// Byte range of a node in the source.
pub type Span = Range<usize>;

/// A parsed source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceUnit {
    pub items: Vec<SourceItem>,
}

/// A top-level item of a source unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceItem {
    Pragma(PragmaDirective),
    Import(ImportDirective),
    Contract(ContractDefinition),
    Enum(EnumDefinition),
    Struct(StructDefinition),
    Other(OtherItem),
}

/// `pragma <name> <value>;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PragmaDirective {
    pub name: String,
    /// Raw text between the name and the `;`, trimmed.
    pub value: String,
    pub span: Span,
}

/// `import ... "<path>" ...;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDirective {
    /// The imported path without quotes.
    pub path: String,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractKind {
    Contract,
    AbstractContract,
    Interface,
    Library,
}

impl std::fmt::Display for ContractKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ContractKind::Contract => "contract",
            ContractKind::AbstractContract => "abstract contract",
            ContractKind::Interface => "interface",
            ContractKind::Library => "library",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractDefinition {
    pub kind: ContractKind,
    pub name: String,
    /// Inherited contracts in declaration order (`Lib.Base` paths kept dotted).
    pub base_contracts: Vec<String>,
    pub members: Vec<ContractMember>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractMember {
    Enum(EnumDefinition),
    Struct(StructDefinition),
    Other(OtherItem),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDefinition {
    pub name: String,
    /// Member names in declaration order.
    pub members: Vec<String>,
    pub span: Span,
}

impl EnumDefinition {
    /// The member ↔ index mapping for this declaration.
    pub fn index_mapping(&self) -> EnumIndexMapping {
        EnumIndexMapping::from_members(self.members.iter().cloned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDefinition {
    pub name: String,
    /// Field names in declaration order.
    pub members: Vec<String>,
    pub span: Span,
}

/// A declaration the parser skips over (function, state variable, event...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherItem {
    /// Leading word of the declaration, e.g. `function` or `uint256`.
    pub keyword: Option<String>,
    pub span: Span,
}

impl SourceUnit {
    /// Values of every `pragma <name>` directive, in order.
    pub fn pragmas<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.items.iter().filter_map(move |item| match item {
            SourceItem::Pragma(p) if p.name == name => Some(p.value.as_str()),
            _ => None,
        })
    }

    /// Contract, interface and library definitions, in order.
    pub fn contracts(&self) -> impl Iterator<Item = &ContractDefinition> {
        self.items.iter().filter_map(|item| match item {
            SourceItem::Contract(c) => Some(c),
            _ => None,
        })
    }

    /// Look up a contract by name.
    pub fn contract(&self, name: &str) -> Option<&ContractDefinition> {
        self.contracts().find(|c| c.name == name)
    }
}
