//! Visitor traversal over a [`SourceUnit`].
//!
//! Nodes are visited in pre-order, in source order: top-level items one after
//! another, a contract before its members. Every callback returns
//! [`ControlFlow`]; returning `Break` stops the whole walk.
//!
//! The `'ast` lifetime lets visitors keep references to the nodes they see.

use std::ops::ControlFlow;

use crate::ast::{
    ContractDefinition, ContractMember, EnumDefinition, ImportDirective, PragmaDirective,
    SourceItem, SourceUnit, StructDefinition,
};

/// Callbacks per node kind. Unimplemented callbacks continue the walk.
pub trait Visitor<'ast> {
    fn visit_pragma(&mut self, _pragma: &'ast PragmaDirective) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_import(&mut self, _import: &'ast ImportDirective) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_contract(&mut self, _contract: &'ast ContractDefinition) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_enum(&mut self, _definition: &'ast EnumDefinition) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_struct(&mut self, _definition: &'ast StructDefinition) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// Walk the whole unit. Returns `Break` if a callback stopped the walk.
pub fn walk<'ast, V>(unit: &'ast SourceUnit, visitor: &mut V) -> ControlFlow<()>
where
    V: Visitor<'ast> + ?Sized,
{
    for item in &unit.items {
        match item {
            SourceItem::Pragma(pragma) => visitor.visit_pragma(pragma)?,
            SourceItem::Import(import) => visitor.visit_import(import)?,
            SourceItem::Contract(contract) => walk_contract(contract, visitor)?,
            SourceItem::Enum(definition) => visitor.visit_enum(definition)?,
            SourceItem::Struct(definition) => visitor.visit_struct(definition)?,
            SourceItem::Other(_) => {}
        }
    }
    ControlFlow::Continue(())
}

fn walk_contract<'ast, V>(contract: &'ast ContractDefinition, visitor: &mut V) -> ControlFlow<()>
where
    V: Visitor<'ast> + ?Sized,
{
    visitor.visit_contract(contract)?;
    for member in &contract.members {
        match member {
            ContractMember::Enum(definition) => visitor.visit_enum(definition)?,
            ContractMember::Struct(definition) => visitor.visit_struct(definition)?,
            ContractMember::Other(_) => {}
        }
    }
    ControlFlow::Continue(())
}

struct EnumVisitor<F>(F);

impl<'ast, F> Visitor<'ast> for EnumVisitor<F>
where
    F: FnMut(&'ast EnumDefinition) -> ControlFlow<()>,
{
    fn visit_enum(&mut self, definition: &'ast EnumDefinition) -> ControlFlow<()> {
        (self.0)(definition)
    }
}

/// Call `f` on every enum declaration in traversal order until it breaks.
pub fn visit_enums<'ast, F>(unit: &'ast SourceUnit, f: F) -> ControlFlow<()>
where
    F: FnMut(&'ast EnumDefinition) -> ControlFlow<()>,
{
    walk(unit, &mut EnumVisitor(f))
}

/// The first enum named `name` in traversal order.
pub fn find_enum<'ast>(unit: &'ast SourceUnit, name: &str) -> Option<&'ast EnumDefinition> {
    let mut found = None;
    let _ = visit_enums(unit, |definition| {
        if definition.name != name {
            return ControlFlow::Continue(());
        }
        found = Some(definition);
        ControlFlow::Break(())
    });
    found
}

/// All enum declarations in traversal order.
pub fn collect_enums(unit: &SourceUnit) -> Vec<&EnumDefinition> {
    let mut enums = Vec::new();
    let _ = visit_enums(unit, |definition| {
        enums.push(definition);
        ControlFlow::Continue(())
    });
    enums
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_source;
    use pretty_assertions::assert_eq;

    const SOURCE: &str = r#"
        pragma solidity ^0.8.0;
        import "./Base.sol";

        enum Global { One, Two }

        contract Market is Base {
            struct Order { uint256 id; Side side; }
            enum Side { Buy, Sell }
            function place() external {}
            enum Side { Bid, Ask }
        }
    "#;

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl<'ast> Visitor<'ast> for Recorder {
        fn visit_pragma(&mut self, pragma: &'ast PragmaDirective) -> ControlFlow<()> {
            self.0.push(format!("pragma {}", pragma.name));
            ControlFlow::Continue(())
        }
        fn visit_import(&mut self, import: &'ast ImportDirective) -> ControlFlow<()> {
            self.0.push(format!("import {}", import.path));
            ControlFlow::Continue(())
        }
        fn visit_contract(&mut self, contract: &'ast ContractDefinition) -> ControlFlow<()> {
            self.0.push(format!("contract {}", contract.name));
            ControlFlow::Continue(())
        }
        fn visit_enum(&mut self, definition: &'ast EnumDefinition) -> ControlFlow<()> {
            self.0.push(format!("enum {}", definition.name));
            ControlFlow::Continue(())
        }
        fn visit_struct(&mut self, definition: &'ast StructDefinition) -> ControlFlow<()> {
            self.0.push(format!("struct {}", definition.name));
            ControlFlow::Continue(())
        }
    }

    #[test]
    fn test_preorder_source_order() {
        let unit = parse_source(SOURCE).unwrap();
        let mut recorder = Recorder::default();
        assert_eq!(walk(&unit, &mut recorder), ControlFlow::Continue(()));
        assert_eq!(
            recorder.0,
            vec![
                "pragma solidity",
                "import ./Base.sol",
                "enum Global",
                "contract Market",
                "struct Order",
                "enum Side",
                "enum Side",
            ]
        );
    }

    #[test]
    fn test_find_enum_first_match_wins() {
        let unit = parse_source(SOURCE).unwrap();
        let side = find_enum(&unit, "Side").unwrap();
        assert_eq!(side.members, vec!["Buy", "Sell"]);
        assert!(find_enum(&unit, "Missing").is_none());
    }

    #[test]
    fn test_break_stops_walk() {
        let unit = parse_source(SOURCE).unwrap();
        let mut seen = 0;
        let flow = visit_enums(&unit, |_| {
            seen += 1;
            ControlFlow::Break(())
        });
        assert_eq!(flow, ControlFlow::Break(()));
        assert_eq!(seen, 1);
        assert_eq!(collect_enums(&unit).len(), 3);
    }
}
