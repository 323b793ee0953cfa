//! Enum member ↔ index mapping.
//!
//! Solidity enums are ABI-encoded as `uint8` indices in declaration order, so
//! test code and tooling constantly need to translate between `Status.Active`
//! and `1`. [`EnumIndexMapping`] keeps both directions:
//!
//! - member name → zero-based declaration index
//! - index → member name
//!
//! For an enum with N members the mapping holds exactly 2N entries, and the
//! indices are always the contiguous range `0..N`.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::ops::Index;

/// Bidirectional mapping between an enum's members and their indices.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnumIndexMapping {
    /// index -> member name (declaration order)
    members: Vec<String>,
    /// member name -> index
    by_name: HashMap<String, usize>,
}

/// One entry of the flattened mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingEntry<'a> {
    IndexToName(usize, &'a str),
    NameToIndex(&'a str, usize),
}

impl EnumIndexMapping {
    /// Build a mapping from members listed in declaration order.
    ///
    /// Member names are expected to be unique (the compiler rejects duplicates);
    /// if one repeats, its first position is kept for the name → index direction.
    pub fn from_members<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let members: Vec<String> = members.into_iter().map(Into::into).collect();
        let mut by_name = HashMap::with_capacity(members.len());
        for (index, name) in members.iter().enumerate() {
            by_name.entry(name.clone()).or_insert(index);
        }
        Self { members, by_name }
    }

    /// Index of a member, if declared.
    pub fn index_of(&self, member: &str) -> Option<usize> {
        self.by_name.get(member).copied()
    }

    /// Member declared at `index`, if any.
    pub fn name_of(&self, index: usize) -> Option<&str> {
        self.members.get(index).map(String::as_str)
    }

    /// Members in declaration order.
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Number of declared members (N).
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of entries in both directions (2N).
    pub fn entry_count(&self) -> usize {
        self.members.len() + self.by_name.len()
    }

    /// Iterate the flattened mapping: all index → name entries in order,
    /// followed by all name → index entries in order.
    pub fn entries(&self) -> impl Iterator<Item = MappingEntry<'_>> {
        let forward = self
            .members
            .iter()
            .enumerate()
            .map(|(i, name)| MappingEntry::IndexToName(i, name.as_str()));
        let backward = self
            .members
            .iter()
            .enumerate()
            .filter(|(i, name)| self.by_name.get(name.as_str()) == Some(i))
            .map(|(i, name)| MappingEntry::NameToIndex(name.as_str(), i));
        forward.chain(backward)
    }
}

impl Index<usize> for EnumIndexMapping {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        &self.members[index]
    }
}

impl Index<&str> for EnumIndexMapping {
    type Output = usize;

    fn index(&self, member: &str) -> &usize {
        match self.by_name.get(member) {
            Some(index) => index,
            None => panic!("enum has no member named {}", member),
        }
    }
}

/// Serializes as a flat object: `{"0": "Pending", ..., "Pending": 0, ...}`.
impl Serialize for EnumIndexMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entry_count()))?;
        for entry in self.entries() {
            match entry {
                MappingEntry::IndexToName(index, name) => {
                    map.serialize_entry(&index.to_string(), name)?
                }
                MappingEntry::NameToIndex(name, index) => map.serialize_entry(name, &index)?,
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_directions() {
        let mapping = EnumIndexMapping::from_members(["Pending", "Active", "Closed"]);

        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping.entry_count(), 6);
        assert_eq!(&mapping[0], "Pending");
        assert_eq!(&mapping[2], "Closed");
        assert_eq!(mapping["Active"], 1);
        assert_eq!(mapping.index_of("Closed"), Some(2));
        assert_eq!(mapping.name_of(3), None);
        assert_eq!(mapping.index_of("Missing"), None);
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let mapping = EnumIndexMapping::from_members(["Pending", "Active", "Closed"]);
        let value = serde_json::to_value(&mapping).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "0": "Pending", "1": "Active", "2": "Closed",
                "Pending": 0, "Active": 1, "Closed": 2,
            })
        );
    }

    #[test]
    fn test_empty_enum() {
        let mapping = EnumIndexMapping::from_members(Vec::<String>::new());
        assert!(mapping.is_empty());
        assert_eq!(mapping.entry_count(), 0);
        assert_eq!(mapping.entries().count(), 0);
    }

    #[test]
    fn test_repeated_member_keeps_first_position() {
        let mapping = EnumIndexMapping::from_members(["A", "B", "A"]);
        assert_eq!(mapping.index_of("A"), Some(0));
        assert_eq!(mapping.name_of(2), Some("A"));
        assert_eq!(mapping.entries().count(), mapping.entry_count());
    }
}
