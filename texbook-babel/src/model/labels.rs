//! Key-unique label registry.

use super::nodes::LabelDescriptor;
use serde::Serialize;
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Mapping from `\label` key to its descriptor.
///
/// Insertion overwrites: when a key is defined twice the later definition wins.
/// Builders rely on this and feed definitions in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LabelRegistry {
    entries: BTreeMap<String, LabelDescriptor>,
}

impl LabelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a label, replacing any earlier descriptor for the same key.
    ///
    /// Returns the replaced descriptor, if any.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        descriptor: LabelDescriptor,
    ) -> Option<LabelDescriptor> {
        self.entries.insert(key.into(), descriptor)
    }

    pub fn get(&self, key: &str) -> Option<&LabelDescriptor> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, LabelDescriptor> {
        self.entries.iter()
    }

    /// Overwrite every entry of `self` with the entries of `other`.
    pub fn merge(&mut self, other: LabelRegistry) {
        for (key, descriptor) in other.entries {
            self.insert(key, descriptor);
        }
    }
}

impl<'a> IntoIterator for &'a LabelRegistry {
    type Item = (&'a String, &'a LabelDescriptor);
    type IntoIter = btree_map::Iter<'a, String, LabelDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
