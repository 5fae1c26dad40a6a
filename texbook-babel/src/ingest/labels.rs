//! Label registry construction.
//!
//! Kinds are not inferred: every label is registered as [`LabelKind::Unknown`].
//! Duplicate keys resolve last-write-wins, in document order.

use crate::model::{LabelDescriptor, LabelKind, LabelRegistry, StructuralUnit};
use once_cell::sync::Lazy;
use regex::Regex;

static LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\label\s*\{([^}]+)\}").unwrap());

/// Label keys in the order they are defined.
pub fn label_keys(text: &str) -> impl Iterator<Item = &str> {
    LABEL
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|key| key.as_str().trim())
        .filter(|key| !key.is_empty())
}

impl LabelRegistry {
    /// Single pass over `text`; labels carry no owning file.
    pub fn collect(text: &str) -> Self {
        let mut registry = LabelRegistry::new();
        for key in label_keys(text) {
            registry.insert(key, LabelDescriptor::unscoped(key));
        }
        registry
    }

    /// Scan each unit separately, recording the unit as the owner of its labels.
    ///
    /// The owner is the unit's output filename when one has been assigned, else its id.
    /// The number is the unit's display number.
    pub fn collect_scoped<'a, I>(units: I) -> Self
    where
        I: IntoIterator<Item = &'a StructuralUnit>,
    {
        let mut registry = LabelRegistry::new();
        for unit in units {
            let owner = if unit.filename.is_empty() {
                unit.id()
            } else {
                unit.filename.clone()
            };
            for key in label_keys(&unit.source) {
                registry.insert(
                    key,
                    LabelDescriptor {
                        kind: LabelKind::Unknown,
                        number: unit.number(),
                        title: key.to_string(),
                        file: Some(owner.clone()),
                    },
                );
            }
        }
        registry
    }
}
