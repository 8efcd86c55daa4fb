//! Per-element computed style storage.
//!
//! Every element carries a [`ComputedStyle`]: a map from property name to the
//! winning raw value and the specificity of the rule that supplied it. The
//! cascade writes into it while the element is still open, so the map only
//! ever reflects rules that were known when the element was created.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Rule priority as a 4-tuple: `[inline, ids, classes, tags]`.
///
/// The inline slot is reserved and always zero here; there is no `style`
/// attribute support. Ordering is lexicographic, leftmost component most
/// significant, which is exactly the derived `Ord` of the array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Specificity(pub [u32; 4]);

impl Specificity {
    /// Build a specificity from id, class and tag counts (inline slot zero).
    #[must_use]
    pub const fn new(ids: u32, classes: u32, tags: u32) -> Self {
        Self([0, ids, classes, tags])
    }

    /// Number of `#id` parts.
    #[must_use]
    pub const fn ids(&self) -> u32 {
        self.0[1]
    }

    /// Number of `.class` parts.
    #[must_use]
    pub const fn classes(&self) -> u32 {
        self.0[2]
    }

    /// Number of tag-name parts.
    #[must_use]
    pub const fn tags(&self) -> u32 {
        self.0[3]
    }
}

impl fmt::Display for Specificity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [inline, ids, classes, tags] = self.0;
        write!(f, "({inline},{ids},{classes},{tags})")
    }
}

/// The value a property resolved to and the specificity that put it there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleEntry {
    /// Raw declaration value, e.g. `"red"` or `"1px solid black"`.
    pub value: String,
    /// Specificity of the rule the value came from.
    pub specificity: Specificity,
}

/// Cascade-resolved property map of one element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ComputedStyle {
    entries: BTreeMap<String, StyleEntry>,
}

impl ComputedStyle {
    /// Create an empty style map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Record `value` for `property` unless an existing entry has equal or
    /// higher specificity.
    ///
    /// Returns `true` if the entry was written. Equal specificity keeps the
    /// value that was applied first.
    pub fn apply(&mut self, property: &str, value: &str, specificity: Specificity) -> bool {
        match self.entries.get_mut(property) {
            Some(existing) if specificity <= existing.specificity => false,
            Some(existing) => {
                existing.value = value.to_string();
                existing.specificity = specificity;
                true
            }
            None => {
                let _ = self.entries.insert(
                    property.to_string(),
                    StyleEntry {
                        value: value.to_string(),
                        specificity,
                    },
                );
                true
            }
        }
    }

    /// Full entry for `property`, if any rule set it.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&StyleEntry> {
        self.entries.get(property)
    }

    /// Resolved value for `property`, if any rule set it.
    #[must_use]
    pub fn value(&self, property: &str) -> Option<&str> {
        self.entries.get(property).map(|e| e.value.as_str())
    }

    /// Iterate over `(property, entry)` pairs in property-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of resolved properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no property has been resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
