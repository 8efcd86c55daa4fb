//! Selector parsing and matching.
//!
//! Supports the three simple forms `#id`, `.class` and a bare tag name,
//! joined by whitespace (descendant). Matching runs while the document is
//! still being built, so ancestors come from the open-element stack rather
//! than from a finished tree.

use marmot_dom::{DomTree, ElementData, NodeId, Specificity};
use serde::Serialize;

/// One whitespace-separated piece of a selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum SelectorPart {
    /// `#name`: the element's `id` attribute equals `name`.
    Id(String),
    /// `.name`: the element's whole `class` attribute equals `name`.
    ///
    /// The attribute is not split into tokens, so `.a` does not match
    /// `class="a b"`.
    Class(String),
    /// A bare name: the element's tag name equals it exactly.
    Tag(String),
}

impl SelectorPart {
    fn parse(text: &str) -> Self {
        if let Some(id) = text.strip_prefix('#') {
            Self::Id(id.to_string())
        } else if let Some(class) = text.strip_prefix('.') {
            Self::Class(class.to_string())
        } else {
            Self::Tag(text.to_string())
        }
    }

    /// Whether this part matches `element`. Comparison is exact.
    #[must_use]
    pub fn matches(&self, element: &ElementData) -> bool {
        match self {
            Self::Id(id) => element.id() == Some(id.as_str()),
            Self::Class(class) => element.class() == Some(class.as_str()),
            Self::Tag(tag) => element.tag_name == *tag,
        }
    }
}

/// A selector such as `body div #main`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selector {
    /// Source text, trimmed.
    pub text: String,
    /// Parts in source order (outermost ancestor first, subject last).
    pub parts: Vec<SelectorPart>,
}

impl Selector {
    /// Split `text` on whitespace into parts.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self {
            text: text.trim().to_string(),
            parts: text.split_whitespace().map(SelectorPart::parse).collect(),
        }
    }

    /// `[0, ids, classes, tags]` counted over every part.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        let (mut ids, mut classes, mut tags) = (0u32, 0u32, 0u32);
        for part in &self.parts {
            match part {
                SelectorPart::Id(_) => ids += 1,
                SelectorPart::Class(_) => classes += 1,
                SelectorPart::Tag(_) => tags += 1,
            }
        }
        Specificity::new(ids, classes, tags)
    }

    /// Match against `element`, whose ancestors are `open_elements`
    /// (bottom of the stack first, the element itself not included).
    ///
    /// The subject part must match `element`. The remaining parts are then
    /// consumed right to left by a single walk from the nearest ancestor
    /// outward: each ancestor that satisfies the current part advances the
    /// cursor, and the cursor never moves back. The selector matches iff every
    /// part was consumed. Unlike full descendant matching there is no
    /// backtracking, so the first ancestor that fits a part always takes it.
    #[must_use]
    pub fn matches(&self, element: &ElementData, tree: &DomTree, open_elements: &[NodeId]) -> bool {
        let mut reversed = self.parts.iter().rev();
        let Some(subject) = reversed.next() else {
            return false;
        };
        if !subject.matches(element) {
            return false;
        }

        let rest: Vec<&SelectorPart> = reversed.collect();
        let mut cursor = 0;
        for &ancestor in open_elements.iter().rev() {
            let Some(part) = rest.get(cursor) else {
                break;
            };
            // The Document at the bottom of the stack is not an element and
            // never matches.
            if tree.as_element(ancestor).is_some_and(|data| part.matches(data)) {
                cursor += 1;
            }
        }
        cursor == rest.len()
    }
}
