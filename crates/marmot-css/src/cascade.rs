//! Incremental cascade.
//!
//! Style is resolved once per element, at the moment its start tag is seen,
//! against the rules collected so far. Rules from a `<style>` block that
//! closes later never reach elements created before it.

use marmot_dom::{DomTree, ElementData, NodeId};

use crate::parser::CssRule;

/// Apply every matching rule in `rules`, in order, to `element`'s computed
/// style.
///
/// `open_elements` is the open-element stack at the time `element` was
/// created (the element itself not yet pushed). Only a rule's first selector
/// is matched. Returns the number of rules that matched.
pub fn apply_rules(
    element: &mut ElementData,
    tree: &DomTree,
    open_elements: &[NodeId],
    rules: &[CssRule],
) -> usize {
    let mut matched = 0;
    for rule in rules {
        let Some(selector) = rule.selector() else {
            continue;
        };
        if !selector.matches(element, tree, open_elements) {
            continue;
        }
        matched += 1;
        let specificity = selector.specificity();
        for decl in &rule.declarations {
            let _ = element
                .computed_style
                .apply(&decl.property, &decl.value, specificity);
        }
    }
    matched
}
