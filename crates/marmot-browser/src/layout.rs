//! Layout hook that records the order elements are closed in.

use marmot_dom::{DomTree, NodeId};
use marmot_html::LayoutHook;

/// Remembers every element passed to [`LayoutHook::layout`], in call order.
///
/// Children always appear before their parent. Self-closing and unclosed
/// elements never appear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutRecorder {
    order: Vec<NodeId>,
}

impl LayoutRecorder {
    /// An empty recorder.
    #[must_use]
    pub const fn new() -> Self {
        Self { order: Vec::new() }
    }

    /// Elements in the order they were laid out.
    #[must_use]
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    /// Take the recorded order.
    #[must_use]
    pub fn into_order(self) -> Vec<NodeId> {
        self.order
    }
}

impl LayoutHook for LayoutRecorder {
    fn layout(&mut self, tree: &DomTree, node: NodeId) {
        log::trace!(
            target: "marmot.browser",
            "layout <{}> ({} children)",
            tree.tag_name(node).unwrap_or_default(),
            tree.children(node).len()
        );
        self.order.push(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marmot_html::HTMLParser;

    #[test]
    fn test_children_before_parent() {
        let mut parser = HTMLParser::with_layout(LayoutRecorder::new());
        parser.feed("<div><p></p><span></span></div>").unwrap();
        let (tree, _, recorder) = parser.finish().unwrap().into_parts();
        let names: Vec<_> = recorder
            .order()
            .iter()
            .map(|&id| tree.tag_name(id).unwrap())
            .collect();
        assert_eq!(names, vec!["p", "span", "div"]);
    }
}
