use marmot_css::{CssRule, apply_rules, parse_stylesheet};
use marmot_dom::{Attribute, DomTree, ElementData, NodeId, NodeType};

use crate::error::ParseError;
use crate::tokenizer::{Token, TokenSink};

/// Receives each element once its end tag has been processed, before it is
/// popped off the open-element stack.
///
/// Self-closing elements are never pushed, so they are never passed here.
pub trait LayoutHook {
    /// Called once per closed element. `node`'s subtree is complete.
    fn layout(&mut self, tree: &DomTree, node: NodeId);
}

/// A [`LayoutHook`] that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLayout;

impl LayoutHook for NoLayout {
    fn layout(&mut self, _tree: &DomTree, _node: NodeId) {}
}

/// Builds a DOM tree from tokens, resolving styles as elements open.
///
/// The open-element stack starts with the Document and is never empty.
/// Every start tag creates an element, computes its style from the rules of
/// the `<style>` blocks closed so far, and appends it to the current node; it
/// is pushed unless self-closing. Every end tag must name the current node.
pub struct TreeBuilder<H = NoLayout> {
    tree: DomTree,
    stack_of_open_elements: Vec<NodeId>,
    // Text node receiving character data until the next tag.
    current_text: Option<NodeId>,
    rules: Vec<CssRule>,
    layout: H,
}

impl TreeBuilder<NoLayout> {
    /// A builder without a layout hook.
    #[must_use]
    pub fn new() -> Self {
        Self::with_layout(NoLayout)
    }
}

impl Default for TreeBuilder<NoLayout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: LayoutHook> TreeBuilder<H> {
    /// A builder that reports closed elements to `layout`.
    #[must_use]
    pub fn with_layout(layout: H) -> Self {
        Self {
            tree: DomTree::new(),
            stack_of_open_elements: vec![NodeId::ROOT],
            current_text: None,
            rules: Vec::new(),
            layout,
        }
    }

    /// The tree built so far.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Rules collected from closed `<style>` elements, in document order.
    #[must_use]
    pub fn rules(&self) -> &[CssRule] {
        &self.rules
    }

    /// Open-element stack, Document first.
    #[must_use]
    pub fn open_elements(&self) -> &[NodeId] {
        &self.stack_of_open_elements
    }

    /// The node new children are appended to.
    #[must_use]
    pub fn current_node(&self) -> NodeId {
        self.stack_of_open_elements
            .last()
            .copied()
            .unwrap_or(NodeId::ROOT)
    }

    /// The layout hook.
    #[must_use]
    pub const fn layout_hook(&self) -> &H {
        &self.layout
    }

    /// Finish building and return the tree, the collected rules and the hook.
    ///
    /// Elements still open are left in the tree as they are.
    #[must_use]
    pub fn into_parts(self) -> (DomTree, Vec<CssRule>, H) {
        (self.tree, self.rules, self.layout)
    }

    /// Finish building and return just the tree.
    #[must_use]
    pub fn into_tree(self) -> DomTree {
        self.tree
    }

    fn insert_element(&mut self, name: String, attributes: Vec<Attribute>, self_closing: bool) {
        let mut element = ElementData::new(name, attributes);
        let _ = apply_rules(
            &mut element,
            &self.tree,
            &self.stack_of_open_elements,
            &self.rules,
        );

        let parent = self.current_node();
        let id = self.tree.alloc(NodeType::Element(element));
        self.tree.append_child(parent, id);
        if !self_closing {
            self.stack_of_open_elements.push(id);
        }
        self.current_text = None;
    }

    fn close_element(&mut self, name: &str) -> Result<(), ParseError> {
        let current = self.current_node();
        let open = self.tree.tag_name(current);
        if open != Some(name) {
            return Err(ParseError::StructuralMismatch {
                open: open.map(str::to_string),
                found: name.to_string(),
            });
        }

        if name == "style" {
            self.collect_style_rules(current);
        }
        self.layout.layout(&self.tree, current);
        let _ = self.stack_of_open_elements.pop();
        self.current_text = None;
        Ok(())
    }

    /// Parse the text of a closing `<style>` element and append its rules.
    fn collect_style_rules(&mut self, style: NodeId) {
        let css = self
            .tree
            .first_child(style)
            .and_then(|child| self.tree.as_text(child))
            .unwrap_or_default();
        let rules = parse_stylesheet(css);
        self.rules.extend(rules);
    }

    fn insert_text(&mut self, data: &str) {
        if let Some(text) = self.current_text
            && self.tree.append_text(text, data)
        {
            return;
        }
        let parent = self.current_node();
        let id = self.tree.alloc(NodeType::Text(data.to_string()));
        self.tree.append_child(parent, id);
        self.current_text = Some(id);
    }
}

impl<H: LayoutHook> TokenSink for TreeBuilder<H> {
    fn process_token(&mut self, token: Token) -> Result<(), ParseError> {
        match token {
            Token::StartTag {
                name,
                self_closing,
                attributes,
            } => {
                self.insert_element(name, attributes, self_closing);
                Ok(())
            }
            Token::EndTag { name } => self.close_element(&name),
            Token::Text { data } => {
                self.insert_text(&data);
                Ok(())
            }
            // Unclosed elements stay in the tree.
            Token::EndOfInput => Ok(()),
        }
    }
}
