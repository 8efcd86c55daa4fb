//! Integration tests for selector matching and the cascade.

use marmot_css::{CssRule, apply_rules, parse_stylesheet};
use marmot_dom::{Attribute, DomTree, ElementData, NodeId, NodeType, Specificity};
use quickcheck_macros::quickcheck;

fn make_element(tag: &str, id: Option<&str>, class: Option<&str>) -> ElementData {
    let mut attrs = Vec::new();
    if let Some(id) = id {
        attrs.push(Attribute::new("id".to_string(), id.to_string()));
    }
    if let Some(class) = class {
        attrs.push(Attribute::new("class".to_string(), class.to_string()));
    }
    ElementData::new(tag.to_string(), attrs)
}

/// Build a chain of open elements under the Document and return the tree and
/// the stack (Document first).
fn open_chain(elements: Vec<ElementData>) -> (DomTree, Vec<NodeId>) {
    let mut tree = DomTree::new();
    let mut stack = vec![NodeId::ROOT];
    for data in elements {
        let id = tree.alloc(NodeType::Element(data));
        let parent = *stack.last().unwrap();
        tree.append_child(parent, id);
        stack.push(id);
    }
    (tree, stack)
}

fn style_of(element: &mut ElementData, tree: &DomTree, stack: &[NodeId], rules: &[CssRule]) {
    let _ = apply_rules(element, tree, stack, rules);
}

#[test]
fn test_id_beats_class() {
    let rules = parse_stylesheet("#a { color: red } .b { color: blue }");
    let (tree, stack) = open_chain(vec![]);
    let mut el = make_element("div", Some("a"), Some("b"));
    style_of(&mut el, &tree, &stack, &rules);
    assert_eq!(el.computed_style.value("color"), Some("red"));

    // Order does not matter when specificity differs.
    let rules = parse_stylesheet(".b { color: blue } #a { color: red }");
    let mut el = make_element("div", Some("a"), Some("b"));
    style_of(&mut el, &tree, &stack, &rules);
    assert_eq!(el.computed_style.value("color"), Some("red"));
}

#[test]
fn test_equal_specificity_first_rule_wins() {
    let rules = parse_stylesheet("p { color: red } p { color: blue; margin: 0 }");
    let (tree, stack) = open_chain(vec![]);
    let mut el = make_element("p", None, None);
    style_of(&mut el, &tree, &stack, &rules);
    assert_eq!(el.computed_style.value("color"), Some("red"));
    assert_eq!(el.computed_style.value("margin"), Some("0"));
}

#[test]
fn test_descendant_selector_uses_ancestors() {
    let rules = parse_stylesheet("body div p { color: green }");
    let (tree, stack) = open_chain(vec![
        make_element("body", None, None),
        make_element("section", None, None),
        make_element("div", None, None),
    ]);
    let mut el = make_element("p", None, None);
    style_of(&mut el, &tree, &stack, &rules);
    let entry = el.computed_style.get("color").unwrap();
    assert_eq!(entry.value, "green");
    assert_eq!(entry.specificity, Specificity::new(0, 0, 3));
}

#[test]
fn test_ancestor_order_must_follow_selector() {
    // "div body p" needs a body inside a div; the stack has the reverse.
    let rules = parse_stylesheet("div body p { color: green }");
    let (tree, stack) = open_chain(vec![
        make_element("body", None, None),
        make_element("div", None, None),
    ]);
    let mut el = make_element("p", None, None);
    style_of(&mut el, &tree, &stack, &rules);
    assert!(el.computed_style.is_empty());
}

#[test]
fn test_cursor_takes_nearest_matching_ancestor() {
    // The nearest `.x` ancestor satisfies the first remaining part and the
    // walk continues outward from there.
    let rules = parse_stylesheet(".x .x span { color: red }");
    let (tree, stack) = open_chain(vec![
        make_element("div", None, Some("x")),
        make_element("div", None, None),
        make_element("div", None, Some("x")),
    ]);
    let mut el = make_element("span", None, None);
    style_of(&mut el, &tree, &stack, &rules);
    assert_eq!(el.computed_style.value("color"), Some("red"));

    let (tree, stack) = open_chain(vec![make_element("div", None, Some("x"))]);
    let mut el = make_element("span", None, None);
    style_of(&mut el, &tree, &stack, &rules);
    assert!(el.computed_style.is_empty());
}

#[test]
fn test_subject_must_match_element() {
    let rules = parse_stylesheet("div span { color: red }");
    let (tree, stack) = open_chain(vec![make_element("div", None, None)]);
    let mut el = make_element("p", None, None);
    style_of(&mut el, &tree, &stack, &rules);
    assert!(el.computed_style.is_empty());
}

#[test]
fn test_more_specific_descendant_overrides_bare_tag() {
    let rules = parse_stylesheet("p { color: red } div p { color: blue } #n { width: 1px }");
    let (tree, stack) = open_chain(vec![make_element("div", None, None)]);
    let mut el = make_element("p", Some("n"), None);
    assert_eq!(apply_rules(&mut el, &tree, &stack, &rules), 3);
    assert_eq!(el.computed_style.value("color"), Some("blue"));
    assert_eq!(el.computed_style.value("width"), Some("1px"));
    assert_eq!(el.computed_style.len(), 2);
}

#[quickcheck]
fn prop_tie_keeps_first_value(first: u8, second: u8) -> bool {
    let css = format!("p {{ z-index: {first} }} p {{ z-index: {second} }}");
    let rules = parse_stylesheet(&css);
    let (tree, stack) = open_chain(vec![]);
    let mut el = make_element("p", None, None);
    style_of(&mut el, &tree, &stack, &rules);
    el.computed_style.value("z-index") == Some(first.to_string().as_str())
}
