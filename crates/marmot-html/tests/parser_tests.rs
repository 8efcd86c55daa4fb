//! Integration tests for tree construction and the incremental cascade.

use marmot_dom::{DomTree, NodeId, NodeType, Specificity};
use marmot_html::{HTMLParser, LayoutHook, ParseError, format_tree, parse_html};
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

/// Helper to parse HTML and return the DOM tree
fn parse(html: &str) -> DomTree {
    parse_html(html).expect("well-formed input")
}

/// Helper to get element by tag name (first match, depth-first)
fn find_element(tree: &DomTree, tag: &str) -> NodeId {
    tree.find_element(NodeId::ROOT, tag)
        .unwrap_or_else(|| panic!("no <{tag}> in tree"))
}

fn style_value<'a>(tree: &'a DomTree, id: NodeId, property: &str) -> Option<&'a str> {
    tree.as_element(id)?.computed_style.value(property)
}

#[test]
fn test_document_structure() {
    let tree = parse("<html><head></head><body></body></html>");
    let root = tree.get(NodeId::ROOT).unwrap();
    assert!(matches!(root.node_type, NodeType::Document));
    assert_eq!(root.children.len(), 1);

    let html = find_element(&tree, "html");
    let children: Vec<_> = tree
        .children(html)
        .iter()
        .filter_map(|&id| tree.tag_name(id))
        .collect();
    assert_eq!(children, vec!["head", "body"]);
}

#[test]
fn test_matched_nesting() {
    let tree = parse("<div><span></span></div>");
    let div = find_element(&tree, "div");
    assert_eq!(tree.children(div).len(), 1);
    assert_eq!(tree.tag_name(tree.children(div)[0]), Some("span"));
}

#[test]
fn test_mismatched_end_tag_is_an_error() {
    let err = parse_html("<div><span></div>").unwrap_err();
    assert_eq!(
        err,
        ParseError::StructuralMismatch {
            open: Some("span".into()),
            found: "div".into(),
        }
    );
}

#[test]
fn test_heading_levels_do_not_close_each_other() {
    let err = parse_html("<h1>x</h2>").unwrap_err();
    assert_eq!(
        err,
        ParseError::StructuralMismatch {
            open: Some("h1".into()),
            found: "h2".into(),
        }
    );
}

#[test]
fn test_selector_with_digit_matches() {
    let tree = parse("<style>h1 { color: red }</style><h1>x</h1><h2>y</h2>");
    assert_eq!(style_value(&tree, find_element(&tree, "h1"), "color"), Some("red"));
    assert_eq!(style_value(&tree, find_element(&tree, "h2"), "color"), None);
}

#[test]
fn test_stray_end_tag_is_an_error() {
    assert!(matches!(
        parse_html("text</p>"),
        Err(ParseError::StructuralMismatch { open: None, .. })
    ));
}

#[test]
fn test_unclosed_elements_are_kept() {
    let tree = parse("<div><p>open");
    let p = find_element(&tree, "p");
    assert_eq!(tree.text_content(p), "open");
    assert_eq!(tree.parent(p), Some(find_element(&tree, "div")));
}

#[test]
fn test_self_closing_elements_have_no_children() {
    let tree = parse("<p>a<br/>b</p>");
    let p = find_element(&tree, "p");
    let kinds: Vec<String> = tree
        .children(p)
        .iter()
        .map(|&id| match &tree.get(id).unwrap().node_type {
            NodeType::Element(data) => format!("<{}>", data.tag_name),
            NodeType::Text(text) => text.clone(),
            NodeType::Document => "document".into(),
        })
        .collect();
    assert_eq!(kinds, vec!["a", "<br>", "b"]);
}

#[test]
fn test_text_across_fragments_is_one_node() {
    let mut parser = HTMLParser::new();
    for fragment in ["<p>Hel", "lo, ", "wor", "ld</p>"] {
        parser.feed(fragment).unwrap();
    }
    let tree = parser.finish().unwrap().into_tree();
    let p = find_element(&tree, "p");
    assert_eq!(tree.children(p).len(), 1);
    assert_eq!(tree.as_text(tree.children(p)[0]), Some("Hello, world"));
}

#[test]
fn test_style_applies_to_later_elements_only() {
    let tree = parse(
        "<html><head><p>early</p><style>p { color: red }</style></head>\
         <body><p>late</p></body></html>",
    );
    let early = find_element(&tree, "head");
    let early_p = tree.children(early)[0];
    let late_p = find_element(&tree, "body");
    let late_p = tree.children(late_p)[0];

    assert_eq!(style_value(&tree, early_p, "color"), None);
    assert_eq!(style_value(&tree, late_p, "color"), Some("red"));
}

#[test]
fn test_style_element_does_not_style_itself_or_its_ancestors() {
    let tree = parse("<div><style>div { width: 1px } style { color: red }</style></div><div></div>");
    let divs = tree.children(NodeId::ROOT);
    let style = tree.children(divs[0])[0];
    assert_eq!(style_value(&tree, divs[0], "width"), None);
    assert_eq!(style_value(&tree, style, "color"), None);
    assert_eq!(style_value(&tree, divs[1], "width"), Some("1px"));
}

#[test]
fn test_id_beats_class_in_document() {
    let tree = parse(
        r#"<style>#a { color: red } .b { color: blue }</style><div id="a" class="b"></div>"#,
    );
    let div = find_element(&tree, "div");
    let entry = tree
        .as_element(div)
        .unwrap()
        .computed_style
        .get("color")
        .unwrap();
    assert_eq!(entry.value, "red");
    assert_eq!(entry.specificity, Specificity::new(1, 0, 0));
}

#[test]
fn test_rules_from_several_style_blocks_accumulate() {
    let html = "<style>p { color: red }</style><style>p { color: blue } p { margin: 0 }</style><p></p>";
    let mut parser = HTMLParser::new();
    parser.feed(html).unwrap();
    assert_eq!(parser.rules().len(), 3);
    let tree = parser.finish().unwrap().into_tree();
    let p = find_element(&tree, "p");
    assert_eq!(style_value(&tree, p, "color"), Some("red"));
    assert_eq!(style_value(&tree, p, "margin"), Some("0"));
}

#[test]
fn test_descendant_rule_uses_open_elements() {
    let tree = parse(
        r#"<style>body .content p { color: green }</style><body><div class="content"><section><p>x</p></section></div><p>y</p></body>"#,
    );
    let section = find_element(&tree, "section");
    let inner = tree.children(section)[0];
    assert_eq!(style_value(&tree, inner, "color"), Some("green"));

    let body = find_element(&tree, "body");
    let outer = *tree.children(body).last().unwrap();
    assert_eq!(style_value(&tree, outer, "color"), None);
}

#[derive(Default)]
struct Recorder {
    closed: Vec<String>,
}

impl LayoutHook for Recorder {
    fn layout(&mut self, tree: &DomTree, node: NodeId) {
        self.closed
            .push(tree.tag_name(node).unwrap_or_default().to_string());
    }
}

#[test]
fn test_layout_hook_sees_elements_in_close_order() {
    let mut parser = HTMLParser::with_layout(Recorder::default());
    parser
        .feed("<html><body><p>a</p><img/><div><span></span></div></body></html>")
        .unwrap();
    let (_, _, recorder) = parser.finish().unwrap().into_parts();
    assert_eq!(recorder.closed, vec!["p", "span", "div", "body", "html"]);
}

#[test]
fn test_format_tree_shows_styles() {
    let tree = parse(r#"<style>p { color: red }</style><p class="x">hi</p>"#);
    let outline = format_tree(&tree, NodeId::ROOT);
    assert!(outline.starts_with("Document\n"));
    assert!(outline.contains("  <p class=\"x\"> { color: red }\n"));
    assert!(outline.contains("    \"hi\"\n"));
}

/// A random well-formed tree of nested elements.
#[derive(Debug, Clone)]
struct Nested(Vec<Nested>);

impl Nested {
    fn arbitrary_with_depth(g: &mut Gen, depth: usize) -> Self {
        if depth == 0 {
            return Self(Vec::new());
        }
        let count = usize::arbitrary(g) % 4;
        Self(
            (0..count)
                .map(|_| Self::arbitrary_with_depth(g, depth - 1))
                .collect(),
        )
    }

    fn to_html(&self, depth: usize, out: &mut String) {
        let tag = ["div", "span", "p", "section"][depth % 4];
        for child in &self.0 {
            out.push_str(&format!("<{tag}>"));
            child.to_html(depth + 1, out);
            out.push_str(&format!("</{tag}>"));
        }
    }

    fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        let children = tree.children(id);
        children.len() == self.0.len()
            && children
                .iter()
                .zip(&self.0)
                .all(|(&child, expected)| expected.matches(tree, child))
    }
}

impl Arbitrary for Nested {
    fn arbitrary(g: &mut Gen) -> Self {
        Self::arbitrary_with_depth(g, 4)
    }
}

#[quickcheck]
fn prop_nesting_survives_tokenize_and_build(nested: Nested) -> bool {
    let mut html = String::new();
    nested.to_html(0, &mut html);
    parse_html(&html).is_ok_and(|tree| nested.matches(&tree, NodeId::ROOT))
}
