//! Integration tests for the fetch-and-parse pipeline.

use std::thread;

use marmot_browser::{LoadError, load_document, load_file, parse_html_string};
use marmot_dom::NodeId;
use marmot_html::{ParseError, Token};
use marmot_net::{DEFAULT_DOCUMENT, FixtureServer, Request};

#[test]
fn test_id_beats_class() {
    let doc = parse_html_string(
        "<style>#a { color: red } .b { color: blue }</style><p id=\"a\" class=\"b\"></p>",
    )
    .unwrap();
    let p = doc.dom.find_element(NodeId::ROOT, "p").unwrap();
    let style = &doc.dom.as_element(p).unwrap().computed_style;
    assert_eq!(style.value("color"), Some("red"));
    assert_eq!(doc.rules.len(), 2);
}

#[test]
fn test_layout_order_children_first() {
    let doc = parse_html_string("<html><body><div></div><p></p></body></html>").unwrap();
    let names: Vec<_> = doc
        .layout_order
        .iter()
        .map(|&id| doc.dom.tag_name(id).unwrap())
        .collect();
    assert_eq!(names, vec!["div", "p", "body", "html"]);
}

#[test]
fn test_mismatch_is_parse_error() {
    let err = parse_html_string("<div><span></div>").unwrap_err();
    assert!(matches!(
        err,
        LoadError::Parse(ParseError::StructuralMismatch { .. })
    ));
}

#[test]
fn test_tokens_and_css_text() {
    let doc = parse_html_string("<style>p{color:red}</style><p>x</p>").unwrap();
    assert_eq!(doc.css_text(), "p{color:red}");
    let tokens = doc.tokens();
    assert_eq!(tokens.first().and_then(Token::tag_name), Some("style"));
    assert!(tokens.last().is_some_and(Token::is_end_of_input));
}

#[test]
fn test_dom_serializes_to_json() {
    let doc = parse_html_string("<p class=\"c\">hi</p>").unwrap();
    let json = serde_json::to_value(doc.dom.view(NodeId::ROOT)).unwrap();
    assert_eq!(json["type"], "document");
    assert_eq!(json["children"][0]["tagName"], "p");
    assert_eq!(json["children"][0]["children"][0]["content"], "hi");
}

#[test]
fn test_missing_file() {
    let err = load_file(std::path::Path::new("/nonexistent/marmot.html")).unwrap_err();
    assert!(matches!(err, LoadError::File { .. }));
}

#[test]
fn test_load_from_fixture_server() {
    let server = FixtureServer::bind("127.0.0.1:0", DEFAULT_DOCUMENT).unwrap();
    let port = server.local_addr().unwrap().port();
    let handle = thread::spawn(move || server.accept_one().unwrap());

    let request = Request::builder("127.0.0.1").port(port).build();
    let doc = load_document(&request).unwrap();
    let _ = handle.join().unwrap();

    assert_eq!(doc.response.as_ref().and_then(|r| r.status_code), Some(200));
    assert_eq!(doc.source, format!("127.0.0.1:{port}/"));

    let img = doc.dom.find_element(NodeId::ROOT, "img").unwrap();
    let style = &doc.dom.as_element(img).unwrap().computed_style;
    assert_eq!(style.value("width"), Some("100px"));
    assert_eq!(style.value("background-color"), Some("#ff5000"));

    let p = doc.dom.find_element(NodeId::ROOT, "p").unwrap();
    let style = &doc.dom.as_element(p).unwrap().computed_style;
    assert_eq!(style.value("color"), Some("green"));
}
