//! End-to-end exchanges against the fixture server on a loopback port.

use std::thread;

use marmot_net::{DEFAULT_DOCUMENT, FetchError, FixtureServer, Request};

#[test]
fn test_fetch_default_document() {
    let server = FixtureServer::bind("127.0.0.1:0", DEFAULT_DOCUMENT).unwrap();
    let port = server.local_addr().unwrap().port();
    let handle = thread::spawn(move || server.accept_one().unwrap());

    let request = Request::builder("127.0.0.1")
        .port(port)
        .method("POST")
        .path("/form")
        .field("name", "marmot")
        .build();
    let response = request.fetch().unwrap();
    let received = handle.join().unwrap();

    assert_eq!(response.status_code, Some(200));
    assert_eq!(response.headers.get("Content-Type"), Some("text/html"));
    assert_eq!(response.body, DEFAULT_DOCUMENT);
    assert_eq!(received.method, "POST");
    assert_eq!(received.path, "/form");
    assert_eq!(received.body, "name=marmot");
}

#[test]
fn test_fetch_custom_document() {
    let document = "<p>".repeat(300);
    let server = FixtureServer::bind("127.0.0.1:0", document.as_str()).unwrap();
    let port = server.local_addr().unwrap().port();
    let handle = thread::spawn(move || server.accept_one().unwrap());

    let response = Request::builder("127.0.0.1").port(port).build().fetch().unwrap();
    let _ = handle.join().unwrap();
    assert_eq!(response.body, document);
}

#[test]
fn test_refused_connection_is_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let port = {
        let server = FixtureServer::bind("127.0.0.1:0", "").unwrap();
        server.local_addr().unwrap().port()
    };
    let err = Request::builder("127.0.0.1").port(port).build().fetch().unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
}
