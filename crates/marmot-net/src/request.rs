//! HTTP/1.1 request construction and serialization.

use std::fmt;

use serde::ser::{Serialize, Serializer};

use crate::headers::Headers;

/// Content type used when a request does not name one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// An outgoing request. Built with [`Request::builder`] and immutable after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: String,
    host: String,
    port: u16,
    path: String,
    headers: Headers,
    body: Vec<(String, String)>,
    body_text: String,
}

impl Request {
    /// Start building a request to `host`.
    #[must_use]
    pub fn builder(host: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(host)
    }

    /// Request method, e.g. `GET`.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Host to connect to.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port to connect to.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Request target.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Headers as sent, including the derived `Content-Type` and
    /// `Content-Length`.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Body fields in insertion order.
    #[must_use]
    pub fn body_fields(&self) -> &[(String, String)] {
        &self.body
    }

    /// Serialized body.
    #[must_use]
    pub fn body_text(&self) -> &str {
        &self.body_text
    }

    /// The full request as written to the wire.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} HTTP/1.1\r\n", self.method, self.path)?;
        for (name, value) in self.headers.iter() {
            write!(f, "{name}: {value}\r\n")?;
        }
        write!(f, "\r\n{}", self.body_text)
    }
}

/// Builder for [`Request`].
///
/// Defaults: method `GET`, port 80, path `/`, no headers, empty body.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: String,
    host: String,
    port: u16,
    path: String,
    headers: Headers,
    body: Vec<(String, String)>,
}

impl RequestBuilder {
    /// A builder for a request to `host` with every other field defaulted.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            method: "GET".to_string(),
            host: host.into(),
            port: 80,
            path: "/".to_string(),
            headers: Headers::new(),
            body: Vec::new(),
        }
    }

    /// Set the method.
    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Set the port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the request target.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Add or replace a header.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        let _ = self.headers.insert(name, value);
        self
    }

    /// Append a body field. A repeated key replaces the earlier value.
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        if let Some((_, existing)) = self.body.iter_mut().find(|(k, _)| *k == key) {
            *existing = value;
        } else {
            self.body.push((key, value));
        }
        self
    }

    /// Finish the request, deriving the body text, `Content-Type` and
    /// `Content-Length`.
    ///
    /// The body is JSON for `application/json`, form-urlencoded for
    /// `application/x-www-form-urlencoded` and empty for any other type.
    #[must_use]
    pub fn build(self) -> Request {
        let mut headers = self.headers;
        if !headers.contains("Content-Type") {
            let _ = headers.insert("Content-Type", DEFAULT_CONTENT_TYPE);
        }
        let content_type = headers.get("Content-Type").unwrap_or_default();
        let body_text = encode_body(content_type, &self.body);
        let _ = headers.insert("Content-Length", &body_text.len().to_string());

        Request {
            method: self.method,
            host: self.host,
            port: self.port,
            path: self.path,
            headers,
            body: self.body,
            body_text,
        }
    }
}

fn encode_body(content_type: &str, fields: &[(String, String)]) -> String {
    match content_type {
        "application/json" => serde_json::to_string(&JsonFields(fields)).unwrap_or_default(),
        DEFAULT_CONTENT_TYPE => url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish(),
        _ => String::new(),
    }
}

// Serializes fields as a JSON object in insertion order.
struct JsonFields<'a>(&'a [(String, String)]);

impl Serialize for JsonFields<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}
