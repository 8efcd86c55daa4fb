//! Ordered header map.

use serde::{Serialize, Serializer};

/// Header fields in first-seen order.
///
/// Names are compared ASCII-case-insensitively. Inserting a name that is
/// already present replaces its value in place, keeping the original
/// spelling and position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    fields: Vec<(String, String)>,
}

impl Headers {
    /// An empty header map.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Set `name` to `value`. Returns the previous value, if any.
    pub fn insert(&mut self, name: &str, value: &str) -> Option<String> {
        if let Some((_, existing)) = self
            .fields
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            return Some(std::mem::replace(existing, value.to_string()));
        }
        self.fields.push((name.to_string(), value.to_string()));
        None
    }

    /// Value of `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether `name` is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate over `(name, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether `Transfer-Encoding` is `chunked` (ignoring case and
    /// surrounding whitespace).
    #[must_use]
    pub fn is_chunked(&self) -> bool {
        self.get("Transfer-Encoding")
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("chunked"))
    }
}

impl Serialize for Headers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut headers = Headers::new();
        assert_eq!(headers.insert("Content-Type", "text/plain"), None);
        assert_eq!(headers.insert("X-A", "1"), None);
        assert_eq!(
            headers.insert("content-type", "text/html"),
            Some("text/plain".to_string())
        );
        let fields: Vec<_> = headers.iter().collect();
        assert_eq!(fields, vec![("Content-Type", "text/html"), ("X-A", "1")]);
    }

    #[test]
    fn test_is_chunked() {
        let mut headers = Headers::new();
        assert!(!headers.is_chunked());
        let _ = headers.insert("transfer-encoding", " Chunked ");
        assert!(headers.is_chunked());
        let _ = headers.insert("Transfer-Encoding", "gzip");
        assert!(!headers.is_chunked());
    }
}
