use core::fmt;

pub use marmot_dom::Attribute;

/// The tokenizer's output: structural tokens for the tree builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `<name attr=value ...>` or `<name ... />`.
    StartTag {
        /// Tag name as written (letters only, case preserved).
        name: String,
        /// Set by a `/` right before the closing `>`.
        self_closing: bool,
        /// Attributes in source order, names unique.
        attributes: Vec<Attribute>,
    },

    /// `</name>`. Attributes on end tags are parsed and discarded.
    EndTag {
        /// Tag name as written.
        name: String,
    },

    /// A run of character data.
    Text {
        /// The characters, unmodified.
        data: String,
    },

    /// Emitted once, after the last byte of input.
    EndOfInput,
}

impl Token {
    /// A start tag with an empty name, no attributes and the self-closing flag
    /// unset.
    #[must_use]
    pub const fn new_start_tag() -> Self {
        Self::StartTag {
            name: String::new(),
            self_closing: false,
            attributes: Vec::new(),
        }
    }

    /// An end tag with an empty name.
    #[must_use]
    pub const fn new_end_tag() -> Self {
        Self::EndTag {
            name: String::new(),
        }
    }

    /// A text token holding `data`.
    #[must_use]
    pub fn new_text(data: &str) -> Self {
        Self::Text {
            data: data.to_string(),
        }
    }

    /// Returns true for [`Token::EndOfInput`].
    #[must_use]
    pub const fn is_end_of_input(&self) -> bool {
        matches!(self, Self::EndOfInput)
    }

    /// Tag name of a start or end tag.
    #[must_use]
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Self::StartTag { name, .. } | Self::EndTag { name } => Some(name),
            _ => None,
        }
    }

    // Mutation helpers for use during tokenization. Calling one on the wrong
    // variant is a tokenizer bug.

    /// Append `c` to the tag name.
    ///
    /// ```
    /// use marmot_html::Token;
    ///
    /// let mut tag = Token::new_start_tag();
    /// tag.append_to_tag_name('h');
    /// tag.append_to_tag_name('1');
    /// assert_eq!(tag.tag_name(), Some("h1"));
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if called on a non-tag token, indicating a tokenizer bug.
    pub fn append_to_tag_name(&mut self, c: char) {
        match self {
            Self::StartTag { name, .. } | Self::EndTag { name } => name.push(c),
            _ => panic!("append_to_tag_name called on non-tag token"),
        }
    }

    /// Set the self-closing flag. Ignored on end tags (`<br/>` style end tags
    /// do not exist here).
    ///
    /// # Panics
    ///
    /// Panics if called on a non-tag token, indicating a tokenizer bug.
    pub fn set_self_closing(&mut self) {
        match self {
            Self::StartTag { self_closing, .. } => *self_closing = true,
            Self::EndTag { .. } => {}
            _ => panic!("set_self_closing called on non-tag token"),
        }
    }

    /// Add a finished attribute to a start tag.
    ///
    /// An attribute whose name is already present replaces that attribute's
    /// value in place, so the last value wins and the first position is kept.
    /// Attributes on end tags are dropped. Returns `false` if `attribute`
    /// replaced an existing one.
    ///
    /// # Panics
    ///
    /// Panics if called on a non-tag token, indicating a tokenizer bug.
    pub fn commit_attribute(&mut self, attribute: Attribute) -> bool {
        match self {
            Self::StartTag { attributes, .. } => {
                if let Some(existing) = attributes.iter_mut().find(|a| a.name == attribute.name) {
                    existing.value = attribute.value;
                    false
                } else {
                    attributes.push(attribute);
                    true
                }
            }
            Self::EndTag { .. } => true,
            _ => panic!("commit_attribute called on non-tag token"),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartTag {
                name,
                self_closing,
                attributes,
            } => {
                write!(f, "StartTag <{name}")?;
                for attr in attributes {
                    write!(f, " {}=\"{}\"", attr.name, attr.value)?;
                }
                if *self_closing {
                    write!(f, " /")?;
                }
                write!(f, ">")
            }
            Self::EndTag { name } => write!(f, "EndTag </{name}>"),
            Self::Text { data } => write!(f, "Text {data:?}"),
            Self::EndOfInput => write!(f, "EndOfInput"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_attribute_replaces_duplicate() {
        let mut token = Token::new_start_tag();
        assert!(token.commit_attribute(Attribute::new("a".into(), "1".into())));
        assert!(token.commit_attribute(Attribute::new("b".into(), "2".into())));
        assert!(!token.commit_attribute(Attribute::new("a".into(), "3".into())));
        let Token::StartTag { attributes, .. } = token else {
            unreachable!()
        };
        assert_eq!(
            attributes,
            vec![
                Attribute::new("a".into(), "3".into()),
                Attribute::new("b".into(), "2".into()),
            ]
        );
    }

    #[test]
    fn test_display() {
        let token = Token::StartTag {
            name: "img".into(),
            self_closing: true,
            attributes: vec![Attribute::new("src".into(), "a.png".into())],
        };
        assert_eq!(token.to_string(), "StartTag <img src=\"a.png\" />");
        assert_eq!(Token::new_text("hi\n").to_string(), "Text \"hi\\n\"");
    }
}
