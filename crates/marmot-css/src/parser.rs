//! Parser for the text of `<style>` blocks.
//!
//! Turns a style sheet into an ordered list of [`CssRule`]s. Only qualified
//! rules (`selector-list { declarations }`) are kept; at-rules are skipped with
//! a warning. Declaration values are kept raw: the cascade compares rule
//! priority, not values.

use marmot_common::warning::warn_once;
use serde::Serialize;

use crate::selector::Selector;

/// A single `property: value` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    /// Property name, trimmed.
    pub property: String,
    /// Raw value text, trimmed (may contain spaces, e.g. `1px solid black`).
    pub value: String,
}

/// A style rule: selectors plus declarations, both in source order.
///
/// Only the first selector takes part in matching; the rest are kept so the
/// rule can be printed back faithfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CssRule {
    /// Comma-separated selectors of the rule prelude.
    pub selectors: Vec<Selector>,
    /// Declarations of the rule block.
    pub declarations: Vec<Declaration>,
}

impl CssRule {
    /// The selector used for matching.
    #[must_use]
    pub fn selector(&self) -> Option<&Selector> {
        self.selectors.first()
    }
}

/// Parse a style sheet into rules.
#[must_use]
pub fn parse_stylesheet(css: &str) -> Vec<CssRule> {
    StylesheetParser::new(css).parse()
}

/// Character-level consumer over one style sheet.
struct StylesheetParser {
    input: Vec<char>,
    position: usize,
}

impl StylesheetParser {
    fn new(css: &str) -> Self {
        Self {
            input: strip_comments(css).chars().collect(),
            position: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.position += 1;
        }
    }

    fn parse(mut self) -> Vec<CssRule> {
        let mut rules = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => break,
                Some('@') => self.skip_at_rule(),
                Some('}') => {
                    // Stray closing brace: drop it and carry on.
                    self.position += 1;
                }
                Some(_) => {
                    if let Some(rule) = self.consume_qualified_rule() {
                        rules.push(rule);
                    }
                }
            }
        }
        rules
    }

    /// Skip `@name ...;` or `@name ... { ... }` including nested blocks.
    fn skip_at_rule(&mut self) {
        let start = self.position;
        while let Some(c) = self.consume() {
            match c {
                ';' => break,
                '{' => {
                    let _ = self.consume_block();
                    break;
                }
                _ => {}
            }
        }
        let name: String = self.input[start..self.position]
            .iter()
            .skip(1)
            .take_while(|c| c.is_alphanumeric() || **c == '-')
            .collect();
        warn_once("CSS", &format!("skipping unsupported at-rule '@{name}'"));
    }

    fn consume_qualified_rule(&mut self) -> Option<CssRule> {
        let mut prelude = String::new();
        loop {
            match self.consume() {
                Some('{') => break,
                Some(c) => prelude.push(c),
                None => {
                    warn_once(
                        "CSS",
                        &format!("rule '{}' has no declaration block", prelude.trim()),
                    );
                    return None;
                }
            }
        }
        let block = self.consume_block();

        let selectors: Vec<Selector> = prelude
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Selector::parse)
            .collect();
        if selectors.is_empty() {
            warn_once("CSS", "dropping rule with an empty selector list");
            return None;
        }

        Some(CssRule {
            selectors,
            declarations: parse_declarations(&block),
        })
    }

    /// Consume up to the `}` matching an already consumed `{`, returning the
    /// block contents. Quoted strings may contain braces.
    fn consume_block(&mut self) -> String {
        let mut depth = 1usize;
        let mut quote: Option<char> = None;
        let mut block = String::new();
        while let Some(c) = self.consume() {
            match (quote, c) {
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') => quote = Some(c),
                (None, '{') => depth += 1,
                (None, '}') => {
                    depth -= 1;
                    if depth == 0 {
                        return block;
                    }
                }
                (None, _) => {}
            }
            block.push(c);
        }
        block
    }
}

/// Split a declaration block on top-level `;` and each piece on its first `:`.
fn parse_declarations(block: &str) -> Vec<Declaration> {
    let mut declarations = Vec::new();
    for piece in split_outside_quotes(block, ';') {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        let Some((property, value)) = piece.split_once(':') else {
            warn_once("CSS", &format!("ignoring declaration without ':' ({piece})"));
            continue;
        };
        let property = property.trim();
        if property.is_empty() {
            continue;
        }
        declarations.push(Declaration {
            property: property.to_string(),
            value: value.trim().to_string(),
        });
    }
    declarations
}

fn split_outside_quotes(text: &str, separator: char) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (None, '"' | '\'') => quote = Some(c),
            (None, c) if c == separator => {
                pieces.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    pieces.push(&text[start..]);
    pieces
}

/// Remove `/* ... */` comments. An unterminated comment runs to the end.
fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_comments() {
        assert_eq!(strip_comments("a /* x */ b"), "a  b");
        assert_eq!(strip_comments("a /* open"), "a ");
        assert_eq!(strip_comments("plain"), "plain");
    }

    #[test]
    fn test_split_respects_quotes() {
        assert_eq!(
            split_outside_quotes("content: \"a;b\"; color: red", ';'),
            vec!["content: \"a;b\"", " color: red"]
        );
    }

    #[test]
    fn test_declaration_value_keeps_colons() {
        let decls = parse_declarations("background: url(http://x/y.png)");
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].property, "background");
        assert_eq!(decls[0].value, "url(http://x/y.png)");
    }
}
