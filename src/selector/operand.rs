//! Operand parsing and comparison
//!
//! An operand is `fields operator values`:
//!
//! ```text
//! operand  := field ('|' field)* operator value ('|' value)*
//! field    := name | '/' | '//' | quoted
//! operator := '=' | '!=' | '>' | '<' | '>=' | '<=' | '*=' | '^=' | '$='
//! ```
//!
//! `/` addresses the position of the row (or column) being tested and `//`
//! its label. Quoted names and values may contain any character; a backslash
//! escapes the next character, so `\|` and `\"` are literal.

use crate::error::{GridError, Result};
use crate::grid::value::{parse_number, Value};
use std::fmt;

const OPERATOR_CHARS: [char; 7] = ['=', '!', '<', '>', '*', '^', '$'];

/// What an operand field reads from each row (or column)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// `/`: the integer position
    Key,
    /// `//`: the label
    Label,
    /// A label (or position) on the other axis
    Name(String),
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    NotEqual,
    Greater,
    Less,
    GreaterOrEqual,
    LessOrEqual,
    Contains,
    StartsWith,
    EndsWith,
}

impl Comparison {
    pub fn from_symbol(symbol: &str) -> Option<Comparison> {
        let comparison = match symbol {
            "=" => Comparison::Equal,
            "!=" => Comparison::NotEqual,
            ">" => Comparison::Greater,
            "<" => Comparison::Less,
            ">=" => Comparison::GreaterOrEqual,
            "<=" => Comparison::LessOrEqual,
            "*=" => Comparison::Contains,
            "^=" => Comparison::StartsWith,
            "$=" => Comparison::EndsWith,
            _ => return None,
        };
        Some(comparison)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::Equal => "=",
            Comparison::NotEqual => "!=",
            Comparison::Greater => ">",
            Comparison::Less => "<",
            Comparison::GreaterOrEqual => ">=",
            Comparison::LessOrEqual => "<=",
            Comparison::Contains => "*=",
            Comparison::StartsWith => "^=",
            Comparison::EndsWith => "$=",
        }
    }

    /// Test a cell against one expected value
    pub fn matches(self, actual: &Value, expected: &str) -> bool {
        match self {
            Comparison::Equal => loosely_equal(actual, expected),
            Comparison::NotEqual => !loosely_equal(actual, expected),
            Comparison::Greater => numeric(actual, expected, |a, b| a > b),
            Comparison::Less => numeric(actual, expected, |a, b| a < b),
            Comparison::GreaterOrEqual => numeric(actual, expected, |a, b| a >= b),
            Comparison::LessOrEqual => numeric(actual, expected, |a, b| a <= b),
            Comparison::Contains => folded(actual).contains(&expected.to_lowercase()),
            Comparison::StartsWith => folded(actual).starts_with(&expected.to_lowercase()),
            Comparison::EndsWith => folded(actual).ends_with(&expected.to_lowercase()),
        }
    }
}

fn loosely_equal(actual: &Value, expected: &str) -> bool {
    if actual.as_text() == expected {
        return true;
    }
    match (actual.as_number(), parse_number(expected)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn numeric(actual: &Value, expected: &str, compare: impl Fn(f64, f64) -> bool) -> bool {
    match (actual.as_number(), parse_number(expected)) {
        (Some(a), Some(b)) => compare(a, b),
        _ => false,
    }
}

fn folded(actual: &Value) -> String {
    actual.as_text().to_lowercase()
}

/// A parsed operand: every field is tested against every value and the
/// operand matches when any pair does
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub fields: Vec<Field>,
    pub comparison: Comparison,
    pub values: Vec<String>,
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self
            .fields
            .iter()
            .map(|field| match field {
                Field::Key => "/".to_string(),
                Field::Label => "//".to_string(),
                Field::Name(name) => name.clone(),
            })
            .collect();
        let values: Vec<String> = self.values.iter().map(|v| format!("{:?}", v)).collect();
        write!(
            f,
            "{}{}{}",
            fields.join("|"),
            self.comparison.symbol(),
            values.join("|")
        )
    }
}

/// Character cursor over one operand
struct Cursor<'a> {
    source: &'a str,
    chars: Vec<char>,
    position: usize,
}

impl<'a> Cursor<'a> {
    fn new(source: &'a str) -> Self {
        Cursor {
            source,
            chars: source.chars().collect(),
            position: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn at_end(&self) -> bool {
        self.position >= self.chars.len()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.position += 1;
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn error(&self, message: &str) -> GridError {
        GridError::InvalidSelector(format!("{} in '{}'", message, self.source))
    }

    /// Read a quoted string starting at the opening quote. An unclosed quote
    /// runs to the end of the operand.
    fn quoted(&mut self) -> Result<String> {
        let quote = match self.peek() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(self.error("expected a quote")),
        };
        self.position += 1;
        let mut text = String::new();
        loop {
            match self.peek() {
                None => return Ok(text),
                Some('\\') => {
                    self.position += 1;
                    match self.peek() {
                        Some(escaped) => text.push(escaped),
                        None => return Ok(text),
                    }
                }
                Some(c) if c == quote => {
                    self.position += 1;
                    return Ok(text);
                }
                Some(c) => text.push(c),
            }
            self.position += 1;
        }
    }

    /// Read unquoted text up to a character accepted by `stop`
    fn bare(&mut self, stop: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.position += 1;
                if let Some(escaped) = self.peek() {
                    text.push(escaped);
                    self.position += 1;
                }
                continue;
            }
            if stop(c) {
                break;
            }
            text.push(c);
            self.position += 1;
        }
        text.trim().to_string()
    }
}

fn is_quote(c: Option<char>) -> bool {
    matches!(c, Some('"' | '\''))
}

impl Query {
    /// Parse one operand
    pub fn parse(operand: &str) -> Result<Query> {
        let mut cursor = Cursor::new(operand.trim());

        let mut fields = Vec::new();
        loop {
            cursor.skip_whitespace();
            let field = if is_quote(cursor.peek()) {
                Field::Name(cursor.quoted()?)
            } else {
                match cursor.bare(|c| c == '|' || OPERATOR_CHARS.contains(&c)).as_str() {
                    "" => return Err(cursor.error("empty field")),
                    "/" => Field::Key,
                    "//" => Field::Label,
                    name => Field::Name(name.to_string()),
                }
            };
            fields.push(field);
            cursor.skip_whitespace();
            if !cursor.eat('|') {
                break;
            }
        }

        let start = cursor.position;
        while cursor.position - start < 2
            && cursor.peek().is_some_and(|c| OPERATOR_CHARS.contains(&c))
        {
            cursor.position += 1;
        }
        let symbol: String = cursor.chars[start..cursor.position].iter().collect();
        if symbol.is_empty() {
            return Err(cursor.error("missing comparison operator"));
        }
        let comparison = Comparison::from_symbol(&symbol)
            .ok_or_else(|| cursor.error(&format!("unknown operator '{}'", symbol)))?;

        let mut values = Vec::new();
        loop {
            cursor.skip_whitespace();
            if is_quote(cursor.peek()) {
                values.push(cursor.quoted()?);
                cursor.skip_whitespace();
            } else {
                values.push(cursor.bare(|c| c == '|'));
            }
            if !cursor.eat('|') {
                break;
            }
        }
        if !cursor.at_end() {
            return Err(cursor.error("unexpected text after value"));
        }

        Ok(Query {
            fields,
            comparison,
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(n: &str) -> Field {
        Field::Name(n.to_string())
    }

    #[test]
    fn test_simple_operand() {
        let query = Query::parse("level=2").unwrap();
        assert_eq!(query.fields, vec![name("level")]);
        assert_eq!(query.comparison, Comparison::Equal);
        assert_eq!(query.values, vec!["2"]);
    }

    #[test]
    fn test_quoted_value_and_two_char_operator() {
        let query = Query::parse(r#"slug^="blog/""#).unwrap();
        assert_eq!(query.comparison, Comparison::StartsWith);
        assert_eq!(query.values, vec!["blog/"]);
    }

    #[test]
    fn test_alternative_fields_and_values() {
        let query = Query::parse(r#"title|slug *= "news" | 'a\|b' | plain "#).unwrap();
        assert_eq!(query.fields, vec![name("title"), name("slug")]);
        assert_eq!(query.comparison, Comparison::Contains);
        assert_eq!(query.values, vec!["news", "a|b", "plain"]);
    }

    #[test]
    fn test_key_and_label_fields() {
        assert_eq!(Query::parse("/>=3").unwrap().fields, vec![Field::Key]);
        let query = Query::parse("//!=home").unwrap();
        assert_eq!(query.fields, vec![Field::Label]);
        assert_eq!(query.comparison, Comparison::NotEqual);
    }

    #[test]
    fn test_quoted_field_name() {
        let query = Query::parse(r#""page=title"$=x"#).unwrap();
        assert_eq!(query.fields, vec![name("page=title")]);
        assert_eq!(query.comparison, Comparison::EndsWith);
    }

    #[test]
    fn test_escaped_quote_in_value() {
        let query = Query::parse(r#"title="say \"hi\"""#).unwrap();
        assert_eq!(query.values, vec![r#"say "hi""#]);
    }

    #[test]
    fn test_quotes_inside_bare_value_are_literal() {
        assert_eq!(Query::parse("title*=Editor's").unwrap().values, vec!["Editor's"]);
        assert_eq!(
            Query::parse(r#"title=say \"hi\""#).unwrap().values,
            vec![r#"say "hi""#]
        );
    }

    #[test]
    fn test_unclosed_quote_runs_to_end() {
        assert_eq!(Query::parse(r#"slug="home"#).unwrap().values, vec!["home"]);
        assert_eq!(Query::parse(r"title='a | b\").unwrap().values, vec!["a | b"]);
    }

    #[test]
    fn test_empty_value_allowed() {
        assert_eq!(Query::parse("title=").unwrap().values, vec![""]);
    }

    #[test]
    fn test_invalid_operands() {
        for bad in ["=x", "title", "title=>x", "title~x", "|a=1", r#"a="x" y"#, "a!x"] {
            assert!(
                matches!(Query::parse(bad), Err(GridError::InvalidSelector(_))),
                "expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_comparisons() {
        let cell = Value::from("Blog/Post-1");
        assert!(Comparison::StartsWith.matches(&cell, "blog/"));
        assert!(Comparison::EndsWith.matches(&cell, "POST-1"));
        assert!(Comparison::Contains.matches(&cell, "g/p"));
        assert!(!Comparison::Equal.matches(&cell, "blog/post-1"));

        let amount = Value::from("1,500");
        assert!(Comparison::Greater.matches(&amount, "1000"));
        assert!(Comparison::LessOrEqual.matches(&amount, "1,500"));
        assert!(Comparison::Equal.matches(&amount, "1500"));
        assert!(!Comparison::Less.matches(&Value::from("n/a"), "3"));
        assert!(!Comparison::Greater.matches(&Value::from("Infinity"), "1000"));
        assert!(!Comparison::Equal.matches(&Value::from("NaN"), "nan"));
        assert!(Comparison::NotEqual.matches(&Value::Null, "x"));
        assert!(Comparison::Equal.matches(&Value::Null, ""));
    }
}
