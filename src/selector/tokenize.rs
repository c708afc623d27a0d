//! Search token extraction
//!
//! Turns a selector string into parentheses, set operators and operand
//! substrings. Consecutive literal lexer tokens are joined back into one
//! operand by their source span, and nesting depth is tracked so unbalanced
//! parentheses fail here rather than during evaluation.

use super::tokens::{SetOperator, Token};
use crate::error::{GridError, Result};
use logos::Logos;
use std::fmt;
use std::ops::Range;

/// A token of the infix selector expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchToken {
    Open,
    Close,
    SetOp(SetOperator),
    /// Raw operand text, trimmed
    Operand(String),
}

impl fmt::Display for SearchToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchToken::Open => write!(f, "("),
            SearchToken::Close => write!(f, ")"),
            SearchToken::SetOp(op) => write!(f, "{}", op),
            SearchToken::Operand(text) => write!(f, "{}", text),
        }
    }
}

/// Split a selector into search tokens
pub fn extract_search_tokens(query: &str) -> Result<Vec<SearchToken>> {
    let mut lexer = Token::lexer(query);
    let mut offset = 0;
    let mut tokens = Vec::new();
    let mut literal: Option<Range<usize>> = None;
    let mut depth: usize = 0;

    while let Some(result) = lexer.next() {
        let span = lexer.span().start + offset..lexer.span().end + offset;
        let token = result.map_err(|_| {
            GridError::InvalidSelector(format!(
                "unexpected character at offset {} in '{}'",
                span.start, query
            ))
        })?;

        // A quote inside a word is an apostrophe, not an opener
        let span = if token == Token::Quoted && !opens_quote(query, span.start) {
            offset = span.start + 1;
            lexer = Token::lexer(&query[offset..]);
            span.start..offset
        } else {
            span
        };

        if token.is_literal() {
            literal = Some(match literal {
                Some(open) => open.start..span.end,
                None => span,
            });
            continue;
        }

        flush_operand(query, &mut literal, &mut tokens);
        match token {
            Token::OpenParen => {
                depth += 1;
                tokens.push(SearchToken::Open);
            }
            Token::CloseParen => {
                if depth == 0 {
                    return Err(GridError::InvalidSelector(format!(
                        "unmatched ')' at offset {} in '{}'",
                        span.start, query
                    )));
                }
                depth -= 1;
                tokens.push(SearchToken::Close);
            }
            other => {
                if let Some(op) = other.set_operator() {
                    tokens.push(SearchToken::SetOp(op));
                }
            }
        }
    }
    flush_operand(query, &mut literal, &mut tokens);

    if depth > 0 {
        return Err(GridError::InvalidSelector(format!(
            "{} unclosed '(' in '{}'",
            depth, query
        )));
    }
    Ok(tokens)
}

/// Check if the quote at `at` starts a quoted literal
fn opens_quote(query: &str, at: usize) -> bool {
    match query[..at].chars().next_back() {
        None => true,
        Some(c) => c.is_whitespace() || "=!<>*^$|()+,-".contains(c),
    }
}

fn flush_operand(query: &str, literal: &mut Option<Range<usize>>, tokens: &mut Vec<SearchToken>) {
    if let Some(span) = literal.take() {
        let text = query[span].trim();
        // Whitespace between structural tokens is not an operand
        if !text.is_empty() {
            tokens.push(SearchToken::Operand(text.to_string()));
        }
    }
}
