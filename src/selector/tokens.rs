//! Token definitions for the selector language
//!
//! The logos lexer only separates structure (parentheses and set operators)
//! from literal text. Quoted strings are single tokens, so operators and
//! parentheses inside quotes stay literal. A quote that is never closed
//! keeps the rest of the selector literal, and a backslash outside quotes
//! makes the next character literal.
use logos::Logos;
use std::fmt;

/// Raw lexer tokens
#[derive(Logos, Debug, PartialEq, Clone)]
pub enum Token {
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,

    // Set operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token(",")]
    Comma,

    // Quoted literal, backslash escapes the next character
    #[regex(r#""([^"\\]|\\.)*"?"#)]
    #[regex(r#"'([^'\\]|\\.)*'?"#)]
    Quoted,

    // Escaped character outside quotes, or a trailing backslash
    #[regex(r"\\.")]
    #[token("\\")]
    Escaped,

    // Anything else up to the next structural character, quote or backslash
    #[regex(r#"[^()+,\-"'\\]+"#)]
    Text,
}

impl Token {
    /// The set operator this token stands for, if any
    pub fn set_operator(&self) -> Option<SetOperator> {
        match self {
            Token::Plus => Some(SetOperator::Intersect),
            Token::Minus => Some(SetOperator::Difference),
            Token::Comma => Some(SetOperator::Union),
            _ => None,
        }
    }

    /// Check if this token is part of an operand
    pub fn is_literal(&self) -> bool {
        matches!(self, Token::Quoted | Token::Escaped | Token::Text)
    }
}

/// Operators combining two operand results over the same axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperator {
    /// `+`
    Intersect,
    /// `-`
    Difference,
    /// `,`
    Union,
}

impl SetOperator {
    pub fn precedence(self) -> u8 {
        match self {
            SetOperator::Intersect | SetOperator::Difference => 10,
            SetOperator::Union => 0,
        }
    }

    pub fn is_left_associative(self) -> bool {
        true
    }

    pub fn symbol(self) -> char {
        match self {
            SetOperator::Intersect => '+',
            SetOperator::Difference => '-',
            SetOperator::Union => ',',
        }
    }
}

impl fmt::Display for SetOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
