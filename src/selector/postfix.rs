//! Infix to postfix conversion (shunting-yard)
//!
//! `+` and `-` bind tighter than `,`; all three are left-associative and
//! parentheses override precedence.

use super::tokenize::SearchToken;
use super::tokens::SetOperator;
use crate::error::{GridError, Result};

/// One item of a postfix program, generic over the operand payload
#[derive(Debug, Clone, PartialEq)]
pub enum Postfix<T> {
    Operand(T),
    Operator(SetOperator),
}

enum Pending {
    Open,
    Operator(SetOperator),
}

/// Reorder infix search tokens into postfix order
pub fn infix_to_postfix(tokens: Vec<SearchToken>) -> Result<Vec<Postfix<String>>> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut pending: Vec<Pending> = Vec::new();

    for token in tokens {
        match token {
            SearchToken::Operand(text) => output.push(Postfix::Operand(text)),
            SearchToken::SetOp(op) => {
                while let Some(Pending::Operator(top)) = pending.last() {
                    let top = *top;
                    let yields = top.precedence() > op.precedence()
                        || (top.precedence() == op.precedence() && op.is_left_associative());
                    if !yields {
                        break;
                    }
                    pending.pop();
                    output.push(Postfix::Operator(top));
                }
                pending.push(Pending::Operator(op));
            }
            SearchToken::Open => pending.push(Pending::Open),
            SearchToken::Close => loop {
                match pending.pop() {
                    Some(Pending::Operator(op)) => output.push(Postfix::Operator(op)),
                    Some(Pending::Open) => break,
                    None => {
                        return Err(GridError::InvalidSelector(
                            "unmatched ')'".to_string(),
                        ))
                    }
                }
            },
        }
    }

    while let Some(item) = pending.pop() {
        match item {
            Pending::Operator(op) => output.push(Postfix::Operator(op)),
            Pending::Open => {
                return Err(GridError::InvalidSelector("unclosed '('".to_string()))
            }
        }
    }

    check_arity(&output)?;
    Ok(output)
}

/// Every operator needs two operands and the program must leave exactly one
/// result (or none for an empty query)
fn check_arity<T>(program: &[Postfix<T>]) -> Result<()> {
    let mut depth = 0usize;
    for item in program {
        match item {
            Postfix::Operand(_) => depth += 1,
            Postfix::Operator(op) => {
                if depth < 2 {
                    return Err(GridError::InvalidSelector(format!(
                        "set operator '{}' is missing an operand",
                        op
                    )));
                }
                depth -= 1;
            }
        }
    }
    if depth > 1 {
        return Err(GridError::InvalidSelector(
            "operands must be joined by '+', '-' or ','".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::tokenize::extract_search_tokens;

    fn rpn(query: &str) -> Result<String> {
        let program = infix_to_postfix(extract_search_tokens(query)?)?;
        Ok(program
            .iter()
            .map(|item| match item {
                Postfix::Operand(text) => text.clone(),
                Postfix::Operator(op) => op.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" "))
    }

    #[test]
    fn test_intersect_binds_tighter_than_union() {
        assert_eq!(rpn("a=1,b=2+c=3").unwrap(), "a=1 b=2 c=3 + ,");
        assert_eq!(rpn("a=1+b=2,c=3").unwrap(), "a=1 b=2 + c=3 ,");
    }

    #[test]
    fn test_left_associative() {
        assert_eq!(rpn("a=1-b=2+c=3").unwrap(), "a=1 b=2 - c=3 +");
        assert_eq!(rpn("a=1,b=2,c=3").unwrap(), "a=1 b=2 , c=3 ,");
    }

    #[test]
    fn test_parentheses_override() {
        assert_eq!(rpn("a=1+(b=2,c=3)").unwrap(), "a=1 b=2 c=3 , +");
        assert_eq!(rpn("((a=1))").unwrap(), "a=1");
    }

    #[test]
    fn test_missing_operands() {
        assert!(rpn("a=1+").is_err());
        assert!(rpn("+a=1").is_err());
        assert!(rpn("()").is_ok());
        assert!(rpn("(a=1)(b=2)").is_err());
    }

    #[test]
    fn test_empty() {
        assert_eq!(rpn("").unwrap(), "");
    }
}
