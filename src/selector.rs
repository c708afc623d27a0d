//! Selector engine
//!
//! A small query language for picking rows (or columns) out of a
//! [`LabeledGrid`]:
//!
//! ```text
//! slug^="blog/" + level=2
//! (title*=news , title*=press) - //=draft
//! ```
//!
//! Pipeline:
//! 1. Tokenize (`tokenize.rs`): logos splits structure from literal text;
//!    literal runs become operand substrings, parentheses are depth-checked.
//! 2. Infix to postfix (`postfix.rs`): shunting-yard with `+`/`-` above `,`,
//!    all left-associative.
//! 3. Operand parsing (`operand.rs`): fields, comparison operator, values.
//! 4. Evaluation (`evaluate.rs`): one boolean mask per operand, combined by
//!    the set operators (`+` intersect, `-` difference, `,` union), then the
//!    unmatched lines are dropped from a copy of the grid. Matches always
//!    come back in grid order, so `slug=contact , slug=home` lists `home`
//!    first.
//!
//! A query always works on exactly one axis: row searches test the cells of
//! named columns, column searches the cells of named rows.

pub mod evaluate;
pub mod operand;
pub mod postfix;
pub mod tokenize;
pub mod tokens;

pub use operand::{Comparison, Field, Query};
pub use postfix::Postfix;
pub use tokenize::SearchToken;
pub use tokens::SetOperator;

use crate::error::Result;
use crate::grid::{Axis, LabeledGrid};
use std::borrow::Cow;

/// A compiled selector, reusable across grids
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    source: String,
    tokens: Vec<SearchToken>,
    program: Vec<Postfix<Query>>,
}

impl Selector {
    /// Tokenize, reorder and parse a selector string
    pub fn compile(source: &str) -> Result<Selector> {
        let tokens = tokenize::extract_search_tokens(source)?;
        let program = postfix::infix_to_postfix(tokens.clone())?
            .into_iter()
            .map(|item| match item {
                Postfix::Operand(text) => Query::parse(&text).map(Postfix::Operand),
                Postfix::Operator(op) => Ok(Postfix::Operator(op)),
            })
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(
            selector = source,
            operands = program
                .iter()
                .filter(|item| matches!(item, Postfix::Operand(_)))
                .count(),
            "compiled selector"
        );
        Ok(Selector {
            source: source.to_string(),
            tokens,
            program,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[SearchToken] {
        &self.tokens
    }

    /// The postfix program
    pub fn program(&self) -> &[Postfix<Query>] {
        &self.program
    }

    /// A selector without operands selects everything
    pub fn is_empty(&self) -> bool {
        self.program.is_empty()
    }

    /// Which positions of `axis` the selector keeps
    pub fn mask(&self, grid: &LabeledGrid, axis: Axis) -> Result<Vec<bool>> {
        Ok(evaluate::evaluate_mask(grid, axis, &self.program)?
            .unwrap_or_else(|| vec![true; grid.len(axis)]))
    }

    /// Apply the selector. An empty selector borrows the grid unchanged.
    pub fn evaluate<'g>(&self, grid: &'g LabeledGrid, axis: Axis) -> Result<Cow<'g, LabeledGrid>> {
        let result = evaluate::evaluate_search(grid, axis, &self.program)?;
        tracing::debug!(
            selector = %self.source,
            %axis,
            before = grid.len(axis),
            after = result.len(axis),
            "evaluated selector"
        );
        Ok(result)
    }
}

impl LabeledGrid {
    /// Search rows or columns with a selector string
    pub fn search(&self, axis: Axis, query: &str) -> Result<Cow<'_, LabeledGrid>> {
        if query.trim().is_empty() {
            return Ok(Cow::Borrowed(self));
        }
        Selector::compile(query)?.evaluate(self, axis)
    }

    pub fn search_rows(&self, query: &str) -> Result<Cow<'_, LabeledGrid>> {
        self.search(Axis::Row, query)
    }

    pub fn search_columns(&self, query: &str) -> Result<Cow<'_, LabeledGrid>> {
        self.search(Axis::Column, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GridError;
    use crate::grid::Value;

    fn pages() -> LabeledGrid {
        let mut grid = LabeledGrid::from_rows(vec![
            vec!["blog/post-1", "Post 1", "1"],
            vec!["about", "About", "0"],
            vec!["blog/post-2", "Post 2", "1"],
        ]);
        grid.set_labels(Axis::Column, vec![Some("slug"), Some("title"), Some("level")])
            .unwrap();
        grid
    }

    fn slugs(grid: &LabeledGrid) -> Vec<String> {
        grid.column("slug")
            .unwrap()
            .iter()
            .map(Value::to_string)
            .collect()
    }

    #[test]
    fn test_starts_with_keeps_order() {
        let grid = pages();
        let found = grid.search_rows(r#"slug^="blog/""#).unwrap();
        assert_eq!(slugs(&found), vec!["blog/post-1", "blog/post-2"]);
        assert!(matches!(found, Cow::Owned(_)));
    }

    #[test]
    fn test_empty_query_borrows() {
        let grid = pages();
        let found = grid.search_rows("  ").unwrap();
        assert!(matches!(found, Cow::Borrowed(_)));
    }

    #[test]
    fn test_set_operators() {
        let grid = pages();
        let found = grid.search_rows(r#"level=1 - title$="2""#).unwrap();
        assert_eq!(slugs(&found), vec!["blog/post-1"]);
        let found = grid.search_rows(r#"slug=about , title="Post 2""#).unwrap();
        assert_eq!(slugs(&found), vec!["about", "blog/post-2"]);
        let found = grid.search_rows(r#"level=1 + title*="1""#).unwrap();
        assert_eq!(slugs(&found), vec!["blog/post-1"]);
    }

    #[test]
    fn test_column_search() {
        let mut grid = pages();
        grid.set_labels(Axis::Row, vec![Some("p1"), Some("about"), Some("p2")])
            .unwrap();
        let found = grid.search_columns(r#"about="About",//=level"#).unwrap();
        assert_eq!(found.columns(), 2);
        assert_eq!(found.label(Axis::Column, 0), Some("title"));
        assert_eq!(found.label(Axis::Column, 1), Some("level"));
        assert_eq!(found.rows(), 3);
    }

    #[test]
    fn test_compile_errors() {
        assert!(matches!(
            Selector::compile("(slug=a"),
            Err(GridError::InvalidSelector(_))
        ));
        assert!(matches!(
            Selector::compile("slug~a"),
            Err(GridError::InvalidSelector(_))
        ));
    }

    #[test]
    fn test_compiled_selector_is_reusable() {
        let selector = Selector::compile("level=0").unwrap();
        let first = pages();
        let mut second = pages();
        second.set_cell(0usize, "level", "0").unwrap();
        assert_eq!(selector.evaluate(&first, Axis::Row).unwrap().rows(), 1);
        assert_eq!(selector.evaluate(&second, Axis::Row).unwrap().rows(), 2);
        assert_eq!(selector.mask(&first, Axis::Row).unwrap(), vec![false, true, false]);
    }
}
