//! Selector evaluation
//!
//! Each operand becomes a boolean mask over the queried axis. Set operators
//! pop two masks and combine them position by position, so results keep the
//! grid's original order and unlabeled lines take part like any other.
//!
//! This differs from [`LabeledGrid::merge`]: `a , b` lists matches in grid
//! order, while `merge` keeps its receiver's lines first and appends the
//! other grid's new labels after them.

use super::operand::{Field, Query};
use super::postfix::Postfix;
use super::tokens::SetOperator;
use crate::error::{GridError, Result};
use crate::grid::{Axis, LabeledGrid, Value};
use std::borrow::Cow;

/// Where a field reads its value from
enum Source {
    Key,
    Label,
    Across(usize),
}

/// Resolve a field name on the axis opposite to the one being searched.
/// Labels win; an all-digit name that is not a label is taken as a position.
fn resolve_field(grid: &LabeledGrid, axis: Axis, name: &str) -> Result<usize> {
    match grid.get_key(axis.other(), name) {
        Ok(position) => Ok(position),
        Err(err @ GridError::LabelNotFound { .. }) => match name.parse::<usize>() {
            Ok(position) => grid.get_key(axis.other(), position),
            Err(_) => Err(err),
        },
        Err(err) => Err(err),
    }
}

/// Positions of `axis` matched by a single operand
pub fn evaluate_operand(grid: &LabeledGrid, axis: Axis, query: &Query) -> Result<Vec<bool>> {
    let sources = query
        .fields
        .iter()
        .map(|field| match field {
            Field::Key => Ok(Source::Key),
            Field::Label => Ok(Source::Label),
            Field::Name(name) => resolve_field(grid, axis, name).map(Source::Across),
        })
        .collect::<Result<Vec<_>>>()?;

    let mask = (0..grid.len(axis))
        .map(|position| {
            sources.iter().any(|source| {
                let owned;
                let actual = match source {
                    Source::Key => {
                        owned = Value::Int(position as i64);
                        &owned
                    }
                    Source::Label => {
                        owned = Value::from(grid.label(axis, position));
                        &owned
                    }
                    Source::Across(across) => grid.value_at(axis, position, *across),
                };
                query
                    .values
                    .iter()
                    .any(|expected| query.comparison.matches(actual, expected))
            })
        })
        .collect();
    Ok(mask)
}

fn combine(op: SetOperator, left: &[bool], right: &[bool]) -> Vec<bool> {
    left.iter()
        .zip(right)
        .map(|(&l, &r)| match op {
            SetOperator::Intersect => l && r,
            SetOperator::Difference => l && !r,
            SetOperator::Union => l || r,
        })
        .collect()
}

/// Run a postfix program and return the final mask, or `None` when the
/// program is empty
pub fn evaluate_mask(
    grid: &LabeledGrid,
    axis: Axis,
    program: &[Postfix<Query>],
) -> Result<Option<Vec<bool>>> {
    let mut stack: Vec<Vec<bool>> = Vec::new();
    for item in program {
        match item {
            Postfix::Operand(query) => stack.push(evaluate_operand(grid, axis, query)?),
            Postfix::Operator(op) => {
                let (Some(right), Some(left)) = (stack.pop(), stack.pop()) else {
                    return Err(GridError::InvalidSelector(format!(
                        "set operator '{}' is missing an operand",
                        op
                    )));
                };
                stack.push(combine(*op, &left, &right));
            }
        }
    }
    match (stack.pop(), stack.is_empty()) {
        (None, _) => Ok(None),
        (Some(mask), true) => Ok(Some(mask)),
        (Some(_), false) => Err(GridError::InvalidSelector(
            "operands must be joined by '+', '-' or ','".to_string(),
        )),
    }
}

/// Run a postfix program against a grid
pub fn evaluate_search<'g>(
    grid: &'g LabeledGrid,
    axis: Axis,
    program: &[Postfix<Query>],
) -> Result<Cow<'g, LabeledGrid>> {
    Ok(match evaluate_mask(grid, axis, program)? {
        None => Cow::Borrowed(grid),
        Some(mask) => Cow::Owned(grid.retain_positions(axis, &mask)),
    })
}
