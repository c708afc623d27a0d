//! Line ordering
//!
//! Rows are ordered by the values of one column (and columns by the values of
//! one row). Lines are grouped into buckets of equal value, the buckets are
//! sorted, and lines keep their encounter order inside each bucket.

use super::axis::{Axis, Key};
use super::labeled::LabeledGrid;
use super::value::Value;
use crate::error::Result;
use serde::Deserialize;
use std::cmp::Ordering;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl std::str::FromStr for Order {
    type Err = crate::error::GridError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Order::Asc),
            "desc" | "descending" => Ok(Order::Desc),
            other => Err(crate::error::GridError::InvalidArgument(format!(
                "unknown order '{}'",
                other
            ))),
        }
    }
}

/// Positions of `values` in bucket order: distinct values sorted, equal
/// values kept in encounter order.
pub fn bucket_order(values: &[Value], order: Order) -> Vec<usize> {
    let mut buckets: Vec<(&Value, Vec<usize>)> = Vec::new();
    for (position, value) in values.iter().enumerate() {
        match buckets
            .iter_mut()
            .find(|(bucket, _)| bucket.compare(value) == Ordering::Equal)
        {
            Some((_, members)) => members.push(position),
            None => buckets.push((value, vec![position])),
        }
    }
    buckets.sort_by(|(a, _), (b, _)| match order {
        Order::Asc => a.compare(b),
        Order::Desc => b.compare(a),
    });
    buckets
        .into_iter()
        .flat_map(|(_, members)| members)
        .collect()
}

impl LabeledGrid {
    /// Order the lines of `axis` by the line `by` of the other axis
    pub fn order_by(&mut self, axis: Axis, by: impl Into<Key>, order: Order) -> Result<()> {
        let values = self.line(axis.other(), by)?;
        let permutation = bucket_order(&values, order);
        self.reorder(axis, &permutation);
        Ok(())
    }

    pub fn order_rows(&mut self, by_column: impl Into<Key>, order: Order) -> Result<()> {
        self.order_by(Axis::Row, by_column, order)
    }

    pub fn order_columns(&mut self, by_row: impl Into<Key>, order: Order) -> Result<()> {
        self.order_by(Axis::Column, by_row, order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letters_and_numbers() -> LabeledGrid {
        let mut grid = LabeledGrid::from_rows(vec![
            vec![Value::from("A"), Value::from(1)],
            vec![Value::from("B"), Value::from(1)],
            vec![Value::from("A"), Value::from(2)],
        ]);
        grid.set_labels(Axis::Column, vec![Some("letter"), Some("n")])
            .unwrap();
        grid
    }

    fn column_text(grid: &LabeledGrid, column: &str) -> Vec<String> {
        grid.column(column)
            .unwrap()
            .iter()
            .map(|v| v.to_string())
            .collect()
    }

    #[test]
    fn test_order_is_stable_within_buckets() {
        let mut grid = letters_and_numbers();
        grid.order_rows("letter", Order::Asc).unwrap();
        assert_eq!(column_text(&grid, "letter"), vec!["A", "A", "B"]);
        assert_eq!(column_text(&grid, "n"), vec!["1", "2", "1"]);
    }

    #[test]
    fn test_order_numeric_keeps_encounter_order() {
        let mut grid = letters_and_numbers();
        grid.order_rows("n", Order::Asc).unwrap();
        assert_eq!(column_text(&grid, "letter"), vec!["A", "B", "A"]);
    }

    #[test]
    fn test_order_descending() {
        let mut grid = letters_and_numbers();
        grid.order_rows("n", Order::Desc).unwrap();
        assert_eq!(column_text(&grid, "n"), vec!["2", "1", "1"]);
        // equal keys still in encounter order
        assert_eq!(column_text(&grid, "letter"), vec!["A", "A", "B"]);
    }

    #[test]
    fn test_order_moves_labels() {
        let mut grid = letters_and_numbers();
        grid.set_labels(Axis::Row, vec![Some("first"), Some("second"), Some("third")])
            .unwrap();
        grid.order_rows("letter", Order::Asc).unwrap();
        assert_eq!(grid.label(Axis::Row, 1), Some("third"));
        assert_eq!(grid.label(Axis::Row, 2), Some("second"));
    }

    #[test]
    fn test_number_words_sort_as_text() {
        let values = vec![Value::from("nan"), Value::from("3"), Value::from("1")];
        assert_eq!(bucket_order(&values, Order::Asc), vec![2, 1, 0]);
    }

    #[test]
    fn test_order_numbers_numerically() {
        let values = vec![Value::from("10"), Value::from("9"), Value::from("100")];
        assert_eq!(bucket_order(&values, Order::Asc), vec![1, 0, 2]);
    }

    #[test]
    fn test_order_unknown_column() {
        let mut grid = letters_and_numbers();
        assert!(grid.order_rows("missing", Order::Asc).is_err());
    }
}
