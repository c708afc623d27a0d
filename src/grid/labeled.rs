//! The labeled grid
//!
//! A rectangular table of [`Value`]s whose rows and columns are addressed by
//! position or by an optional unique label. Row and column operations share
//! one implementation parameterized by [`Axis`]; the private accessors at the
//! bottom of this file are the only places that know how each axis is laid
//! out in memory.
//!
//! Invariants kept by every operation:
//! - every row holds exactly `columns()` cells
//! - `rows()` equals the number of row label slots, `columns()` the number of
//!   column label slots
//! - non-null labels are unique within their axis

use super::axis::{Axis, AxisKeys, Key};
use super::value::Value;
use crate::error::{GridError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledGrid {
    data: Vec<Vec<Value>>,
    row_keys: AxisKeys,
    column_keys: AxisKeys,
}

impl Default for LabeledGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl LabeledGrid {
    /// Create an empty grid
    pub fn new() -> Self {
        LabeledGrid {
            data: Vec::new(),
            row_keys: AxisKeys::new(Axis::Row),
            column_keys: AxisKeys::new(Axis::Column),
        }
    }

    /// Build an unlabeled grid from rows. Short rows are padded with nulls.
    pub fn from_rows<R, V>(rows: R) -> Self
    where
        R: IntoIterator<Item = Vec<V>>,
        V: Into<Value>,
    {
        let mut grid = LabeledGrid::new();
        for row in rows {
            let values = row.into_iter().map(Into::into).collect();
            // Unlabeled appends cannot collide
            let _ = grid.append(Axis::Row, values, None);
        }
        grid
    }

    pub fn rows(&self) -> usize {
        self.row_keys.len()
    }

    pub fn columns(&self) -> usize {
        self.column_keys.len()
    }

    pub fn len(&self, axis: Axis) -> usize {
        self.keys(axis).len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows() == 0 && self.columns() == 0
    }

    pub fn keys(&self, axis: Axis) -> &AxisKeys {
        match axis {
            Axis::Row => &self.row_keys,
            Axis::Column => &self.column_keys,
        }
    }

    pub fn label(&self, axis: Axis, position: usize) -> Option<&str> {
        self.keys(axis).label(position)
    }

    pub fn labels(&self, axis: Axis) -> &[Option<String>] {
        self.keys(axis).labels()
    }

    /// Resolve a position or label to the canonical position
    pub fn get_key(&self, axis: Axis, key: impl Into<Key>) -> Result<usize> {
        self.keys(axis).resolve(&key.into())
    }

    /// Rename (or unlabel) a row or column without moving its data
    pub fn set_label(&mut self, axis: Axis, key: impl Into<Key>, label: Option<&str>) -> Result<()> {
        let position = self.get_key(axis, key)?;
        self.keys_mut(axis)
            .set(position, label.map(str::to_string))
    }

    /// Replace every label of an axis at once
    pub fn set_labels<I, S>(&mut self, axis: Axis, labels: I) -> Result<()>
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let labels: Vec<Option<String>> = labels.into_iter().map(|l| l.map(Into::into)).collect();
        if labels.len() != self.len(axis) {
            return Err(GridError::InvalidArgument(format!(
                "expected {} {} labels, got {}",
                self.len(axis),
                axis,
                labels.len()
            )));
        }
        let mut keys = AxisKeys::new(axis);
        for label in labels {
            keys.push(label)?;
        }
        *self.keys_mut(axis) = keys;
        Ok(())
    }

    pub fn cell(&self, row: impl Into<Key>, column: impl Into<Key>) -> Result<&Value> {
        let r = self.get_key(Axis::Row, row)?;
        let c = self.get_key(Axis::Column, column)?;
        Ok(&self.data[r][c])
    }

    pub fn set_cell(
        &mut self,
        row: impl Into<Key>,
        column: impl Into<Key>,
        value: impl Into<Value>,
    ) -> Result<()> {
        let r = self.get_key(Axis::Row, row)?;
        let c = self.get_key(Axis::Column, column)?;
        self.data[r][c] = value.into();
        Ok(())
    }

    /// The values of one row or column
    pub fn line(&self, axis: Axis, key: impl Into<Key>) -> Result<Vec<Value>> {
        let position = self.get_key(axis, key)?;
        Ok(self.line_values(axis, position))
    }

    pub fn row(&self, key: impl Into<Key>) -> Result<&[Value]> {
        let position = self.get_key(Axis::Row, key)?;
        Ok(&self.data[position])
    }

    pub fn column(&self, key: impl Into<Key>) -> Result<Vec<Value>> {
        self.line(Axis::Column, key)
    }

    /// Iterate rows as `(position, label, values)`
    pub fn iter_rows(&self) -> impl Iterator<Item = (usize, Option<&str>, &[Value])> {
        self.data
            .iter()
            .enumerate()
            .map(move |(i, row)| (i, self.row_keys.label(i), row.as_slice()))
    }

    /// Insert a row or column at `at`.
    ///
    /// Values longer than the complementary axis grow the grid with empty
    /// lines first; shorter values are padded with nulls. Returns the
    /// position of the new line.
    pub fn insert(
        &mut self,
        axis: Axis,
        at: usize,
        mut values: Vec<Value>,
        label: Option<&str>,
    ) -> Result<usize> {
        if at > self.len(axis) {
            return Err(GridError::KeyNotFound { axis, key: at });
        }
        self.keys(axis).ensure_unique(label, None)?;

        let other = axis.other();
        while self.len(other) < values.len() {
            self.push_blank(other);
        }
        values.resize(self.len(other), Value::Null);

        self.insert_line_data(axis, at, values);
        self.keys_mut(axis).insert(at, label.map(str::to_string))?;
        Ok(at)
    }

    pub fn append(&mut self, axis: Axis, values: Vec<Value>, label: Option<&str>) -> Result<usize> {
        let end = self.len(axis);
        self.insert(axis, end, values, label)
    }

    pub fn append_row(&mut self, values: Vec<Value>, label: Option<&str>) -> Result<usize> {
        self.append(Axis::Row, values, label)
    }

    pub fn append_column(&mut self, values: Vec<Value>, label: Option<&str>) -> Result<usize> {
        self.append(Axis::Column, values, label)
    }

    /// Remove a row or column, returning its values
    pub fn delete(&mut self, axis: Axis, key: impl Into<Key>) -> Result<Vec<Value>> {
        let position = self.get_key(axis, key)?;
        self.keys_mut(axis).remove(position);
        Ok(self.remove_line_data(axis, position))
    }

    /// Replace the values of a row or column, growing the grid if needed
    pub fn update_line(&mut self, axis: Axis, key: impl Into<Key>, mut values: Vec<Value>) -> Result<()> {
        let position = self.get_key(axis, key)?;
        let other = axis.other();
        while self.len(other) < values.len() {
            self.push_blank(other);
        }
        values.resize(self.len(other), Value::Null);
        for (i, value) in values.into_iter().enumerate() {
            *self.value_at_mut(axis, position, i) = value;
        }
        Ok(())
    }

    /// Move a row or column from `from` to `to`, shifting everything between
    /// by one.
    ///
    /// With `sticky_label` the label travels with the data; otherwise labels
    /// stay bound to their positions while the data moves underneath them.
    pub fn move_line(
        &mut self,
        axis: Axis,
        from: impl Into<Key>,
        to: impl Into<Key>,
        sticky_label: bool,
    ) -> Result<()> {
        let from = self.get_key(axis, from)?;
        let to = self.get_key(axis, to)?;
        if from == to {
            return Ok(());
        }
        let values = self.remove_line_data(axis, from);
        self.insert_line_data(axis, to, values);
        if sticky_label {
            self.keys_mut(axis).relocate(from, to);
        }
        Ok(())
    }

    pub fn move_row(&mut self, from: impl Into<Key>, to: impl Into<Key>) -> Result<()> {
        self.move_line(Axis::Row, from, to, true)
    }

    pub fn move_column(&mut self, from: impl Into<Key>, to: impl Into<Key>) -> Result<()> {
        self.move_line(Axis::Column, from, to, true)
    }

    /// Exchange two rows or columns.
    ///
    /// The data is exchanged with two label-free moves; labels follow their
    /// data only when `sticky_label` is set.
    pub fn swap(
        &mut self,
        axis: Axis,
        a: impl Into<Key>,
        b: impl Into<Key>,
        sticky_label: bool,
    ) -> Result<()> {
        let a = self.get_key(axis, a)?;
        let b = self.get_key(axis, b)?;
        if a == b {
            return Ok(());
        }
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        self.move_line(axis, low, high, false)?;
        self.move_line(axis, high - 1, low, false)?;
        if sticky_label {
            let low_label = self.label(axis, low).map(str::to_string);
            let high_label = self.label(axis, high).map(str::to_string);
            let keys = self.keys_mut(axis);
            keys.set(low, None)?;
            keys.set(high, low_label)?;
            keys.set(low, high_label)?;
        }
        Ok(())
    }

    /// Rows become columns and columns become rows, labels included
    pub fn transpose(&self) -> LabeledGrid {
        let data = (0..self.columns())
            .map(|c| self.line_values(Axis::Column, c))
            .collect();
        LabeledGrid {
            data,
            row_keys: relabel(&self.column_keys, Axis::Row),
            column_keys: relabel(&self.row_keys, Axis::Column),
        }
    }

    /// Copy of the grid keeping only the positions of `axis` whose mask entry
    /// is true
    pub(crate) fn retain_positions(&self, axis: Axis, mask: &[bool]) -> LabeledGrid {
        let mut pruned = self.clone();
        for position in (0..self.len(axis)).rev() {
            if !mask.get(position).copied().unwrap_or(false) {
                pruned.keys_mut(axis).remove(position);
                pruned.remove_line_data(axis, position);
            }
        }
        pruned
    }

    /// Rearrange the lines of `axis` so that new position `i` holds old
    /// position `order[i]`. Labels travel with their data.
    pub(crate) fn reorder(&mut self, axis: Axis, order: &[usize]) {
        debug_assert_eq!(order.len(), self.len(axis));
        let lines: Vec<Vec<Value>> = order.iter().map(|&p| self.line_values(axis, p)).collect();
        let labels: Vec<Option<String>> = order
            .iter()
            .map(|&p| self.label(axis, p).map(str::to_string))
            .collect();
        for (position, values) in lines.into_iter().enumerate() {
            for (across, value) in values.into_iter().enumerate() {
                *self.value_at_mut(axis, position, across) = value;
            }
        }
        let mut keys = AxisKeys::new(axis);
        for label in labels {
            // A permutation of unique labels stays unique
            let _ = keys.push(label);
        }
        *self.keys_mut(axis) = keys;
    }

    /// The cell at `position` on `axis` and `across` on the other axis
    pub(crate) fn value_at(&self, axis: Axis, position: usize, across: usize) -> &Value {
        match axis {
            Axis::Row => &self.data[position][across],
            Axis::Column => &self.data[across][position],
        }
    }

    fn value_at_mut(&mut self, axis: Axis, position: usize, across: usize) -> &mut Value {
        match axis {
            Axis::Row => &mut self.data[position][across],
            Axis::Column => &mut self.data[across][position],
        }
    }

    fn keys_mut(&mut self, axis: Axis) -> &mut AxisKeys {
        match axis {
            Axis::Row => &mut self.row_keys,
            Axis::Column => &mut self.column_keys,
        }
    }

    pub(crate) fn line_values(&self, axis: Axis, position: usize) -> Vec<Value> {
        match axis {
            Axis::Row => self.data[position].clone(),
            Axis::Column => self.data.iter().map(|row| row[position].clone()).collect(),
        }
    }

    /// `values` must already match the length of the other axis
    fn insert_line_data(&mut self, axis: Axis, at: usize, values: Vec<Value>) {
        match axis {
            Axis::Row => self.data.insert(at, values),
            Axis::Column => {
                for (row, value) in self.data.iter_mut().zip(values) {
                    row.insert(at, value);
                }
            }
        }
    }

    fn remove_line_data(&mut self, axis: Axis, position: usize) -> Vec<Value> {
        match axis {
            Axis::Row => self.data.remove(position),
            Axis::Column => self.data.iter_mut().map(|row| row.remove(position)).collect(),
        }
    }

    /// Append an unlabeled line of nulls
    fn push_blank(&mut self, axis: Axis) {
        let end = self.len(axis);
        let blank = vec![Value::Null; self.len(axis.other())];
        self.insert_line_data(axis, end, blank);
        // A null label never collides
        let _ = self.keys_mut(axis).push(None);
    }
}

fn relabel(keys: &AxisKeys, axis: Axis) -> AxisKeys {
    let mut relabeled = AxisKeys::new(axis);
    for label in keys.labels() {
        // Labels were unique on their original axis
        let _ = relabeled.push(label.clone());
    }
    relabeled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LabeledGrid {
        let mut grid = LabeledGrid::new();
        grid.append_column(vec![], Some("slug")).unwrap();
        grid.append_column(vec![], Some("title")).unwrap();
        grid.append_row(vec!["home".into(), "Home".into()], Some("r0"))
            .unwrap();
        grid.append_row(vec!["about".into(), "About".into()], Some("r1"))
            .unwrap();
        grid.append_row(vec!["blog".into(), "Blog".into()], None)
            .unwrap();
        grid
    }

    fn assert_rectangular(grid: &LabeledGrid) {
        for (_, _, row) in grid.iter_rows() {
            assert_eq!(row.len(), grid.columns());
        }
        assert_eq!(grid.labels(Axis::Row).len(), grid.rows());
    }

    #[test]
    fn test_append_pads_other_axis() {
        let mut grid = sample();
        grid.append_row(
            vec!["x".into(), "X".into(), "extra".into()],
            Some("wide"),
        )
        .unwrap();
        assert_eq!(grid.columns(), 3);
        assert_eq!(grid.label(Axis::Column, 2), None);
        assert_eq!(grid.cell(0usize, 2usize).unwrap(), &Value::Null);
        assert_rectangular(&grid);
    }

    #[test]
    fn test_append_short_row_is_padded() {
        let mut grid = sample();
        grid.append_row(vec!["only-slug".into()], None).unwrap();
        assert_eq!(grid.cell(3usize, "title").unwrap(), &Value::Null);
        assert_rectangular(&grid);
    }

    #[test]
    fn test_append_duplicate_label_fails_without_side_effects() {
        let mut grid = sample();
        let before = grid.clone();
        let err = grid
            .append_row(vec!["a".into(), "b".into(), "c".into()], Some("r0"))
            .unwrap_err();
        assert!(matches!(err, GridError::DuplicateLabel { .. }));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_append_column_to_empty_grid() {
        let mut grid = LabeledGrid::new();
        grid.append_column(vec!["a".into(), "b".into()], Some("letters"))
            .unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.columns(), 1);
        assert_eq!(grid.cell(1usize, "letters").unwrap(), &Value::from("b"));
    }

    #[test]
    fn test_get_key_by_label_or_position() {
        let grid = sample();
        assert_eq!(grid.get_key(Axis::Column, "title").unwrap(), 1);
        assert_eq!(grid.get_key(Axis::Row, 2usize).unwrap(), 2);
        assert!(grid.get_key(Axis::Row, 3usize).is_err());
        assert!(grid.get_key(Axis::Column, "order").is_err());
    }

    #[test]
    fn test_move_row_sticky_label() {
        let mut grid = sample();
        grid.move_row(0usize, 2usize).unwrap();
        assert_eq!(grid.cell(2usize, "slug").unwrap(), &Value::from("home"));
        assert_eq!(grid.cell(0usize, "slug").unwrap(), &Value::from("about"));
        assert_eq!(grid.label(Axis::Row, 2), Some("r0"));
        assert_eq!(grid.label(Axis::Row, 0), Some("r1"));
    }

    #[test]
    fn test_move_row_loose_label() {
        let mut grid = sample();
        grid.move_line(Axis::Row, 0usize, 2usize, false).unwrap();
        assert_eq!(grid.cell(2usize, "slug").unwrap(), &Value::from("home"));
        assert_eq!(grid.label(Axis::Row, 0), Some("r0"));
        assert_eq!(grid.label(Axis::Row, 2), None);
    }

    #[test]
    fn test_move_to_same_position_is_identity() {
        let mut grid = sample();
        let before = grid.clone();
        grid.move_row(1usize, 1usize).unwrap();
        assert_eq!(grid, before);
    }

    #[test]
    fn test_swap_columns() {
        let mut grid = sample();
        grid.swap(Axis::Column, "slug", "title", true).unwrap();
        assert_eq!(grid.label(Axis::Column, 0), Some("title"));
        assert_eq!(grid.cell(0usize, "title").unwrap(), &Value::from("Home"));
        assert_eq!(grid.cell(0usize, 0usize).unwrap(), &Value::from("Home"));
    }

    #[test]
    fn test_swap_rows_far_apart() {
        let mut grid = sample();
        grid.swap(Axis::Row, 0usize, 2usize, true).unwrap();
        assert_eq!(grid.cell(0usize, "slug").unwrap(), &Value::from("blog"));
        assert_eq!(grid.cell(1usize, "slug").unwrap(), &Value::from("about"));
        assert_eq!(grid.cell(2usize, "slug").unwrap(), &Value::from("home"));
        assert_eq!(grid.label(Axis::Row, 0), None);
        assert_eq!(grid.label(Axis::Row, 2), Some("r0"));
    }

    #[test]
    fn test_swap_without_sticky_labels_keeps_labels_in_place() {
        let mut grid = sample();
        grid.swap(Axis::Row, 0usize, 1usize, false).unwrap();
        assert_eq!(grid.cell("r0", "slug").unwrap(), &Value::from("about"));
        assert_eq!(grid.cell("r1", "slug").unwrap(), &Value::from("home"));
    }

    #[test]
    fn test_delete_column() {
        let mut grid = sample();
        let removed = grid.delete(Axis::Column, "slug").unwrap();
        assert_eq!(
            removed,
            vec![Value::from("home"), Value::from("about"), Value::from("blog")]
        );
        assert_eq!(grid.columns(), 1);
        assert_eq!(grid.label(Axis::Column, 0), Some("title"));
        assert_rectangular(&grid);
    }

    #[test]
    fn test_rename_label() {
        let mut grid = sample();
        grid.set_label(Axis::Column, "title", Some("name")).unwrap();
        assert_eq!(grid.get_key(Axis::Column, "name").unwrap(), 1);
        let err = grid
            .set_label(Axis::Column, "name", Some("slug"))
            .unwrap_err();
        assert!(matches!(err, GridError::DuplicateLabel { .. }));
    }

    #[test]
    fn test_update_line_grows_grid() {
        let mut grid = sample();
        grid.update_line(
            Axis::Row,
            "r1",
            vec!["about".into(), "About us".into(), 3.into()],
        )
        .unwrap();
        assert_eq!(grid.columns(), 3);
        assert_eq!(grid.cell("r1", 2usize).unwrap(), &Value::Int(3));
        assert_eq!(grid.cell("r0", 2usize).unwrap(), &Value::Null);
    }

    #[test]
    fn test_transpose() {
        let grid = sample();
        let flipped = grid.transpose();
        assert_eq!(flipped.rows(), 2);
        assert_eq!(flipped.columns(), 3);
        assert_eq!(flipped.cell("title", "r1").unwrap(), &Value::from("About"));
    }

    #[test]
    fn test_retain_positions() {
        let grid = sample();
        let pruned = grid.retain_positions(Axis::Row, &[true, false, true]);
        assert_eq!(pruned.rows(), 2);
        assert_eq!(pruned.label(Axis::Row, 0), Some("r0"));
        assert_eq!(pruned.cell(1usize, "slug").unwrap(), &Value::from("blog"));
        assert_eq!(grid.rows(), 3);
    }
}
