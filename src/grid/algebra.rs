//! Filtering and label-based set algebra
//!
//! Merge, diff and intersect identify lines by label. A line without a label
//! never equals anything: it survives a merge but is dropped by diff and
//! intersect.

use super::axis::Axis;
use super::labeled::LabeledGrid;
use super::value::Value;
use crate::error::Result;
use std::collections::HashSet;

impl LabeledGrid {
    /// New grid with the lines of `axis` for which `predicate(position, label,
    /// values)` holds. The receiver is left untouched.
    pub fn filter<F>(&self, axis: Axis, mut predicate: F) -> LabeledGrid
    where
        F: FnMut(usize, Option<&str>, &[Value]) -> bool,
    {
        let mask: Vec<bool> = (0..self.len(axis))
            .map(|p| {
                let values = self.line_values(axis, p);
                predicate(p, self.label(axis, p), &values)
            })
            .collect();
        self.retain_positions(axis, &mask)
    }

    pub fn filter_rows<F>(&self, predicate: F) -> LabeledGrid
    where
        F: FnMut(usize, Option<&str>, &[Value]) -> bool,
    {
        self.filter(Axis::Row, predicate)
    }

    pub fn filter_columns<F>(&self, predicate: F) -> LabeledGrid
    where
        F: FnMut(usize, Option<&str>, &[Value]) -> bool,
    {
        self.filter(Axis::Column, predicate)
    }

    /// Lines of `self` followed by the lines of `other` whose label is
    /// missing from `self`. Unlabeled lines of `other` are always appended.
    pub fn merge(&self, axis: Axis, other: &LabeledGrid) -> Result<LabeledGrid> {
        let mut merged = self.clone();
        for position in 0..other.len(axis) {
            let label = other.label(axis, position);
            if label.is_some_and(|l| merged.keys(axis).position_of(l).is_some()) {
                continue;
            }
            merged.append(axis, other.line_values(axis, position), label)?;
        }
        Ok(merged)
    }

    /// Labeled lines of `self` whose label does not appear in `other`
    pub fn diff(&self, axis: Axis, other: &LabeledGrid) -> LabeledGrid {
        let theirs = label_set(other, axis);
        self.retain_labeled(axis, |label| !theirs.contains(label))
    }

    /// Labeled lines of `self` whose label also appears in `other`
    pub fn intersect(&self, axis: Axis, other: &LabeledGrid) -> LabeledGrid {
        let theirs = label_set(other, axis);
        self.retain_labeled(axis, |label| theirs.contains(label))
    }

    pub fn merge_rows(&self, other: &LabeledGrid) -> Result<LabeledGrid> {
        self.merge(Axis::Row, other)
    }

    pub fn diff_rows(&self, other: &LabeledGrid) -> LabeledGrid {
        self.diff(Axis::Row, other)
    }

    pub fn intersect_rows(&self, other: &LabeledGrid) -> LabeledGrid {
        self.intersect(Axis::Row, other)
    }

    pub fn merge_columns(&self, other: &LabeledGrid) -> Result<LabeledGrid> {
        self.merge(Axis::Column, other)
    }

    pub fn diff_columns(&self, other: &LabeledGrid) -> LabeledGrid {
        self.diff(Axis::Column, other)
    }

    pub fn intersect_columns(&self, other: &LabeledGrid) -> LabeledGrid {
        self.intersect(Axis::Column, other)
    }

    fn retain_labeled<F>(&self, axis: Axis, keep: F) -> LabeledGrid
    where
        F: Fn(&str) -> bool,
    {
        let mask: Vec<bool> = (0..self.len(axis))
            .map(|p| self.label(axis, p).is_some_and(&keep))
            .collect();
        self.retain_positions(axis, &mask)
    }
}

fn label_set(grid: &LabeledGrid, axis: Axis) -> HashSet<&str> {
    grid.labels(axis)
        .iter()
        .filter_map(|l| l.as_deref())
        .collect()
}
