//! JSON import and export
//!
//! Accepted shapes are an array of rows or an object of rows keyed by row
//! label, where each row is an object (keys become column labels), an array
//! of scalars, or a single scalar.

use super::axis::Axis;
use super::csv_io::position_name;
use super::labeled::LabeledGrid;
use super::value::Value;
use crate::error::{GridError, Result};
use serde_json::Map;
use std::fs;
use std::path::Path;

/// Labeling options for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonOptions {
    /// Object keys of each row become (or match) column labels
    pub column_labels: bool,
    /// Keys of a top-level object become row labels
    pub row_labels: bool,
}

impl Default for JsonOptions {
    fn default() -> Self {
        JsonOptions {
            column_labels: true,
            row_labels: false,
        }
    }
}

impl JsonOptions {
    pub fn with_column_labels(mut self, enabled: bool) -> Self {
        self.column_labels = enabled;
        self
    }

    pub fn with_row_labels(mut self, enabled: bool) -> Self {
        self.row_labels = enabled;
        self
    }
}

fn scalar(value: &serde_json::Value, context: &str) -> Result<Value> {
    Value::from_json(value).ok_or_else(|| {
        GridError::ImportFormat(format!("nested value in {} is not a scalar", context))
    })
}

impl LabeledGrid {
    pub fn from_json_value(source: &serde_json::Value, options: &JsonOptions) -> Result<LabeledGrid> {
        let mut grid = LabeledGrid::new();
        match source {
            serde_json::Value::Array(rows) => {
                for row in rows {
                    append_json_row(&mut grid, row, None, options)?;
                }
            }
            serde_json::Value::Object(rows) => {
                for (key, row) in rows {
                    let label = options.row_labels.then_some(key.as_str());
                    append_json_row(&mut grid, row, label, options)?;
                }
            }
            _ => {
                return Err(GridError::ImportFormat(
                    "expected an array or an object of rows".to_string(),
                ))
            }
        }
        Ok(grid)
    }

    pub fn from_json_str(source: &str, options: &JsonOptions) -> Result<LabeledGrid> {
        let value: serde_json::Value = serde_json::from_str(source)?;
        Self::from_json_value(&value, options)
    }

    /// Read a JSON file. Missing, unreadable and empty files are import errors.
    pub fn read_json(path: impl AsRef<Path>, options: &JsonOptions) -> Result<LabeledGrid> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| GridError::ImportFormat(format!("{}: {}", path.display(), e)))?;
        let grid = Self::from_json_str(&text, options)?;
        if grid.is_empty() {
            return Err(GridError::ImportFormat(format!(
                "{}: no data",
                path.display()
            )));
        }
        tracing::debug!(
            path = %path.display(),
            rows = grid.rows(),
            columns = grid.columns(),
            "loaded json"
        );
        Ok(grid)
    }

    /// Associative view: rows keyed by label (or position), each row an
    /// object keyed by column label (or position). Fails with
    /// `DuplicateLabel` when a label equals the position name of an
    /// unlabeled line, since one of the two would be lost.
    pub fn to_assoc(&self) -> Result<Map<String, serde_json::Value>> {
        let mut rows = Map::new();
        for (position, label, values) in self.iter_rows() {
            let row = serde_json::Value::Object(self.row_object(values)?);
            insert_unique(&mut rows, Axis::Row, position_name(label, position), row)?;
        }
        Ok(rows)
    }

    pub fn to_json_value(&self, options: &JsonOptions) -> Result<serde_json::Value> {
        let encode_row = |values: &[Value]| -> Result<serde_json::Value> {
            if options.column_labels {
                Ok(serde_json::Value::Object(self.row_object(values)?))
            } else {
                Ok(serde_json::Value::Array(values.iter().map(Value::to_json).collect()))
            }
        };
        if options.row_labels {
            let mut rows = Map::new();
            for (position, label, values) in self.iter_rows() {
                insert_unique(&mut rows, Axis::Row, position_name(label, position), encode_row(values)?)?;
            }
            Ok(serde_json::Value::Object(rows))
        } else {
            let rows = self
                .iter_rows()
                .map(|(_, _, v)| encode_row(v))
                .collect::<Result<Vec<_>>>()?;
            Ok(serde_json::Value::Array(rows))
        }
    }

    pub fn to_json_string(&self, options: &JsonOptions) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_json_value(options)?)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>, options: &JsonOptions) -> Result<()> {
        fs::write(path.as_ref(), self.to_json_string(options)?)?;
        Ok(())
    }

    fn row_object(&self, values: &[Value]) -> Result<Map<String, serde_json::Value>> {
        let mut object = Map::new();
        for (c, v) in values.iter().enumerate() {
            let key = position_name(self.label(Axis::Column, c), c);
            insert_unique(&mut object, Axis::Column, key, v.to_json())?;
        }
        Ok(object)
    }
}

fn insert_unique(
    object: &mut Map<String, serde_json::Value>,
    axis: Axis,
    key: String,
    value: serde_json::Value,
) -> Result<()> {
    if object.contains_key(&key) {
        return Err(GridError::DuplicateLabel { axis, label: key });
    }
    object.insert(key, value);
    Ok(())
}

fn append_json_row(
    grid: &mut LabeledGrid,
    row: &serde_json::Value,
    label: Option<&str>,
    options: &JsonOptions,
) -> Result<()> {
    let values = match row {
        serde_json::Value::Object(fields) if options.column_labels => {
            let mut values = vec![Value::Null; grid.columns()];
            for (key, field) in fields {
                let column = match grid.keys(Axis::Column).position_of(key) {
                    Some(column) => column,
                    None => {
                        let column = grid.append_column(Vec::new(), Some(key.as_str()))?;
                        values.push(Value::Null);
                        column
                    }
                };
                values[column] = scalar(field, key)?;
            }
            values
        }
        serde_json::Value::Object(fields) => fields
            .iter()
            .map(|(key, field)| scalar(field, key))
            .collect::<Result<Vec<_>>>()?,
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| scalar(item, "array row"))
            .collect::<Result<Vec<_>>>()?,
        other => vec![scalar(other, "row")?],
    };
    grid.append_row(values, label)?;
    Ok(())
}
