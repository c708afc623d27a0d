//! CSV import and export
//!
//! The first record can carry the column labels and the first field of each
//! record the row label. Records shorter than the widest one are padded with
//! nulls so the grid stays rectangular.

use super::axis::Axis;
use super::labeled::LabeledGrid;
use super::value::Value;
use crate::error::{GridError, Result};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Dialect and labeling options for CSV
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub quote: u8,
    /// First record holds the column labels
    pub column_labels: bool,
    /// First field of every record holds the row label
    pub row_labels: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            delimiter: b',',
            quote: b'"',
            column_labels: true,
            row_labels: false,
        }
    }
}

impl CsvOptions {
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    pub fn with_column_labels(mut self, enabled: bool) -> Self {
        self.column_labels = enabled;
        self
    }

    pub fn with_row_labels(mut self, enabled: bool) -> Self {
        self.row_labels = enabled;
        self
    }
}

fn non_empty(label: String) -> Option<String> {
    if label.is_empty() {
        None
    } else {
        Some(label)
    }
}

impl LabeledGrid {
    /// Decode CSV from any reader
    pub fn from_csv_reader<R: Read>(reader: R, options: &CsvOptions) -> Result<LabeledGrid> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut grid = LabeledGrid::new();
        let mut header: Option<Vec<String>> = None;

        for (index, record) in reader.records().enumerate() {
            let record = record?;
            let mut fields: Vec<String> = record.iter().map(str::to_string).collect();
            if index == 0 && options.column_labels {
                header = Some(fields);
                continue;
            }
            let label = if options.row_labels && !fields.is_empty() {
                non_empty(fields.remove(0))
            } else {
                None
            };
            let values = fields.into_iter().map(Value::Str).collect();
            grid.append_row(values, label.as_deref())?;
        }

        if let Some(mut header) = header {
            if options.row_labels && !header.is_empty() {
                header.remove(0);
            }
            while grid.columns() < header.len() {
                grid.append_column(Vec::new(), None)?;
            }
            let mut labels: Vec<Option<String>> = header.into_iter().map(non_empty).collect();
            labels.resize(grid.columns(), None);
            grid.set_labels(Axis::Column, labels)?;
        }

        Ok(grid)
    }

    pub fn from_csv_str(source: &str, options: &CsvOptions) -> Result<LabeledGrid> {
        Self::from_csv_reader(source.as_bytes(), options)
    }

    /// Read a CSV file. Missing, unreadable and empty files are import errors.
    pub fn read_csv(path: impl AsRef<Path>, options: &CsvOptions) -> Result<LabeledGrid> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| GridError::ImportFormat(format!("{}: {}", path.display(), e)))?;
        let grid = Self::from_csv_reader(file, options)?;
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
            "loaded csv"
        );
        Ok(grid)
    }

    /// Encode the grid as CSV. Unlabeled columns are headed by their position
    /// and unlabeled rows by theirs.
    pub fn to_csv_writer<W: Write>(&self, writer: W, options: &CsvOptions) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .flexible(true)
            .from_writer(writer);

        if options.column_labels {
            let mut header = Vec::with_capacity(self.columns() + 1);
            if options.row_labels {
                header.push(String::new());
            }
            for position in 0..self.columns() {
                header.push(position_name(self.label(Axis::Column, position), position));
            }
            writer.write_record(&header)?;
        }

        for (position, label, values) in self.iter_rows() {
            let mut record = Vec::with_capacity(values.len() + 1);
            if options.row_labels {
                record.push(position_name(label, position));
            }
            record.extend(values.iter().map(|v| v.to_string()));
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self, options: &CsvOptions) -> Result<String> {
        let mut buffer = Vec::new();
        self.to_csv_writer(&mut buffer, options)?;
        String::from_utf8(buffer).map_err(|e| GridError::ImportFormat(e.to_string()))
    }

    pub fn write_csv(&self, path: impl AsRef<Path>, options: &CsvOptions) -> Result<()> {
        let file = File::create(path.as_ref())?;
        self.to_csv_writer(file, options)
    }
}

pub(crate) fn position_name(label: Option<&str>, position: usize) -> String {
    label
        .map(str::to_string)
        .unwrap_or_else(|| position.to_string())
}
