//! Layered configuration.
//!
//! `defaults/tabula.default.toml` is embedded into the crate so the documented
//! defaults and runtime behavior never drift. Callers layer their own files
//! and overrides on top through [`Loader`] before deserializing into
//! [`TabulaConfig`].

use crate::error::{GridError, Result};
use crate::grid::{CsvOptions, JsonOptions};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/tabula.default.toml");

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TabulaConfig {
    pub pages: PagesConfig,
    pub csv: CsvConfig,
    pub json: JsonConfig,
}

/// Where pages come from and how their rows are read.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PagesConfig {
    pub path: PathBuf,
    pub slug_column: String,
    pub order_column: String,
    pub home_slug: String,
    pub synthetic_order_base: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CsvConfig {
    pub delimiter: char,
    pub quote: char,
    pub column_labels: bool,
    pub row_labels: bool,
}

impl CsvConfig {
    /// Delimiter and quote must be single-byte characters
    pub fn to_options(&self) -> Result<CsvOptions> {
        Ok(CsvOptions::default()
            .with_delimiter(single_byte("csv.delimiter", self.delimiter)?)
            .with_quote(single_byte("csv.quote", self.quote)?)
            .with_column_labels(self.column_labels)
            .with_row_labels(self.row_labels))
    }
}

fn single_byte(key: &str, c: char) -> Result<u8> {
    u8::try_from(c)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| GridError::InvalidArgument(format!("{} must be an ASCII character, got '{}'", key, c)))
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JsonConfig {
    pub column_labels: bool,
    pub row_labels: bool,
}

impl JsonConfig {
    pub fn to_options(&self) -> JsonOptions {
        JsonOptions::default()
            .with_column_labels(self.column_labels)
            .with_row_labels(self.row_labels)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer a configuration file that may be absent.
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override, e.g. `pages.path` from the CLI.
    pub fn set_override<I>(mut self, key: &str, value: I) -> std::result::Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> std::result::Result<TabulaConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Defaults only
pub fn load_defaults() -> std::result::Result<TabulaConfig, ConfigError> {
    Loader::new().build()
}
