//! Axis addressing
//!
//! Every row and column has a canonical integer position and an optional
//! label. `AxisKeys` owns the labels of one axis and enforces their
//! uniqueness; positions are implied by the order of the label slots.

use crate::error::{GridError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two dimensions of a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Row,
    Column,
}

impl Axis {
    /// The complementary axis
    pub fn other(self) -> Axis {
        match self {
            Axis::Row => Axis::Column,
            Axis::Column => Axis::Row,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Axis::Row => "row",
            Axis::Column => "column",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Axis {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "row" | "rows" => Ok(Axis::Row),
            "column" | "columns" | "col" | "cols" => Ok(Axis::Column),
            other => Err(GridError::InvalidArgument(format!(
                "unknown axis '{}'",
                other
            ))),
        }
    }
}

/// Either a position or a label on some axis
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Position(usize),
    Label(String),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Position(p) => write!(f, "{}", p),
            Key::Label(l) => write!(f, "'{}'", l),
        }
    }
}

impl From<usize> for Key {
    fn from(p: usize) -> Self {
        Key::Position(p)
    }
}

impl From<&str> for Key {
    fn from(l: &str) -> Self {
        Key::Label(l.to_string())
    }
}

impl From<String> for Key {
    fn from(l: String) -> Self {
        Key::Label(l)
    }
}

impl From<&String> for Key {
    fn from(l: &String) -> Self {
        Key::Label(l.clone())
    }
}

impl From<&Key> for Key {
    fn from(k: &Key) -> Self {
        k.clone()
    }
}

/// Labels of one axis, one slot per position
#[derive(Debug, Clone, PartialEq)]
pub struct AxisKeys {
    axis: Axis,
    labels: Vec<Option<String>>,
}

impl AxisKeys {
    pub fn new(axis: Axis) -> Self {
        AxisKeys {
            axis,
            labels: Vec::new(),
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label(&self, position: usize) -> Option<&str> {
        self.labels.get(position).and_then(|l| l.as_deref())
    }

    pub fn labels(&self) -> &[Option<String>] {
        &self.labels
    }

    pub fn position_of(&self, label: &str) -> Option<usize> {
        self.labels
            .iter()
            .position(|l| l.as_deref() == Some(label))
    }

    /// Resolve a key to its canonical position
    pub fn resolve(&self, key: &Key) -> Result<usize> {
        match key {
            Key::Position(p) if *p < self.labels.len() => Ok(*p),
            Key::Position(p) => Err(GridError::KeyNotFound {
                axis: self.axis,
                key: *p,
            }),
            Key::Label(l) => self.position_of(l).ok_or_else(|| GridError::LabelNotFound {
                axis: self.axis,
                label: l.clone(),
            }),
        }
    }

    /// Fail if `label` is carried by any position other than `except`
    pub fn ensure_unique(&self, label: Option<&str>, except: Option<usize>) -> Result<()> {
        let Some(label) = label else {
            return Ok(());
        };
        match self.position_of(label) {
            Some(p) if Some(p) != except => Err(GridError::DuplicateLabel {
                axis: self.axis,
                label: label.to_string(),
            }),
            _ => Ok(()),
        }
    }

    pub(crate) fn insert(&mut self, position: usize, label: Option<String>) -> Result<()> {
        self.ensure_unique(label.as_deref(), None)?;
        self.labels.insert(position, label);
        Ok(())
    }

    pub(crate) fn push(&mut self, label: Option<String>) -> Result<()> {
        let end = self.labels.len();
        self.insert(end, label)
    }

    pub(crate) fn remove(&mut self, position: usize) -> Option<String> {
        self.labels.remove(position)
    }

    pub(crate) fn set(&mut self, position: usize, label: Option<String>) -> Result<()> {
        self.ensure_unique(label.as_deref(), Some(position))?;
        self.labels[position] = label;
        Ok(())
    }

    pub(crate) fn relocate(&mut self, from: usize, to: usize) {
        let label = self.labels.remove(from);
        self.labels.insert(to, label);
    }
}
