//! Labeled grid
//!
//! A spreadsheet-like 2D array of scalar values. Rows and columns are
//! addressed by integer position, and optionally by a unique label that can
//! be renamed without moving data.
//!
//! Layout:
//!     axis.rs      Axis, Key and the per-axis label store
//!     value.rs     scalar cell values
//!     labeled.rs   the grid and its structural edits (insert/move/swap/delete)
//!     ordering.rs  stable bucket ordering of rows or columns
//!     algebra.rs   filtering and label-based merge/diff/intersect
//!     csv_io.rs    CSV import/export
//!     json_io.rs   JSON import/export and the associative view
//!
//! Queries never mutate: `filter`, set operations and selector searches
//! (see [`crate::selector`]) all return new grids.

pub mod algebra;
pub mod axis;
pub mod csv_io;
pub mod json_io;
pub mod labeled;
pub mod ordering;
pub mod value;

pub use axis::{Axis, AxisKeys, Key};
pub use csv_io::CsvOptions;
pub use json_io::JsonOptions;
pub use labeled::LabeledGrid;
pub use ordering::Order;
pub use value::Value;
