//! # tabula
//!
//! Tabular page data for small sites: a labeled 2D grid, a selector language
//! to query it, and a page tree derived from slug paths.
//!
//! ```text
//! pages.csv ──> LabeledGrid ──search──> LabeledGrid ──> PageTree
//! ```
//!
//! - [`grid`]: [`LabeledGrid`], its structural edits, ordering, set algebra
//!   and CSV/JSON import/export
//! - [`selector`]: the selector engine behind [`LabeledGrid::search`]
//! - [`pages`]: [`PageTree`], the [`Site`] context and page queries
//! - [`config`]: layered TOML configuration
//!
//! ## Testing
//!
//! Sample data lives in `samples/` and is loaded through the [`testing`]
//! module, both by unit tests and by the integration tests in `tests/`.

pub mod config;
pub mod error;
pub mod grid;
pub mod pages;
pub mod selector;
pub mod testing;

pub use error::{GridError, Result};
pub use grid::{Axis, Key, LabeledGrid, Order, Value};
pub use pages::{PageNode, PageQuery, PageTree, Site};
pub use selector::Selector;
