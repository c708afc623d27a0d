//! Pages
//!
//! Turns a flat pages grid (one row per page, keyed by a `slug` column) into
//! a cross-linked hierarchy.
//!
//! - `slug.rs`: slug normalization and the symbolic `--` form
//! - `tree.rs`: [`PageTree`] construction and navigation
//! - `site.rs`: [`Site`], which loads, orders and builds the pages once
//! - `query.rs`: [`PageQuery`], chained filters over a site's pages

pub mod query;
pub mod site;
pub mod slug;
pub mod tree;

pub use query::PageQuery;
pub use site::{order_pages, read_grid, Site};
pub use slug::{normalize_slug, symbolic_slug};
pub use tree::{PageNode, PageRow, PageTree, SlugMap, TreeOptions};
