//! Sample data for tests
//!
//! Tests read pages from the curated files in `samples/` instead of writing
//! fixture rows inline, so a change to the sample site is made in one place.
//!
//! Available samples:
//! - `pages.csv`: nine pages, three levels deep, with `order`, `url`,
//!   `target` and a free `section` column; two pages have no order and two
//!   have no title
//! - `pages.json`: the same pages as an array of objects
//!
//! ```rust,ignore
//! let grid = tabula::testing::pages_csv()?;
//! let tree = PageTree::from_grid(&grid)?;
//! ```

use crate::config::{load_defaults, TabulaConfig};
use crate::error::{GridError, Result};
use crate::grid::{CsvOptions, JsonOptions, LabeledGrid};
use crate::pages::Site;
use std::path::PathBuf;

/// Absolute path of a file in `samples/`
pub fn sample_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("samples")
        .join(name)
}

pub fn sample_string(name: &str) -> Result<String> {
    let path = sample_path(name);
    std::fs::read_to_string(&path)
        .map_err(|e| GridError::ImportFormat(format!("{}: {}", path.display(), e)))
}

pub fn pages_csv() -> Result<LabeledGrid> {
    LabeledGrid::read_csv(sample_path("pages.csv"), &CsvOptions::default())
}

pub fn pages_json() -> Result<LabeledGrid> {
    LabeledGrid::read_json(sample_path("pages.json"), &JsonOptions::default())
}

/// Default configuration pointed at a sample file
pub fn sample_config(name: &str) -> TabulaConfig {
    let mut config = load_defaults().expect("embedded defaults deserialize");
    config.pages.path = sample_path(name);
    config
}

/// The sample site, loaded from `pages.csv`
pub fn sample_site() -> Site {
    Site::load(&sample_config("pages.csv"))
}
