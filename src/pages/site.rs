//! Site context: the pages grid, its tree and the settings used to build them

use super::query::PageQuery;
use super::tree::{PageNode, PageTree, TreeOptions};
use crate::config::{PagesConfig, TabulaConfig};
use crate::error::{GridError, Result};
use crate::grid::ordering::{bucket_order, Order};
use crate::grid::{Axis, LabeledGrid, Value};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Site {
    config: PagesConfig,
    pages: LabeledGrid,
    tree: PageTree,
}

impl Site {
    /// Load the configured pages file. A file that cannot be imported or
    /// built leaves the site empty.
    pub fn load(config: &TabulaConfig) -> Site {
        let path = &config.pages.path;
        let built = read_grid(path, config).and_then(|grid| Site::from_grid(grid, &config.pages));
        match built {
            Ok(site) => site,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "pages unavailable, using an empty site");
                Site::empty(&config.pages)
            }
        }
    }

    /// Order the pages and build their tree
    pub fn from_grid(mut pages: LabeledGrid, config: &PagesConfig) -> Result<Site> {
        order_pages(&mut pages, config)?;
        let options = TreeOptions {
            slug_column: config.slug_column.clone(),
            home_slug: config.home_slug.clone(),
        };
        let tree = PageTree::from_grid_with(&pages, &options)?;
        Ok(Site {
            config: config.clone(),
            pages,
            tree,
        })
    }

    pub fn empty(config: &PagesConfig) -> Site {
        Site {
            config: config.clone(),
            pages: LabeledGrid::new(),
            tree: PageTree::default(),
        }
    }

    pub fn config(&self) -> &PagesConfig {
        &self.config
    }

    /// The pages grid, in page order
    pub fn pages(&self) -> &LabeledGrid {
        &self.pages
    }

    pub fn tree(&self) -> &PageTree {
        &self.tree
    }

    pub fn page(&self, slug: &str) -> Option<&PageNode> {
        self.tree.get(slug)
    }

    pub fn query(&self) -> PageQuery<'_> {
        PageQuery::new(self)
    }
}

/// Read a grid, choosing the format from the file extension
pub fn read_grid(path: impl AsRef<Path>, config: &TabulaConfig) -> Result<LabeledGrid> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("csv") => LabeledGrid::read_csv(path, &config.csv.to_options()?),
        Some("json") => LabeledGrid::read_json(path, &config.json.to_options()),
        _ => Err(GridError::ImportFormat(format!(
            "{}: unsupported file type, expected .csv or .json",
            path.display()
        ))),
    }
}

/// Stable ascending order by the order column. Rows without a value get
/// `synthetic_order_base + position`, so they follow the ordered rows in
/// their original sequence. A grid without the column is left alone.
pub fn order_pages(pages: &mut LabeledGrid, config: &PagesConfig) -> Result<()> {
    if pages.keys(Axis::Column).position_of(&config.order_column).is_none() {
        return Ok(());
    }
    let values: Vec<Value> = pages
        .column(config.order_column.as_str())?
        .into_iter()
        .enumerate()
        .map(|(position, value)| {
            if value.is_blank() {
                Value::Int(config.synthetic_order_base + position as i64)
            } else {
                value
            }
        })
        .collect();
    let permutation = bucket_order(&values, Order::Asc);
    pages.reorder(Axis::Row, &permutation);
    Ok(())
}
