//! Chained page queries over a [`Site`]

use super::site::Site;
use super::slug::{normalize_slug, symbolic_slug};
use super::tree::PageNode;
use crate::error::Result;
use crate::grid::ordering::{bucket_order, Order};
use crate::grid::{Axis, Value};
use crate::selector::Selector;
use std::collections::HashSet;

/// Builder returned by [`Site::query`]. Every filter narrows the result;
/// nothing runs until [`PageQuery::fetch`].
#[derive(Debug, Clone)]
pub struct PageQuery<'s> {
    site: &'s Site,
    selector: Option<String>,
    level: Option<usize>,
    parent: Option<String>,
    ancestor: Option<String>,
    order: Option<(String, Order)>,
    limit: Option<usize>,
}

impl<'s> PageQuery<'s> {
    pub(crate) fn new(site: &'s Site) -> Self {
        PageQuery {
            site,
            selector: None,
            level: None,
            parent: None,
            ancestor: None,
            order: None,
            limit: None,
        }
    }

    /// Keep pages whose row matches a selector over the pages grid
    pub fn with_selector(mut self, selector: &str) -> Self {
        self.selector = Some(selector.to_string());
        self
    }

    pub fn with_level(mut self, level: usize) -> Self {
        self.level = Some(level);
        self
    }

    /// Direct children of `slug`
    pub fn with_parent(mut self, slug: &str) -> Self {
        self.parent = Some(symbolic_slug(&normalize_slug(slug)));
        self
    }

    /// Any descendant of `slug`
    pub fn with_ancestor(mut self, slug: &str) -> Self {
        self.ancestor = Some(symbolic_slug(&normalize_slug(slug)));
        self
    }

    /// Order by a node attribute or source column. Pages with equal values
    /// keep their tree order.
    pub fn with_order(mut self, field: &str, order: Order) -> Self {
        self.order = Some((field.to_string(), order));
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn fetch(&self) -> Result<Vec<&'s PageNode>> {
        let selected = match &self.selector {
            Some(source) => Some(self.selected_slugs(source)?),
            None => None,
        };

        let mut pages: Vec<&'s PageNode> = self
            .site
            .tree()
            .nodes()
            .filter(|node| {
                selected
                    .as_ref()
                    .map_or(true, |s| s.contains(&node.symbolic_slug))
            })
            .filter(|node| self.level.map_or(true, |level| node.level == level))
            .filter(|node| {
                self.parent
                    .as_ref()
                    .map_or(true, |parent| node.parent.as_ref() == Some(parent))
            })
            .filter(|node| {
                self.ancestor
                    .as_ref()
                    .map_or(true, |ancestor| node.ancestors.contains(ancestor))
            })
            .collect();

        if let Some((field, order)) = &self.order {
            let values: Vec<Value> = pages.iter().map(|node| node.field(field)).collect();
            let permutation = bucket_order(&values, *order);
            pages = permutation.into_iter().map(|i| pages[i]).collect();
        }
        if let Some(limit) = self.limit {
            pages.truncate(limit);
        }
        Ok(pages)
    }

    /// Symbolic slugs of the grid rows a selector keeps
    fn selected_slugs(&self, source: &str) -> Result<HashSet<String>> {
        let grid = self.site.pages();
        if grid.rows() == 0 {
            return Ok(HashSet::new());
        }
        let mask = Selector::compile(source)?.mask(grid, Axis::Row)?;
        let slug_column = grid.get_key(Axis::Column, self.site.config().slug_column.as_str())?;
        Ok(grid
            .iter_rows()
            .filter(|(position, _, _)| mask[*position])
            .map(|(_, _, values)| symbolic_slug(&normalize_slug(&values[slug_column].as_text())))
            .collect())
    }
}
