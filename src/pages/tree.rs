//! Page tree construction
//!
//! The hierarchy is never stored in the source rows. It is derived from slug
//! prefixes: `a/b` is a descendant of `a` because `a` is a proper path prefix
//! of it. The build runs in passes over the flat node list:
//!
//! 1. per node: slug normalization, permalink, title, ancestors, parent, level
//! 2. children: every node is recorded under the node named by its parent
//! 3. descendants: every node is recorded under each of its ancestors
//!
//! Ancestors that have no row of their own are tolerated; they simply never
//! receive children. The tree is immutable once built.

use super::slug::{ancestor_slugs, normalize_slug, slug_from_symbolic, symbolic_slug, titleize};
use crate::error::Result;
use crate::grid::{Axis, LabeledGrid, Value};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};

/// Ordered map from symbolic slug to slug
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlugMap {
    entries: Vec<(String, String)>,
}

impl SlugMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace, keeping the first insertion position
    pub fn insert(&mut self, symbolic: impl Into<String>, slug: impl Into<String>) {
        let symbolic = symbolic.into();
        let slug = slug.into();
        match self.entries.iter_mut().find(|(key, _)| *key == symbolic) {
            Some(entry) => entry.1 = slug,
            None => self.entries.push((symbolic, slug)),
        }
    }

    pub fn get(&self, symbolic: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == symbolic)
            .map(|(_, slug)| slug.as_str())
    }

    pub fn contains_key(&self, symbolic: &str) -> bool {
        self.get(symbolic).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn symbolic_slugs(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl Serialize for SlugMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (symbolic, slug) in &self.entries {
            map.serialize_entry(symbolic, slug)?;
        }
        map.end()
    }
}

/// One page of the site
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageNode {
    pub slug: String,
    pub symbolic_slug: String,
    pub title: String,
    pub permalink: String,
    /// External link overriding the permalink
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Symbolic slug of the nearest ancestor
    pub parent: Option<String>,
    pub level: usize,
    /// Symbolic slugs, root-most first
    pub ancestors: Vec<String>,
    pub children: SlugMap,
    pub descendants: SlugMap,
    /// Remaining columns of the source row
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Value>,
}

impl PageNode {
    /// Ancestors as plain slugs, root-most first
    pub fn ancestor_slugs(&self) -> Vec<String> {
        self.ancestors.iter().map(|a| slug_from_symbolic(a)).collect()
    }

    /// Where a link to this page should point
    pub fn href(&self) -> &str {
        self.url.as_deref().unwrap_or(&self.permalink)
    }

    /// Named attribute of the page, falling back to the source row's fields
    pub fn field(&self, name: &str) -> Value {
        match name {
            "slug" => Value::from(self.slug.as_str()),
            "symbolic_slug" => Value::from(self.symbolic_slug.as_str()),
            "title" => Value::from(self.title.as_str()),
            "permalink" => Value::from(self.permalink.as_str()),
            "url" => Value::from(self.url.clone()),
            "target" => Value::from(self.target.clone()),
            "parent" => Value::from(self.parent.clone()),
            "level" => Value::Int(self.level as i64),
            other => self.fields.get(other).cloned().unwrap_or_default(),
        }
    }
}

/// One input row for the tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageRow {
    pub slug: String,
    pub title: Option<String>,
    pub url: Option<String>,
    pub target: Option<String>,
    pub fields: BTreeMap<String, Value>,
}

impl PageRow {
    pub fn new(slug: impl Into<String>) -> Self {
        PageRow {
            slug: slug.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Names used when reading page rows out of a grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeOptions {
    pub slug_column: String,
    pub home_slug: String,
}

impl Default for TreeOptions {
    fn default() -> Self {
        TreeOptions {
            slug_column: "slug".to_string(),
            home_slug: "home".to_string(),
        }
    }
}

// Matched without regard to case
const TITLE_COLUMN: &str = "title";
const URL_COLUMN: &str = "url";
const TARGET_COLUMN: &str = "target";

/// Pages keyed by symbolic slug, in row order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageTree {
    nodes: Vec<PageNode>,
    index: HashMap<String, usize>,
}

impl PageTree {
    /// Build from the rows of a grid with a slug column. Rows with a blank
    /// slug are skipped.
    pub fn from_grid(grid: &LabeledGrid) -> Result<PageTree> {
        Self::from_grid_with(grid, &TreeOptions::default())
    }

    pub fn from_grid_with(grid: &LabeledGrid, options: &TreeOptions) -> Result<PageTree> {
        if grid.rows() == 0 {
            return Ok(PageTree::default());
        }
        let slug_column = grid.get_key(Axis::Column, options.slug_column.as_str())?;
        let names: Vec<String> = (0..grid.columns())
            .map(|c| {
                grid.label(Axis::Column, c)
                    .map(str::to_string)
                    .unwrap_or_else(|| c.to_string())
            })
            .collect();

        let mut rows = Vec::with_capacity(grid.rows());
        for (position, _, values) in grid.iter_rows() {
            let slug = &values[slug_column];
            if slug.is_blank() {
                tracing::warn!(row = position, "skipping page row without a slug");
                continue;
            }
            let mut row = PageRow::new(slug.as_text());
            for (column, value) in values.iter().enumerate() {
                if column == slug_column {
                    continue;
                }
                let text = (!value.is_blank()).then(|| value.to_string());
                match names[column].to_ascii_lowercase().as_str() {
                    TITLE_COLUMN => row.title = text,
                    URL_COLUMN => row.url = text,
                    TARGET_COLUMN => row.target = text,
                    _ => {
                        row.fields.insert(names[column].clone(), value.clone());
                    }
                }
            }
            rows.push(row);
        }
        Ok(Self::build(rows, &options.home_slug))
    }

    /// Build from page rows. A repeated slug replaces the earlier page.
    pub fn build(rows: impl IntoIterator<Item = PageRow>, home_slug: &str) -> PageTree {
        let mut tree = PageTree::default();

        for row in rows {
            let slug = normalize_slug(&row.slug);
            if slug.is_empty() {
                tracing::warn!(raw = %row.slug, "skipping page with an empty slug");
                continue;
            }
            let node = describe(slug, row, home_slug);
            match tree.index.get(&node.symbolic_slug) {
                Some(&existing) => {
                    tracing::warn!(slug = %node.slug, "duplicate page slug, keeping the last row");
                    tree.nodes[existing] = node;
                }
                None => {
                    tree.index.insert(node.symbolic_slug.clone(), tree.nodes.len());
                    tree.nodes.push(node);
                }
            }
        }

        let links: Vec<(usize, String, String)> = tree
            .nodes
            .iter()
            .filter_map(|node| {
                let parent = node.parent.as_ref()?;
                let &at = tree.index.get(parent)?;
                Some((at, node.symbolic_slug.clone(), node.slug.clone()))
            })
            .collect();
        for (at, symbolic, slug) in links {
            tree.nodes[at].children.insert(symbolic, slug);
        }

        for a in 0..tree.nodes.len() {
            let mut descendants = SlugMap::new();
            let symbolic = &tree.nodes[a].symbolic_slug;
            for candidate in &tree.nodes {
                if candidate.ancestors.iter().any(|s| s == symbolic) {
                    descendants.insert(candidate.symbolic_slug.clone(), candidate.slug.clone());
                }
            }
            tree.nodes[a].descendants = descendants;
        }

        tracing::debug!(pages = tree.nodes.len(), "built page tree");
        tree
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Pages in row order
    pub fn nodes(&self) -> impl Iterator<Item = &PageNode> {
        self.nodes.iter()
    }

    /// Look up a page by symbolic slug or by (unnormalized) slug
    pub fn get(&self, key: &str) -> Option<&PageNode> {
        self.index
            .get(key)
            .or_else(|| self.index.get(&symbolic_slug(&normalize_slug(key))))
            .map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Top-level pages
    pub fn roots(&self) -> Vec<&PageNode> {
        self.nodes.iter().filter(|n| n.level == 0).collect()
    }

    pub fn children_of(&self, key: &str) -> Vec<&PageNode> {
        self.resolve_all(self.get(key).map(|n| &n.children))
    }

    pub fn descendants_of(&self, key: &str) -> Vec<&PageNode> {
        self.resolve_all(self.get(key).map(|n| &n.descendants))
    }

    /// Existing ancestors, root-most first
    pub fn ancestors_of(&self, key: &str) -> Vec<&PageNode> {
        match self.get(key) {
            Some(node) => node
                .ancestors
                .iter()
                .filter_map(|a| self.index.get(a).map(|&i| &self.nodes[i]))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Existing ancestors followed by the page itself
    pub fn breadcrumbs(&self, key: &str) -> Vec<&PageNode> {
        let mut trail = self.ancestors_of(key);
        if let Some(node) = self.get(key) {
            trail.push(node);
        }
        trail
    }

    /// Pages sharing the same parent, excluding the page itself
    pub fn siblings_of(&self, key: &str) -> Vec<&PageNode> {
        let Some(node) = self.get(key) else {
            return Vec::new();
        };
        self.nodes
            .iter()
            .filter(|n| n.parent == node.parent && n.symbolic_slug != node.symbolic_slug)
            .collect()
    }

    fn resolve_all(&self, map: Option<&SlugMap>) -> Vec<&PageNode> {
        map.map(|m| {
            m.symbolic_slugs()
                .filter_map(|s| self.index.get(s).map(|&i| &self.nodes[i]))
                .collect()
        })
        .unwrap_or_default()
    }
}

impl Serialize for PageTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.nodes.len()))?;
        for node in &self.nodes {
            map.serialize_entry(&node.symbolic_slug, node)?;
        }
        map.end()
    }
}

/// Pass 1: identity and ancestry of a single page
fn describe(slug: String, row: PageRow, home_slug: &str) -> PageNode {
    let ancestors: Vec<String> = ancestor_slugs(&slug)
        .iter()
        .map(|a| symbolic_slug(a))
        .collect();
    let permalink = if slug == home_slug {
        "/".to_string()
    } else {
        format!("/{}", slug)
    };
    let title = row
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| titleize(&slug));
    PageNode {
        symbolic_slug: symbolic_slug(&slug),
        title,
        permalink,
        url: row.url,
        target: row.target,
        parent: ancestors.last().cloned(),
        level: ancestors.len(),
        ancestors,
        children: SlugMap::new(),
        descendants: SlugMap::new(),
        fields: row.fields,
        slug,
    }
}
