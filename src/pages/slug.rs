//! Slug helpers
//!
//! A slug is a `/`-separated path such as `about/team/jane`. Its symbolic
//! form replaces `/` with `--` (`about--team--jane`) and serves as a flat key.

use once_cell::sync::Lazy;
use regex::Regex;

static REPEATED_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-{2,}|/{2,}").expect("separator pattern is valid"));

pub const SYMBOLIC_SEPARATOR: &str = "--";

/// Trim `/`, `-` and whitespace from both ends, then turn each run of two or
/// more `-` and each run of two or more `/` into a single `/`.
///
/// A mixed pair such as `/-` is left alone. The symbolic form of a slug
/// normalizes back to the slug itself.
pub fn normalize_slug(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches(|c| c == '/' || c == '-');
    REPEATED_SEPARATORS.replace_all(trimmed, "/").into_owned()
}

/// `about/team` -> `about--team`
pub fn symbolic_slug(slug: &str) -> String {
    slug.replace('/', SYMBOLIC_SEPARATOR)
}

/// `about--team` -> `about/team`
pub fn slug_from_symbolic(symbolic: &str) -> String {
    symbolic.replace(SYMBOLIC_SEPARATOR, "/")
}

/// Path segments of a normalized slug
pub fn segments(slug: &str) -> impl Iterator<Item = &str> {
    slug.split('/').filter(|s| !s.is_empty())
}

/// Proper path prefixes of a slug, root-most first
pub fn ancestor_slugs(slug: &str) -> Vec<String> {
    let parts: Vec<&str> = segments(slug).collect();
    (1..parts.len()).map(|n| parts[..n].join("/")).collect()
}

/// Title derived from the last path segment: `our-team_page` -> `Our Team Page`
pub fn titleize(slug: &str) -> String {
    let last = segments(slug).last().unwrap_or("");
    last.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
