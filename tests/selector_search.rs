//! Selector searches over the sample pages

use rstest::rstest;
use std::borrow::Cow;
use tabula::testing::pages_csv;
use tabula::{Axis, GridError, LabeledGrid, Selector, Value};

fn slugs(grid: &LabeledGrid) -> Vec<String> {
    grid.column("slug")
        .unwrap()
        .iter()
        .map(Value::to_string)
        .collect()
}

#[rstest]
#[case::starts_with(r#"slug^="blog/""#, &["blog/post-1", "blog/post-2"])]
#[case::equal(r#"section=news"#, &["blog/post-1", "blog/post-2"])]
#[case::difference(
    r#"section=main - slug^=about"#,
    &["home", "blog", "contact"]
)]
#[case::numeric(r#"order>=5"#, &["blog/post-1", "blog/post-2", "docs"])]
#[case::numeric_skips_blank(r#"order<3"#, &["home", "about"])]
#[case::union_keeps_grid_order(
    r#"slug=contact , slug=home"#,
    &["home", "contact"]
)]
#[case::intersect(r#"section=main + order>2"#, &["about/team", "blog"])]
#[case::grouping(
    r#"(section=news , section=people) - title$=post"#,
    &["about/team/jane"]
)]
#[case::precedence(
    r#"section=people , section=news - title*=second"#,
    &["about/team/jane", "blog/post-1"]
)]
#[case::empty_title(r#"title="""#, &["about/team", "contact"])]
#[case::alternatives(r#"title|slug*=doc|jane"#, &["about/team/jane", "docs"])]
#[case::quoted_dash(r#"slug="blog/post-2""#, &["blog/post-2"])]
#[case::escaped_dash(r#"slug=blog/post\-2"#, &["blog/post-2"])]
#[case::unclosed_quote_runs_to_end(r#"slug="home"#, &["home"])]
#[case::key_field(r#"/<2"#, &["home", "about"])]
#[case::no_match(r#"section=archive"#, &[])]
fn test_row_search(#[case] query: &str, #[case] expected: &[&str]) {
    let grid = pages_csv().unwrap();
    let found = grid.search_rows(query).unwrap();
    assert_eq!(slugs(&found), expected);
    assert_eq!(found.columns(), grid.columns());
}

#[rstest]
#[case::unclosed("(slug=home")]
#[case::unmatched(")slug=home")]
#[case::dangling_operator("slug=home +")]
#[case::missing_operator("slug")]
#[case::unknown_operator("slug~home")]
fn test_malformed_selectors(#[case] query: &str) {
    let grid = pages_csv().unwrap();
    assert!(matches!(
        grid.search_rows(query),
        Err(GridError::InvalidSelector(_))
    ));
}

fn quoted_titles() -> LabeledGrid {
    let source = "slug,title\nedit,Editor's pick\nsay,\"Say \"\"hi\"\"\"\nplain,Plain - simple\n";
    LabeledGrid::from_csv_str(source, &Default::default()).unwrap()
}

#[rstest]
#[case::apostrophe(r#"title*=Editor's"#, &["edit"])]
#[case::apostrophe_then_operator(r#"title^=Editor's , slug=plain"#, &["edit", "plain"])]
#[case::escaped_double_quote(r#"title=Say \"hi\""#, &["say"])]
#[case::quoted_apostrophe(r#"title="Editor's pick""#, &["edit"])]
#[case::escaped_quote_inside_quotes(r#"title='Editor\'s pick'"#, &["edit"])]
#[case::unclosed_quote_keeps_dash(r#"title="Plain - simple"#, &["plain"])]
fn test_quotes_in_values(#[case] query: &str, #[case] expected: &[&str]) {
    let grid = quoted_titles();
    assert_eq!(slugs(&grid.search_rows(query).unwrap()), expected);
}

#[test]
fn test_unknown_field() {
    let grid = pages_csv().unwrap();
    assert!(matches!(
        grid.search_rows("author=jane"),
        Err(GridError::LabelNotFound { .. })
    ));
}

#[test]
fn test_empty_query_returns_receiver() {
    let grid = pages_csv().unwrap();
    let found = grid.search_rows("").unwrap();
    assert!(matches!(found, Cow::Borrowed(_)));
    assert_eq!(*found, grid);
}

#[test]
fn test_search_does_not_touch_receiver() {
    let grid = pages_csv().unwrap();
    let before = grid.clone();
    let mut found = grid.search_rows("section=news").unwrap().into_owned();
    found.set_cell(0usize, "title", "Changed").unwrap();
    assert_eq!(grid, before);
}

#[test]
fn test_column_search_by_row_label() {
    let mut grid = pages_csv().unwrap();
    grid.set_label(Axis::Row, 0usize, Some("home")).unwrap();
    let found = grid.search_columns("home=main , //=slug").unwrap();
    let labels: Vec<Option<&str>> = (0..found.columns())
        .map(|c| found.label(Axis::Column, c))
        .collect();
    assert_eq!(labels, vec![Some("slug"), Some("section")]);
    assert_eq!(found.rows(), grid.rows());
}

#[test]
fn test_selector_reused_across_formats() {
    let selector = Selector::compile(r#"slug^="about""#).unwrap();
    let csv = pages_csv().unwrap();
    let json = tabula::testing::pages_json().unwrap();
    let from_csv = selector.evaluate(&csv, Axis::Row).unwrap();
    let from_json = selector.evaluate(&json, Axis::Row).unwrap();
    assert_eq!(slugs(&from_csv), slugs(&from_json));
    assert_eq!(slugs(&from_csv), vec!["about", "about/team", "about/team/jane"]);
}
