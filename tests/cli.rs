use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::io::Write;
use tabula::testing::sample_path;

#[test]
fn search_rows_via_cli() {
    let mut cmd = cargo_bin_cmd!("tabula");
    cmd.arg("search")
        .arg(r#"slug^="blog/""#)
        .arg(sample_path("pages.csv"));

    let output_pred = predicate::str::starts_with("slug,title,order,url,target,section\n")
        .and(predicate::str::contains("blog/post-1,First Post"))
        .and(predicate::str::contains("about").not());

    cmd.assert().success().stdout(output_pred);
}

#[test]
fn search_columns_as_json_via_cli() {
    let mut cmd = cargo_bin_cmd!("tabula");
    cmd.arg("search")
        .arg("//=slug")
        .arg(sample_path("pages.json"))
        .arg("--columns")
        .arg("--format")
        .arg("json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""slug": "contact""#).and(predicate::str::contains("title").not()));
}

#[test]
fn tree_as_yaml_via_cli() {
    let mut cmd = cargo_bin_cmd!("tabula");
    cmd.arg("tree").arg(sample_path("pages.csv")).arg("--format").arg("yaml");

    cmd.assert().success().stdout(
        predicate::str::contains("about--team--jane:")
            .and(predicate::str::contains("permalink: /about/team/jane")),
    );
}

#[test]
fn convert_csv_to_json_via_cli() {
    let mut cmd = cargo_bin_cmd!("tabula");
    cmd.arg("convert").arg(sample_path("pages.csv")).arg("--to").arg("json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""url": "https://docs.example.org""#));
}

#[test]
fn config_file_changes_home_slug() {
    let mut config = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(config, "[pages]\nhome_slug = \"about\"").unwrap();

    let mut cmd = cargo_bin_cmd!("tabula");
    cmd.arg("tree")
        .arg(sample_path("pages.csv"))
        .arg("--config")
        .arg(config.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""permalink": "/home""#));
}

#[test]
fn pages_path_from_local_config() {
    let dir = tempfile::tempdir().unwrap();
    let data = sample_path("pages.json");
    std::fs::write(
        dir.path().join("tabula.toml"),
        format!("[pages]\npath = {:?}\n", data.display().to_string()),
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("tabula");
    cmd.current_dir(dir.path()).arg("search").arg("section=external");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("docs,Documentation,7"));
}

#[test]
fn file_argument_overrides_config_path() {
    let mut config = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(config, "[pages]\npath = \"/nonexistent/pages.csv\"").unwrap();

    let mut cmd = cargo_bin_cmd!("tabula");
    cmd.arg("convert")
        .arg(sample_path("pages.csv"))
        .arg("--to")
        .arg("csv")
        .arg("--config")
        .arg(config.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("slug,title,order,url,target,section\n"));

    let mut cmd = cargo_bin_cmd!("tabula");
    cmd.arg("convert").arg("--to").arg("csv").arg("--config").arg(config.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/pages.csv"));
}

#[test]
fn invalid_selector_fails() {
    let mut cmd = cargo_bin_cmd!("tabula");
    cmd.arg("search").arg("(slug=home").arg(sample_path("pages.csv"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid selector"));
}

#[test]
fn unsupported_file_fails() {
    let mut cmd = cargo_bin_cmd!("tabula");
    cmd.arg("convert").arg("pages.txt").arg("--to").arg("csv");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unsupported file type"));
}
