//! Command-line interface for tabula
//!
//! Usage:
//!   tabula search `<query>` [`<file>`] [--columns] [--format csv|json]  - Select rows (or columns)
//!   tabula tree [`<file>`] [--format json|yaml]                         - Print the page tree
//!   tabula convert [`<file>`] --to csv|json                             - Re-encode a pages file
//!
//! Global options: --config `<toml>`, -v (repeatable), --quiet
//!
//! Configuration layers, last wins: built-in defaults, `tabula.toml` in the
//! working directory if present, `--config`, then `<file>` as `pages.path`.

use clap::{Arg, ArgAction, ArgMatches, Command};
use tabula::config::{Loader, TabulaConfig};
use tabula::grid::{Axis, LabeledGrid};
use tabula::pages::{read_grid, Site};
use tracing::Level;

const LOCAL_CONFIG: &str = "tabula.toml";

fn main() {
    let matches = Command::new("tabula")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Query tabular page data and inspect the page tree it describes")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("TOML file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Log more (-v info, -vv debug, -vvv trace)"),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .global(true)
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose")
                .help("Only log errors"),
        )
        .subcommand(
            Command::new("search")
                .about("Search rows (or columns) of a CSV or JSON file with a selector")
                .arg(Arg::new("query").help("Selector, e.g. 'slug^=\"blog/\"'").required(true).index(1))
                .arg(file_arg().index(2))
                .arg(
                    Arg::new("columns")
                        .long("columns")
                        .help("Search columns instead of rows")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format")
                        .value_parser(["csv", "json"])
                        .default_value("csv"),
                ),
        )
        .subcommand(
            Command::new("tree")
                .about("Build the page tree of a pages file")
                .arg(file_arg().index(1))
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format")
                        .value_parser(["json", "yaml"])
                        .default_value("json"),
                ),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert a pages file between CSV and JSON")
                .arg(file_arg().index(1))
                .arg(
                    Arg::new("to")
                        .long("to")
                        .short('t')
                        .help("Target format")
                        .value_parser(["csv", "json"])
                        .required(true),
                ),
        )
        .get_matches();

    init_logging(&matches);
    let config = load_config(&matches);

    let output = match matches.subcommand() {
        Some(("search", sub)) => handle_search_command(sub, &config),
        Some(("tree", sub)) => handle_tree_command(sub, &config),
        Some(("convert", sub)) => handle_convert_command(sub, &config),
        _ => unreachable!("a subcommand is required"),
    };

    match output {
        Ok(text) => print!("{}", text),
        Err(message) => {
            eprintln!("Error: {}", message);
            std::process::exit(1);
        }
    }
}

/// Optional data file, standing in for `pages.path`
fn file_arg() -> Arg {
    Arg::new("file").help("Path to a .csv or .json file [default: pages.path from config]")
}

fn init_logging(matches: &ArgMatches) {
    let level = if matches.get_flag("quiet") {
        Level::ERROR
    } else {
        match matches.get_count("verbose") {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(matches: &ArgMatches) -> TabulaConfig {
    let mut loader = Loader::new().with_optional_file(LOCAL_CONFIG);
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    let file = matches
        .subcommand()
        .and_then(|(_, sub)| sub.get_one::<String>("file"));
    let loader = match file {
        Some(file) => loader.set_override("pages.path", file.as_str()),
        None => Ok(loader),
    };
    loader.and_then(Loader::build).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    })
}

fn load_grid(config: &TabulaConfig) -> Result<LabeledGrid, String> {
    read_grid(&config.pages.path, config).map_err(|e| e.to_string())
}

fn encode(grid: &LabeledGrid, format: &str, config: &TabulaConfig) -> Result<String, String> {
    let encoded = match format {
        "csv" => config
            .csv
            .to_options()
            .and_then(|options| grid.to_csv_string(&options)),
        _ => grid
            .to_json_string(&config.json.to_options())
            .map(|json| json + "\n"),
    };
    encoded.map_err(|e| e.to_string())
}

/// Handle the search command
fn handle_search_command(sub: &ArgMatches, config: &TabulaConfig) -> Result<String, String> {
    let grid = load_grid(config)?;
    let query = sub.get_one::<String>("query").map(String::as_str).unwrap_or("");
    let axis = if sub.get_flag("columns") {
        Axis::Column
    } else {
        Axis::Row
    };
    let found = grid.search(axis, query).map_err(|e| e.to_string())?;
    let format = sub.get_one::<String>("format").map(String::as_str).unwrap_or("csv");
    encode(&found, format, config)
}

/// Handle the tree command
fn handle_tree_command(sub: &ArgMatches, config: &TabulaConfig) -> Result<String, String> {
    let grid = load_grid(config)?;
    let site = Site::from_grid(grid, &config.pages).map_err(|e| e.to_string())?;
    match sub.get_one::<String>("format").map(String::as_str) {
        Some("yaml") => serde_yaml::to_string(site.tree()).map_err(|e| e.to_string()),
        _ => serde_json::to_string_pretty(site.tree())
            .map(|json| json + "\n")
            .map_err(|e| e.to_string()),
    }
}

/// Handle the convert command
fn handle_convert_command(sub: &ArgMatches, config: &TabulaConfig) -> Result<String, String> {
    let grid = load_grid(config)?;
    let target = sub.get_one::<String>("to").map(String::as_str).unwrap_or("json");
    encode(&grid, target, config)
}
