//! Command-line interface for tinct
//! This binary tokenizes a source file with grammars loaded from YAML/JSON files and prints the result.
//!
//! Usage:
//!   tinct `<path>` --grammar `<file>`... [--language `<id>`] [--format `<format>`] [--config `<toml>`]
//!   tinct --grammar `<file>`... --list-languages   - List the languages the grammar files define
//!   tinct --list-formats                           - List all available output formats

mod render;

use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use tinct_config::{Loader, TinctConfig};
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = Command::new("tinct")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Tokenize source files with declarative grammars")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the source file")
                .required_unless_present_any(["list-formats", "list-languages"])
                .index(1),
        )
        .arg(
            Arg::new("grammar")
                .long("grammar")
                .short('g')
                .help("Grammar file (.yaml, .yml or .json); repeat to load several, in order")
                .action(ArgAction::Append)
                .value_parser(clap::value_parser!(PathBuf))
                .required_unless_present("list-formats"),
        )
        .arg(
            Arg::new("language")
                .long("language")
                .short('l')
                .help("Language id or alias to tokenize with (default: the last grammar loaded)"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format: html, json, tree or text (default: output.format from config)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the built-in defaults")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available output formats")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-languages")
                .long("list-languages")
                .help("List the languages defined by the grammar files")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let config = load_config(&matches).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });
    init_logging(&config.logging.level);

    let grammars: Vec<PathBuf> = matches
        .get_many::<PathBuf>("grammar")
        .map(|paths| paths.cloned().collect())
        .unwrap_or_default();
    let session = render::build_session(&config, &grammars).unwrap_or_else(|e| {
        eprintln!("Grammar error: {}", e);
        std::process::exit(1);
    });

    if matches.get_flag("list-formats") {
        println!("Available formats:\n");
        for line in session.format_listing() {
            println!("  {}", line);
        }
        return;
    }

    if matches.get_flag("list-languages") {
        for line in session.language_listing() {
            println!("{}", line);
        }
        return;
    }

    let Some(path) = matches.get_one::<String>("path") else {
        eprintln!("Error: no source file given");
        std::process::exit(1);
    };
    let source = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", path, e);
        std::process::exit(1);
    });

    let language = matches.get_one::<String>("language").map(String::as_str);
    let output = session
        .render(&source, language, &config.output.format)
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });

    print!("{}", output);
}

/// Defaults, then the `--config` file, then flags
fn load_config(matches: &ArgMatches) -> Result<TinctConfig, String> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<PathBuf>("config") {
        loader = loader.with_file(path);
    }
    if let Some(format) = matches.get_one::<String>("format") {
        loader = loader
            .set_override("output.format", format.as_str())
            .map_err(|e| e.to_string())?;
    }
    loader.build().map_err(|e| e.to_string())
}

/// Log to stderr; `RUST_LOG` wins over the configured level
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
