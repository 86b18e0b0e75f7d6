//! Refine CLI - Merge search parameter snapshots from the command line

use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result};
use refine_core::SearchParameters;
use refine_merge::{merge, PIPELINE};
use serde_json::Value;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Output settings for the CLI
#[derive(Debug, Clone, Default, PartialEq)]
struct CliConfig {
    /// Pretty-print the merged snapshot
    pretty: bool,
}

impl CliConfig {
    const PRETTY_ENV: &'static str = "REFINE_PRETTY";

    fn from_env() -> Self {
        let pretty = std::env::var(Self::PRETTY_ENV)
            .map(|value| matches!(value.trim(), "1" | "true"))
            .unwrap_or(false);
        Self { pretty }
    }
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays JSON
    let filter = EnvFilter::from_default_env().add_directive("refine=info".parse()?);
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_help();
        return Ok(());
    }

    let command = &args[1];

    match command.as_str() {
        "help" | "--help" | "-h" => print_help(),
        "pipeline" => print!("{}", describe_pipeline()),
        "merge" => {
            let output = run_merge(&args[2..], CliConfig::from_env())?;
            println!("{}", output);
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_help();
        }
    }

    Ok(())
}

fn print_help() {
    println!(
        r#"Refine CLI - Search parameter merging

USAGE:
    refine-cli <COMMAND> [OPTIONS]

COMMANDS:
    help            Show this help message
    merge           Merge snapshots from JSON files (use - for stdin)
    pipeline        Show the order and policy of each merge step

OPTIONS (merge):
    --pretty        Pretty-print the result (or set REFINE_PRETTY=1)

EXAMPLES:
    refine-cli merge defaults.json widgets.json url-state.json
    cat snapshots.json | refine-cli merge --pretty -
    refine-cli pipeline
"#
    );
}

fn describe_pipeline() -> String {
    PIPELINE
        .iter()
        .enumerate()
        .map(|(index, step)| {
            let field = step.field.map_or("(query parameters)", |f| f.as_str());
            format!("{:>2}. {:<32} {}\n", index + 1, field, step.policy)
        })
        .collect()
}

/// Merge every snapshot named by `args` and render the result
fn run_merge(args: &[String], mut config: CliConfig) -> Result<String> {
    let mut sources = Vec::new();
    for arg in args {
        match arg.as_str() {
            "--pretty" => config.pretty = true,
            option if option.starts_with("--") => warn!("Ignoring unknown option: {}", option),
            source => sources.push(source),
        }
    }

    let mut snapshots = Vec::new();
    for source in sources {
        let loaded = load_snapshots(source)?;
        debug!("Loaded {} snapshots from {}", loaded.len(), source);
        snapshots.extend(loaded);
    }

    let merged = merge(&snapshots)?;
    info!("Merged {} snapshots", snapshots.len());

    let json = merged.to_json()?;
    let output = if config.pretty {
        serde_json::to_string_pretty(&json)?
    } else {
        serde_json::to_string(&json)?
    };
    Ok(output)
}

fn load_snapshots(source: &str) -> Result<Vec<SearchParameters>> {
    let text = if source == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read snapshots from stdin")?;
        text
    } else {
        fs::read_to_string(source).with_context(|| format!("Failed to read {}", source))?
    };

    parse_snapshots(&text).with_context(|| format!("Invalid snapshot in {}", source))
}

/// A document holds one snapshot object or an array of them
fn parse_snapshots(text: &str) -> Result<Vec<SearchParameters>> {
    let values = match serde_json::from_str::<Value>(text)? {
        Value::Array(items) => items,
        other => vec![other],
    };

    values
        .into_iter()
        .map(|value| Ok(SearchParameters::from_value(value)?))
        .collect()
}
