//! `magic-get`: look up a dot path or glob pattern in a JSON document.
//!
//! Usage:
//!   magic-get [--default <json>] [--indent N] '<path>'
//!   magic-get --glob [--indent N] '<pattern>'
//!
//! The document is read from stdin. Set `RUST_LOG=magic_map=debug` to see
//! traversal diagnostics on stderr.

use std::io::{self, Read, Write};

use clap::Parser;
use magic_map::{from_json, MagicMap, MagicMapError, Node, SerializeOptions};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "magic-get",
    about = "Read a value from a JSON document on stdin by dot path or glob pattern",
    version
)]
struct Cli {
    /// Dot path (e.g. user.profile.name) or, with --glob, a pattern (e.g. user.*.name)
    path: String,
    /// Treat the path as a glob pattern and print all matches as an array
    #[arg(long, default_value_t = false)]
    glob: bool,
    /// JSON value printed when the path does not resolve
    #[arg(long, conflicts_with = "glob")]
    default: Option<String>,
    /// Spaces of indentation for the output
    #[arg(long)]
    indent: Option<usize>,
}

fn run(cli: &Cli, input: &str) -> Result<String, MagicMapError> {
    let map = MagicMap::from_json(input)?;
    let opts = SerializeOptions {
        indent: cli.indent,
        replacer: None,
    };

    if cli.glob {
        let matches = map.get_with_glob(&cli.path)?;
        let found = Node::Sequence(matches.into_iter().cloned().collect());
        return magic_map::to_json(&found, &opts);
    }

    let node = match &cli.default {
        Some(text) => {
            let fallback = from_json(text)?;
            map.get_or(&cli.path, &fallback).clone()
        }
        None => map.get(&cli.path)?.clone(),
    };
    magic_map::to_json(&node, &opts)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match run(&cli, buf.trim()) {
        Ok(result) => {
            let mut stdout = io::stdout().lock();
            if let Err(e) = writeln!(stdout, "{result}") {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
