//! CLI argument definitions using clap
//!
//! Commands:
//! - aerosql explain --data <path> [--url <url>] [--query <path>]
//! - aerosql run --data <path> [--url <url>] [--query <path>]
//!
//! Without `--query` the query JSON is read from stdin.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// aerosql - query execution over a key-value store
#[derive(Parser, Debug)]
#[command(name = "aerosql")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the access path chosen for a query
    Explain(QueryArgs),

    /// Execute a query and print its rows as JSON lines
    Run(QueryArgs),
}

/// Connection and input options shared by every command
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Connection URL
    #[arg(long, default_value = "jdbc:aerospike:localhost:3000/test")]
    pub url: String,

    /// Connection property, repeatable (`key=value`)
    #[arg(long = "property", short = 'p', value_parser = parse_property)]
    pub properties: Vec<(String, String)>,

    /// JSON file seeding the in-memory store
    #[arg(long)]
    pub data: PathBuf,

    /// JSON file holding the query (stdin when omitted)
    #[arg(long)]
    pub query: Option<PathBuf>,
}

fn parse_property(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_command() {
        let cli = Cli::try_parse_from([
            "aerosql",
            "run",
            "--data",
            "seed.json",
            "-p",
            "sendKey=true",
            "--property",
            "recordsPerSecond=10",
        ])
        .unwrap();
        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.url, "jdbc:aerospike:localhost:3000/test");
                assert_eq!(args.properties.len(), 2);
                assert_eq!(args.properties[0], ("sendKey".into(), "true".into()));
                assert!(args.query.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_property_requires_equals() {
        assert!(parse_property("sendKey").is_err());
        assert!(parse_property("=x").is_err());
        assert_eq!(parse_property("a=b=c").unwrap(), ("a".into(), "b=c".into()));
    }
}
