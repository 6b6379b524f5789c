//! CLI command implementations
//!
//! Each command builds a connection from `--url`/`--property`, seeds an
//! in-memory store from `--data`, reads one query and writes JSON lines.

use std::collections::BTreeMap;
use std::io::{self, Read, Write};
use std::sync::Arc;

use serde_json::Value as JsonValue;
use tracing::info;

use crate::config::{ConnectionConfig, ConnectionContext};
use crate::executor::QueryEngine;
use crate::model::Query;

use super::args::{Cli, Command, QueryArgs};
use super::data::SeedData;
use super::errors::CliResult;
use super::io::{read_file, read_request, write_error, write_line};
use super::logging;

/// Namespace used when neither the URL nor a record names one
const DEFAULT_NAMESPACE: &str = "test";

/// Main CLI entry point
pub fn run() -> CliResult<()> {
    logging::init();
    let cli = Cli::parse_args();

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_command(cli.command, &mut stdin.lock(), &mut stdout.lock())
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command, input: &mut dyn Read, out: &mut dyn Write) -> CliResult<()> {
    match cmd {
        Command::Explain(args) => explain(&args, input, out),
        Command::Run(args) => run_query(&args, input, out).map(|_| ()),
    }
}

/// Writes the explain plan of one query
pub fn explain(args: &QueryArgs, input: &mut dyn Read, out: &mut dyn Write) -> CliResult<()> {
    let engine = open(args)?;
    let query = load_query(args, input)?;

    let plan = engine.explain(&query);
    write_line(out, &serde_json::to_value(&plan)?)?;
    out.flush()?;
    Ok(())
}

/// Executes one query, writing a JSON object per row.
///
/// Returns the number of rows written. A failure after some rows were
/// written is reported as a trailing error line and returned.
pub fn run_query(args: &QueryArgs, input: &mut dyn Read, out: &mut dyn Write) -> CliResult<usize> {
    let engine = open(args)?;
    let query = load_query(args, input)?;

    let mut result = engine.execute(&query)?;
    let mut rows = 0;
    loop {
        match result.cursor.next() {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => {
                write_error(out, err.code(), &err.to_string())?;
                return Err(err.into());
            }
        }

        let mut row = serde_json::Map::new();
        for (position, column) in result.cursor.columns().iter().enumerate() {
            let value = result.cursor.get(position)?.clone();
            row.insert(column.label.clone(), JsonValue::from(value));
        }
        write_line(out, &JsonValue::Object(row))?;
        rows += 1;
    }
    result.cursor.close();
    out.flush()?;

    info!(rows, "query complete");
    Ok(rows)
}

/// Parses the connection and seeds the store
fn open(args: &QueryArgs) -> CliResult<QueryEngine> {
    let properties: BTreeMap<String, String> = args.properties.iter().cloned().collect();
    let config = ConnectionConfig::parse(&args.url, &properties)?;
    let namespace = config
        .namespace
        .clone()
        .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

    let seed: SeedData = read_file(&args.data)?;
    let (store, schema) = seed.load(&namespace)?;

    let context = ConnectionContext::new(config, Arc::new(store));
    Ok(QueryEngine::new(context, Arc::new(schema)))
}

fn load_query(args: &QueryArgs, input: &mut dyn Read) -> CliResult<Query> {
    match &args.query {
        Some(path) => read_file(path),
        None => read_request(input),
    }
}
