//! CLI module for aerosql
//!
//! Provides command-line interface for:
//! - explain: show the access path chosen for a query
//! - run: execute a query against a seeded in-memory store

mod args;
mod commands;
mod data;
mod errors;
mod io;
mod logging;

pub use args::{Cli, Command, QueryArgs};
pub use commands::{explain, run, run_command, run_query};
pub use data::{SeedColumn, SeedData, SeedRecord, SeedSchema};
pub use errors::{CliError, CliResult};
pub use io::{read_file, read_request, write_error, write_line};
pub use logging::LOG_ENV;
