//! CLI-specific error types
//!
//! Every CLI error is fatal: printed to stderr, non-zero exit.

use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::executor::ExecutorError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    /// stdin/stdout or file access failed
    #[error("AERO_SQL_CLI_IO: {0}")]
    Io(String),

    /// Seed data or query JSON is malformed
    #[error("AERO_SQL_CLI_INPUT: {0}")]
    Input(String),

    #[error("{}: {0}", .0.code())]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

impl CliError {
    /// Input error
    pub fn input(msg: impl Into<String>) -> Self {
        CliError::Input(msg.into())
    }

    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Io(_) => "AERO_SQL_CLI_IO",
            CliError::Input(_) => "AERO_SQL_CLI_INPUT",
            CliError::Config(e) => e.code(),
            CliError::Executor(e) => e.code(),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Input(format!("JSON error: {}", e))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
