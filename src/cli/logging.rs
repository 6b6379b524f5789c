//! Structured logging for the binary
//!
//! One JSON object per event on stderr, filtered by `AEROSQL_LOG`
//! (`warn` when unset). stdout stays reserved for command output.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the filter directives
pub const LOG_ENV: &str = "AEROSQL_LOG";

/// Installs the global subscriber; later calls are no-ops
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_current_span(true)
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .try_init();
}
