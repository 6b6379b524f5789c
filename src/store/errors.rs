//! Store-level failures
//!
//! Surfaced as-is; the engine never retries on its own.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures reported by the store client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Operation exceeded its total timeout
    #[error("timeout after {0} ms")]
    Timeout(u32),

    /// Connection-level failure
    #[error("network error: {0}")]
    Network(String),

    /// Server rejected the request
    #[error("server error {code}: {message}")]
    Server { code: i32, message: String },

    /// Query named an index that does not exist
    #[error("index not found: {0}")]
    IndexNotFound(String),

    /// Store does not support the requested operation
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// Producer went away without signalling completion
    #[error("store released the listener without completion")]
    Abandoned,
}

impl StoreError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Timeout(_) => "AERO_SQL_STORE_TIMEOUT",
            StoreError::Network(_) => "AERO_SQL_STORE_NETWORK",
            StoreError::Server { .. } => "AERO_SQL_STORE_SERVER",
            StoreError::IndexNotFound(_) => "AERO_SQL_INDEX_NOT_FOUND",
            StoreError::Unsupported(_) => "AERO_SQL_UNSUPPORTED",
            StoreError::Abandoned => "AERO_SQL_STREAM_ABANDONED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::Server {
            code: 4,
            message: "parameter error".into(),
        };
        assert_eq!(err.to_string(), "server error 4: parameter error");
        assert_eq!(err.code(), "AERO_SQL_STORE_SERVER");
    }
}
