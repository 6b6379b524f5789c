//! Planner error types
//!
//! Error codes:
//! - AERO_SQL_INVALID_OPERAND (REJECT)
//! - AERO_SQL_INVALID_QUERY (REJECT)
//! - AERO_SQL_CATALOG_UNAVAILABLE (ERROR)

use std::fmt;

use thiserror::Error;

use crate::model::ModelError;
use crate::store::StoreError;

/// Severity levels for planner errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Query rejected before any store I/O
    Reject,
    /// Store failed while planning
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Failures raised while choosing an access path
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlannerError {
    /// Operand cannot be used as a store key
    #[error("[REJECT] AERO_SQL_INVALID_OPERAND: {0}")]
    InvalidOperand(String),

    /// Query shape the engine cannot execute
    #[error("[REJECT] AERO_SQL_INVALID_QUERY: {0}")]
    InvalidQuery(String),

    /// Index catalog could not be read
    #[error("[ERROR] AERO_SQL_CATALOG_UNAVAILABLE: {0}")]
    Catalog(#[from] StoreError),
}

impl From<ModelError> for PlannerError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::UnsupportedKey { .. } => PlannerError::InvalidOperand(err.to_string()),
            ModelError::OffsetOutOfRange { .. } => PlannerError::InvalidQuery(err.to_string()),
        }
    }
}

impl PlannerError {
    /// Create an invalid operand error
    pub fn invalid_operand(reason: impl Into<String>) -> Self {
        PlannerError::InvalidOperand(reason.into())
    }

    /// Create an invalid query error
    pub fn invalid_query(reason: impl Into<String>) -> Self {
        PlannerError::InvalidQuery(reason.into())
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            PlannerError::InvalidOperand(_) => "AERO_SQL_INVALID_OPERAND",
            PlannerError::InvalidQuery(_) => "AERO_SQL_INVALID_QUERY",
            PlannerError::Catalog(_) => "AERO_SQL_CATALOG_UNAVAILABLE",
        }
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        match self {
            PlannerError::Catalog(_) => Severity::Error,
            _ => Severity::Reject,
        }
    }
}

/// Result type for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;
