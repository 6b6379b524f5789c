//! Executor error types
//!
//! Error codes:
//! - planner and store codes, passed through unchanged
//! - AERO_SQL_COLUMN_OUT_OF_RANGE
//! - AERO_SQL_UNKNOWN_COLUMN
//! - AERO_SQL_NO_CURRENT_ROW
//! - AERO_SQL_CURSOR_CLOSED

use thiserror::Error;

use crate::planner::PlannerError;
use crate::store::StoreError;

/// Failures while executing a query or reading its cursor
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecutorError {
    /// Query rejected before store I/O
    #[error(transparent)]
    Planner(#[from] PlannerError),

    /// Store failed, synchronously or mid-stream
    #[error("[ERROR] {}: {0}", .0.code())]
    Store(#[from] StoreError),

    /// Column position outside the projected column list
    #[error("[ERROR] AERO_SQL_COLUMN_OUT_OF_RANGE: column {index} out of range (0..{count})")]
    ColumnOutOfRange { index: usize, count: usize },

    /// No projected column carries this label
    #[error("[ERROR] AERO_SQL_UNKNOWN_COLUMN: {0}")]
    UnknownColumn(String),

    /// Field read before `next()` or after the end
    #[error("[ERROR] AERO_SQL_NO_CURRENT_ROW: cursor is not positioned on a row")]
    NoCurrentRow,

    /// Cursor used after `close()`
    #[error("[ERROR] AERO_SQL_CURSOR_CLOSED: cursor is closed")]
    Closed,
}

impl ExecutorError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ExecutorError::Planner(e) => e.code(),
            ExecutorError::Store(e) => e.code(),
            ExecutorError::ColumnOutOfRange { .. } => "AERO_SQL_COLUMN_OUT_OF_RANGE",
            ExecutorError::UnknownColumn(_) => "AERO_SQL_UNKNOWN_COLUMN",
            ExecutorError::NoCurrentRow => "AERO_SQL_NO_CURRENT_ROW",
            ExecutorError::Closed => "AERO_SQL_CURSOR_CLOSED",
        }
    }
}

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;
