//! Result projection
//!
//! Wraps a record stream and the projected column list as a forward-only
//! cursor: `next()` until false, then field access by position or label.

mod columns;
mod cursor;

pub use columns::filter_columns;
pub use cursor::{ExecutionResult, RecordCursor, UNKNOWN_ROW_COUNT};
