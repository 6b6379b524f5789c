//! Model errors, raised while building keys and partition ranges

use thiserror::Error;

/// Result type for model construction
pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// User key of a type the store cannot address
    #[error("primary key of type {type_name} is not supported: {value}")]
    UnsupportedKey { type_name: &'static str, value: String },

    /// Scan offset past the last partition
    #[error("offset {offset} exceeds partition count {partitions}")]
    OffsetOutOfRange { offset: u64, partitions: u16 },
}
