//! Secondary index catalog
//!
//! A snapshot of the store's secondary indexes, taken once per query so
//! that indexes created or dropped concurrently are always reflected.
//! Nothing is cached across queries.

mod catalog;
mod descriptor;

pub use catalog::IndexCatalog;
pub use descriptor::{IndexType, SecondaryIndexDescriptor};
