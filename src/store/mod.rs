//! Store client surface
//!
//! The query engine talks to the key-value store only through
//! `StoreClient`. Point lookups and metadata counts are synchronous;
//! scans and index queries register a `RecordListener` and return, the
//! store then drives the listener from its own threads.
//!
//! `MemoryStore` is an in-process implementation of the same surface.

mod client;
mod errors;
mod memory;

pub use client::{RecordListener, Statement, StoreClient};
pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;
