//! Query executor subsystem
//!
//! One executor per access path. Each builds nothing itself: it receives
//! its policy from `PolicyBuilder`, invokes the store and returns the
//! record stream the store fills.
//!
//! # Invariants
//!
//! - Every stream handed out is eventually terminated, even when zero
//!   records match or the store drops its listener
//! - Closing the consumer unsubscribes the producer on its next delivery
//! - Store failures are surfaced, never retried here

mod count;
mod engine;
mod errors;
mod index_query;
mod listener;
mod point_lookup;
mod policy;
mod scan;
mod schema;

pub use count::CountExecutor;
pub use engine::QueryEngine;
pub use errors::{ExecutorError, ExecutorResult};
pub use index_query::IndexQueryExecutor;
pub use listener::StreamListener;
pub use point_lookup::PointLookupExecutor;
pub use policy::PolicyBuilder;
pub use scan::ScanExecutor;
pub use schema::{SchemaProvider, StaticSchema};
