//! Record streams
//!
//! A bounded or growable FIFO between store-driven producers and the single
//! cursor that drains it.
//!
//! # Invariants
//!
//! - Records reach the consumer in push order
//! - Exactly one terminal signal takes effect (end or failure); later ones are ignored
//! - Records buffered before a failure are delivered before the failure
//! - Terminal signals never wait for capacity
//! - Once the consumer closes, pushes return false so producers can unsubscribe

mod record_stream;

pub use record_stream::{RecordSink, RecordStream, StreamCapacity};
