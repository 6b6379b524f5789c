//! Predicates and their translation into store-native filters
//!
//! A predicate always translates into a boolean expression (`Exp`) that the
//! store evaluates per record. Some predicates additionally translate into a
//! single-bin index filter (`Filter`) that lets the store narrow the
//! candidate set through a secondary index.
//!
//! # Translation rules
//!
//! - `to_filter_expression` is total
//! - `to_filter(bin)` is partial; `None` means "use a scan", never an error
//! - `is_indexable` holds iff some referenced bin yields a filter

mod expression;
mod filter;
mod predicate;

pub use expression::{CmpOp, Exp};
pub use filter::Filter;
pub use predicate::{Predicate, RangeLimit};
