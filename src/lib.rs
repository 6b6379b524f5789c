//! aerosql - query execution over a key-value store
//!
//! Given a parsed query, decides how to fetch matching records (primary
//! key lookup, secondary index query, scan or metadata count), translates
//! predicates into the store's filter forms and streams the records back
//! through a forward-only cursor.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod executor;
pub mod model;
pub mod planner;
pub mod predicate;
pub mod projector;
pub mod store;
pub mod stream;
pub mod value;
