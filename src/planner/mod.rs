//! Query planner subsystem
//!
//! Decides how the records of one query are fetched: metadata count,
//! count scan, primary key lookup, secondary index query or scan.
//!
//! # Design Principles
//!
//! - Deterministic: same query and catalog produce the same path
//! - Fresh: the index catalog is re-read for every query
//! - Forgiving: a missing index falls back to a scan, never an error
//!
//! Ties between usable indexes are broken by bin name.

mod access_path;
mod errors;
mod explain;
mod planner;

pub use access_path::{AccessKind, AccessPath};
pub use errors::{PlannerError, PlannerResult, Severity};
pub use explain::ExplainPlan;
pub use planner::{choose_index, QueryPlanner};
