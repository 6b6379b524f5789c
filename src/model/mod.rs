//! Query, record and column model shared by the planner, executors and cursor

mod column;
mod errors;
mod key;
mod partition;
mod query;
mod record;

pub use column::{ColumnType, DataColumn};
pub use errors::{ModelError, ModelResult};
pub use key::{Key, PARTITIONS, PRIMARY_KEY_FIELD};
pub use partition::PartitionRange;
pub use query::Query;
pub use record::Record;
