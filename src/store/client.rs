//! Store client traits

use super::errors::{StoreError, StoreResult};
use crate::catalog::SecondaryIndexDescriptor;
use crate::config::{BasePolicy, QueryPolicy, ScanPolicy};
use crate::model::{Key, Record};
use crate::predicate::Filter;

/// Receives records pushed by an asynchronous scan or query.
///
/// `on_record` may be called any number of times, followed by exactly one
/// of `on_success` or `on_failure`. Returning `false` from `on_record`
/// unsubscribes: the store stops delivering and drops the listener
/// without a terminal call.
pub trait RecordListener: Send {
    /// Delivers one record; returns false to stop the producer
    fn on_record(&mut self, record: Record) -> bool;

    /// All records delivered
    fn on_success(self: Box<Self>);

    /// Producer failed
    fn on_failure(self: Box<Self>, error: StoreError);
}

/// Secondary index query statement
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub namespace: String,
    pub set: String,
    /// Bins to return (None = all)
    pub bin_names: Option<Vec<String>>,
    /// Index answering the filter
    pub index_name: String,
    /// Single-bin index filter
    pub filter: Filter,
}

/// Capability surface the engine needs from a store
pub trait StoreClient: Send + Sync {
    /// Reads one record by key; `Ok(None)` if it does not exist
    fn get(
        &self,
        policy: &BasePolicy,
        key: &Key,
        bin_names: Option<&[String]>,
    ) -> StoreResult<Option<Record>>;

    /// Starts a scan of `namespace`.`set`, delivering into `listener`
    fn scan(
        &self,
        policy: &ScanPolicy,
        namespace: &str,
        set: &str,
        bin_names: Option<&[String]>,
        listener: Box<dyn RecordListener>,
    ) -> StoreResult<()>;

    /// Starts a secondary index query, delivering into `listener`
    fn query(
        &self,
        policy: &QueryPolicy,
        statement: &Statement,
        listener: Box<dyn RecordListener>,
    ) -> StoreResult<()>;

    /// Record count from server statistics, without reading records
    fn record_count(&self, namespace: &str, set: &str) -> StoreResult<u64>;

    /// All secondary indexes currently defined
    fn secondary_indexes(&self) -> StoreResult<Vec<SecondaryIndexDescriptor>>;

    /// True if the server supports secondary index queries
    fn supports_secondary_index(&self) -> bool;
}
