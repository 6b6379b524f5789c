//! `count(...)` execution
//!
//! Both paths produce a single-row stream `{label: n}`. The metadata path
//! reads store statistics only; the predicate path drains a scan that
//! carries no bin data.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::ScanPolicy;
use crate::model::Record;
use crate::store::StoreClient;
use crate::stream::{RecordStream, StreamCapacity};
use crate::value::Value;

use super::errors::ExecutorResult;
use super::scan::ScanExecutor;

/// Counts records without returning them
pub struct CountExecutor<'a, S: StoreClient + ?Sized> {
    store: &'a S,
}

impl<'a, S: StoreClient + ?Sized> CountExecutor<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Count from store statistics
    pub fn metadata(&self, namespace: &str, set: &str, label: &str) -> ExecutorResult<RecordStream> {
        let count = self.store.record_count(namespace, set)?;
        debug!(count, "metadata record count");
        Ok(single_row(label, count))
    }

    /// Count by draining a scan whose policy already filters records
    pub fn scan(
        &self,
        policy: &ScanPolicy,
        namespace: &str,
        set: &str,
        label: &str,
    ) -> ExecutorResult<RecordStream> {
        let stream = ScanExecutor::new(self.store).execute(
            policy,
            namespace,
            set,
            None,
            StreamCapacity::Unbounded,
        )?;

        let mut count = 0u64;
        for record in stream {
            record?;
            count += 1;
        }
        debug!(count, "scanned record count");
        Ok(single_row(label, count))
    }
}

fn single_row(label: &str, count: u64) -> RecordStream {
    let mut bins = BTreeMap::new();
    // counts past i64::MAX saturate
    let count = i64::try_from(count).unwrap_or(i64::MAX);
    bins.insert(label.to_string(), Value::Int(count));

    let (sink, stream) = RecordStream::bounded(1);
    sink.push(Record::new(None, bins, 1));
    sink.complete();
    stream
}
