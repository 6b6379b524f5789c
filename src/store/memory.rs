//! In-process store
//!
//! Records live in memory, ordered by (partition, digest) the way a real
//! cluster iterates them. Scans and queries run on a spawned thread and
//! drive the listener exactly like a networked client would: records
//! first, then one terminal callback.
//!
//! Scan throttling (`records_per_second`, `max_concurrent_nodes`) is
//! accepted and recorded in `last_scan_policy` but not enforced.
//!
//! Failures can be injected so consumers of the engine can exercise error
//! paths without a cluster.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::RwLock;
use tracing::debug;

use super::client::{RecordListener, Statement, StoreClient};
use super::errors::{StoreError, StoreResult};
use crate::catalog::SecondaryIndexDescriptor;
use crate::config::{BasePolicy, QueryPolicy, ScanPolicy};
use crate::model::{Key, PartitionRange, Record};
use crate::predicate::{Exp, Filter};
use crate::value::Value;

#[derive(Debug, Clone)]
struct StoredRecord {
    key: Key,
    /// User key kept alongside the record
    key_stored: bool,
    bins: BTreeMap<String, Value>,
    generation: u32,
}

impl StoredRecord {
    fn to_record(&self, include_bins: bool, bin_names: Option<&[String]>) -> Record {
        let bins = if !include_bins {
            BTreeMap::new()
        } else {
            match bin_names {
                Some(names) => self
                    .bins
                    .iter()
                    .filter(|(name, _)| names.contains(name))
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
                None => self.bins.clone(),
            }
        };
        Record::new(self.key_stored.then(|| self.key.clone()), bins, self.generation)
    }

    /// Full record view used for filter evaluation
    fn view(&self) -> Record {
        self.to_record(true, None)
    }
}

/// Failure injected into the next asynchronous operation
#[derive(Debug, Clone)]
struct InjectedFailure {
    /// Records delivered before failing
    after: usize,
    error: StoreError,
}

#[derive(Debug, Default)]
struct Inner {
    /// (namespace, set) -> (partition, digest) -> record
    sets: BTreeMap<(String, String), BTreeMap<(u16, [u8; 20]), StoredRecord>>,
    indexes: Vec<SecondaryIndexDescriptor>,
    sindex_unsupported: bool,
    get_failure: Option<StoreError>,
    async_failure: Option<InjectedFailure>,
    last_scan: Option<ScanPolicy>,
    last_query: Option<(QueryPolicy, Statement)>,
}

/// Thread-safe in-memory store; clones share state
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
    /// Records handed out by get, scan and query
    fetched: Arc<AtomicU64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that reports no secondary index support
    pub fn without_secondary_index_support() -> Self {
        let store = Self::default();
        store.inner.write().sindex_unsupported = true;
        store
    }

    /// Writes a record, keeping its user key
    pub fn put(&self, key: Key, bins: BTreeMap<String, Value>) {
        self.insert(key, bins, true);
    }

    /// Writes a record without keeping its user key
    pub fn put_without_key(&self, key: Key, bins: BTreeMap<String, Value>) {
        self.insert(key, bins, false);
    }

    fn insert(&self, key: Key, bins: BTreeMap<String, Value>, key_stored: bool) {
        let mut inner = self.inner.write();
        let set = inner
            .sets
            .entry((key.namespace.clone(), key.set.clone()))
            .or_default();
        let slot = (key.partition_id(), key.digest);
        let generation = set.get(&slot).map_or(1, |r| r.generation + 1);
        set.insert(
            slot,
            StoredRecord {
                key,
                key_stored,
                bins,
                generation,
            },
        );
    }

    /// Registers a secondary index
    pub fn create_index(&self, descriptor: SecondaryIndexDescriptor) {
        let mut inner = self.inner.write();
        inner.indexes.retain(|d| d.name != descriptor.name);
        inner.indexes.push(descriptor);
    }

    /// Drops a secondary index by name
    pub fn drop_index(&self, name: &str) {
        self.inner.write().indexes.retain(|d| d.name != name);
    }

    /// Makes the next `get` fail
    pub fn fail_next_get(&self, error: StoreError) {
        self.inner.write().get_failure = Some(error);
    }

    /// Makes the next scan or query fail after delivering `after` records
    pub fn fail_next_async(&self, after: usize, error: StoreError) {
        self.inner.write().async_failure = Some(InjectedFailure { after, error });
    }

    /// Records handed out so far
    pub fn records_fetched(&self) -> u64 {
        self.fetched.load(Ordering::SeqCst)
    }

    /// Policy of the most recent scan
    pub fn last_scan_policy(&self) -> Option<ScanPolicy> {
        self.inner.read().last_scan.clone()
    }

    /// Policy and statement of the most recent index query
    pub fn last_query(&self) -> Option<(QueryPolicy, Statement)> {
        self.inner.read().last_query.clone()
    }

    /// Collects matching records under the read lock
    #[allow(clippy::too_many_arguments)]
    fn select(
        &self,
        namespace: &str,
        set: &str,
        partitions: Option<PartitionRange>,
        index_filter: Option<&Filter>,
        expression: Option<&Exp>,
        max_records: u64,
        include_bins: bool,
        bin_names: Option<&[String]>,
    ) -> Vec<Record> {
        let inner = self.inner.read();
        let Some(records) = inner.sets.get(&(namespace.to_string(), set.to_string())) else {
            return Vec::new();
        };

        let mut selected = Vec::new();
        for ((partition, _), stored) in records {
            if max_records > 0 && selected.len() as u64 >= max_records {
                break;
            }
            if partitions.is_some_and(|range| !range.contains(*partition)) {
                continue;
            }
            if index_filter.is_some() || expression.is_some() {
                let view = stored.view();
                if index_filter.is_some_and(|f| !f.matches(&view)) {
                    continue;
                }
                if expression.is_some_and(|e| !e.matches(&view)) {
                    continue;
                }
            }
            selected.push(stored.to_record(include_bins, bin_names));
        }
        selected
    }

    /// Delivers records on a worker thread, honouring injected failures
    fn deliver(&self, records: Vec<Record>, mut listener: Box<dyn RecordListener>) {
        let failure = self.inner.write().async_failure.take();
        let fetched = Arc::clone(&self.fetched);

        thread::spawn(move || {
            for (delivered, record) in records.into_iter().enumerate() {
                if let Some(f) = failure.as_ref().filter(|f| f.after == delivered) {
                    listener.on_failure(f.error.clone());
                    return;
                }
                fetched.fetch_add(1, Ordering::SeqCst);
                if !listener.on_record(record) {
                    debug!(delivered, "listener unsubscribed");
                    return;
                }
            }
            match failure {
                Some(f) => listener.on_failure(f.error),
                None => listener.on_success(),
            }
        });
    }
}

impl StoreClient for MemoryStore {
    fn get(
        &self,
        _policy: &BasePolicy,
        key: &Key,
        bin_names: Option<&[String]>,
    ) -> StoreResult<Option<Record>> {
        if let Some(error) = self.inner.write().get_failure.take() {
            return Err(error);
        }
        let inner = self.inner.read();
        let record = inner
            .sets
            .get(&(key.namespace.clone(), key.set.clone()))
            .and_then(|set| set.get(&(key.partition_id(), key.digest)))
            .map(|stored| stored.to_record(true, bin_names));
        if record.is_some() {
            self.fetched.fetch_add(1, Ordering::SeqCst);
        }
        Ok(record)
    }

    fn scan(
        &self,
        policy: &ScanPolicy,
        namespace: &str,
        set: &str,
        bin_names: Option<&[String]>,
        listener: Box<dyn RecordListener>,
    ) -> StoreResult<()> {
        self.inner.write().last_scan = Some(policy.clone());
        let records = self.select(
            namespace,
            set,
            policy.partitions,
            None,
            policy.base.filter_expression.as_ref(),
            policy.max_records,
            policy.include_bin_data,
            bin_names,
        );
        self.deliver(records, listener);
        Ok(())
    }

    fn query(
        &self,
        policy: &QueryPolicy,
        statement: &Statement,
        listener: Box<dyn RecordListener>,
    ) -> StoreResult<()> {
        {
            let mut inner = self.inner.write();
            if inner.sindex_unsupported {
                return Err(StoreError::Unsupported("secondary index query".into()));
            }
            inner.last_query = Some((policy.clone(), statement.clone()));
        }

        let index_exists = self.inner.read().indexes.iter().any(|d| {
            d.name == statement.index_name
                && d.bin == statement.filter.bin()
                && d.covers(&statement.namespace, &statement.set)
        });
        if !index_exists {
            listener.on_failure(StoreError::IndexNotFound(statement.index_name.clone()));
            return Ok(());
        }

        let records = self.select(
            &statement.namespace,
            &statement.set,
            None,
            Some(&statement.filter),
            policy.base.filter_expression.as_ref(),
            policy.max_records,
            policy.include_bin_data,
            statement.bin_names.as_deref(),
        );
        self.deliver(records, listener);
        Ok(())
    }

    fn record_count(&self, namespace: &str, set: &str) -> StoreResult<u64> {
        Ok(self
            .inner
            .read()
            .sets
            .get(&(namespace.to_string(), set.to_string()))
            .map_or(0, |records| records.len() as u64))
    }

    fn secondary_indexes(&self) -> StoreResult<Vec<SecondaryIndexDescriptor>> {
        Ok(self.inner.read().indexes.clone())
    }

    fn supports_secondary_index(&self) -> bool {
        !self.inner.read().sindex_unsupported
    }
}
