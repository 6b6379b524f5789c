//! Primary key lookups

use crate::config::BasePolicy;
use crate::model::Key;
use crate::store::StoreClient;
use crate::stream::RecordStream;

use super::errors::ExecutorResult;

/// Fetches one record synchronously by key
pub struct PointLookupExecutor<'a, S: StoreClient + ?Sized> {
    store: &'a S,
}

impl<'a, S: StoreClient + ?Sized> PointLookupExecutor<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Returns a terminated stream holding the record, or nothing if absent.
    ///
    /// Store failures propagate directly; an absent key is not a failure.
    pub fn execute(
        &self,
        policy: &BasePolicy,
        key: &Key,
        bin_names: Option<&[String]>,
    ) -> ExecutorResult<RecordStream> {
        let record = self.store.get(policy, key, bin_names)?;

        let (sink, stream) = RecordStream::bounded(1);
        if let Some(mut record) = record {
            // the caller's key is authoritative even when the store kept none
            record.key.get_or_insert_with(|| key.clone());
            sink.push(record);
        }
        sink.complete();
        Ok(stream)
    }
}
