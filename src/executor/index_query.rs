//! Secondary index queries

use crate::catalog::SecondaryIndexDescriptor;
use crate::config::QueryPolicy;
use crate::predicate::Filter;
use crate::store::{Statement, StoreClient};
use crate::stream::{RecordStream, StreamCapacity};

use super::errors::ExecutorResult;
use super::listener::StreamListener;

/// Starts an asynchronous index query feeding a record stream.
///
/// The index narrows candidates with `filter`; the residual expression on
/// the policy keeps only records matching the whole predicate.
pub struct IndexQueryExecutor<'a, S: StoreClient + ?Sized> {
    store: &'a S,
}

impl<'a, S: StoreClient + ?Sized> IndexQueryExecutor<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn execute(
        &self,
        policy: &QueryPolicy,
        set: &str,
        index: &SecondaryIndexDescriptor,
        filter: &Filter,
        bin_names: Option<&[String]>,
        capacity: StreamCapacity,
    ) -> ExecutorResult<RecordStream> {
        let statement = Statement {
            namespace: index.namespace.clone(),
            set: set.to_string(),
            bin_names: bin_names.map(<[String]>::to_vec),
            index_name: index.name.clone(),
            filter: filter.clone(),
        };

        let (sink, stream) = RecordStream::channel(capacity);
        self.store
            .query(policy, &statement, Box::new(StreamListener::new(sink)))?;
        Ok(stream)
    }
}
