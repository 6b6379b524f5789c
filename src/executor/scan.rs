//! Full and partition scans

use crate::config::ScanPolicy;
use crate::store::StoreClient;
use crate::stream::{RecordStream, StreamCapacity};

use super::errors::ExecutorResult;
use super::listener::StreamListener;

/// Starts an asynchronous scan feeding a record stream
pub struct ScanExecutor<'a, S: StoreClient + ?Sized> {
    store: &'a S,
}

impl<'a, S: StoreClient + ?Sized> ScanExecutor<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Registers the scan and returns the stream it fills
    pub fn execute(
        &self,
        policy: &ScanPolicy,
        namespace: &str,
        set: &str,
        bin_names: Option<&[String]>,
        capacity: StreamCapacity,
    ) -> ExecutorResult<RecordStream> {
        let (sink, stream) = RecordStream::channel(capacity);
        self.store.scan(
            policy,
            namespace,
            set,
            bin_names,
            Box::new(StreamListener::new(sink)),
        )?;
        Ok(stream)
    }
}
