//! Bridge from store callbacks to a record stream

use crate::model::Record;
use crate::store::{RecordListener, StoreError};
use crate::stream::RecordSink;

/// Forwards store callbacks into a `RecordSink`.
///
/// `on_record` reports `false` once the consumer has closed the stream, so
/// the store stops delivering. A listener dropped without a terminal
/// callback fails the stream with `StoreError::Abandoned`, the consumer
/// never waits on a producer that is gone.
pub struct StreamListener {
    sink: RecordSink,
    terminated: bool,
    delivered: u64,
}

impl StreamListener {
    pub fn new(sink: RecordSink) -> Self {
        Self {
            sink,
            terminated: false,
            delivered: 0,
        }
    }
}

impl RecordListener for StreamListener {
    fn on_record(&mut self, record: Record) -> bool {
        if self.sink.push(record) {
            self.delivered += 1;
            true
        } else {
            tracing::debug!(delivered = self.delivered, "consumer closed, unsubscribing");
            false
        }
    }

    fn on_success(mut self: Box<Self>) {
        self.terminated = true;
        tracing::debug!(delivered = self.delivered, "store signalled completion");
        self.sink.complete();
    }

    fn on_failure(mut self: Box<Self>, error: StoreError) {
        self.terminated = true;
        tracing::warn!(code = error.code(), error = %error, "store signalled failure");
        self.sink.fail(error);
    }
}

impl Drop for StreamListener {
    fn drop(&mut self) {
        if !self.terminated && !self.sink.is_closed() {
            self.sink.fail(StoreError::Abandoned);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::RecordStream;
    use std::collections::BTreeMap;

    fn record() -> Record {
        Record::new(None, BTreeMap::new(), 1)
    }

    #[test]
    fn test_success_completes_stream() {
        let (sink, mut stream) = RecordStream::unbounded();
        let mut listener = Box::new(StreamListener::new(sink));
        assert!(listener.on_record(record()));
        listener.on_success();

        assert!(stream.next_record().unwrap().is_some());
        assert_eq!(stream.next_record().unwrap(), None);
    }

    #[test]
    fn test_failure_reaches_consumer() {
        let (sink, mut stream) = RecordStream::unbounded();
        let listener = Box::new(StreamListener::new(sink));
        listener.on_failure(StoreError::Timeout(5));
        assert_eq!(stream.next_record(), Err(StoreError::Timeout(5)));
    }

    #[test]
    fn test_dropped_listener_fails_stream() {
        let (sink, mut stream) = RecordStream::unbounded();
        drop(StreamListener::new(sink));
        assert_eq!(stream.next_record(), Err(StoreError::Abandoned));
    }

    #[test]
    fn test_closed_consumer_unsubscribes() {
        let (sink, mut stream) = RecordStream::unbounded();
        let mut listener = StreamListener::new(sink);
        stream.close();
        assert!(!listener.on_record(record()));
    }
}
