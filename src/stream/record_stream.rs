//! Producer/consumer record channel

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

use crate::model::Record;
use crate::store::StoreError;

/// How many records a stream buffers before producers block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamCapacity {
    /// At most this many buffered records (minimum 1)
    Bounded(usize),
    /// Grows as needed
    Unbounded,
}

impl StreamCapacity {
    fn has_room(&self, len: usize) -> bool {
        match self {
            StreamCapacity::Bounded(cap) => len < (*cap).max(1),
            StreamCapacity::Unbounded => true,
        }
    }
}

#[derive(Debug)]
enum Terminal {
    End,
    Failed(StoreError),
}

#[derive(Debug)]
struct State {
    queue: VecDeque<Record>,
    capacity: StreamCapacity,
    terminal: Option<Terminal>,
    /// Consumer went away
    closed: bool,
}

#[derive(Debug)]
struct Shared {
    state: Mutex<State>,
    /// Signalled when a record or terminal becomes available
    readable: Condvar,
    /// Signalled when space frees up or the consumer closes
    writable: Condvar,
}

/// Producer half. Cloneable so several store callbacks can feed one stream.
#[derive(Debug, Clone)]
pub struct RecordSink {
    shared: Arc<Shared>,
}

/// Consumer half. Drained once; closes itself on drop.
#[derive(Debug)]
pub struct RecordStream {
    shared: Arc<Shared>,
    /// Iterator already yielded the terminal
    exhausted: bool,
}

impl RecordStream {
    /// Creates a stream with the given capacity
    pub fn channel(capacity: StreamCapacity) -> (RecordSink, RecordStream) {
        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                queue: VecDeque::new(),
                capacity,
                terminal: None,
                closed: false,
            }),
            readable: Condvar::new(),
            writable: Condvar::new(),
        });
        (
            RecordSink {
                shared: Arc::clone(&shared),
            },
            RecordStream {
                shared,
                exhausted: false,
            },
        )
    }

    /// Fixed-capacity stream for results of known size
    pub fn bounded(capacity: usize) -> (RecordSink, RecordStream) {
        Self::channel(StreamCapacity::Bounded(capacity))
    }

    /// Growable stream for results of unknown size
    pub fn unbounded() -> (RecordSink, RecordStream) {
        Self::channel(StreamCapacity::Unbounded)
    }

    /// Blocks until the next record, end of stream or failure.
    ///
    /// `Ok(None)` marks normal completion. After the terminal has been
    /// observed every further call returns it again.
    pub fn next_record(&mut self) -> Result<Option<Record>, StoreError> {
        let mut state = self.shared.state.lock();
        loop {
            if let Some(record) = state.queue.pop_front() {
                self.shared.writable.notify_one();
                return Ok(Some(record));
            }
            match &state.terminal {
                Some(Terminal::End) => return Ok(None),
                Some(Terminal::Failed(err)) => return Err(err.clone()),
                None if state.closed => return Ok(None),
                None => self.shared.readable.wait(&mut state),
            }
        }
    }

    /// Abandons the stream: drops buffered records and releases producers
    pub fn close(&mut self) {
        let mut state = self.shared.state.lock();
        if !state.closed {
            state.closed = true;
            state.queue.clear();
            self.shared.writable.notify_all();
        }
    }

    /// True once a terminal signal has been recorded
    pub fn is_terminated(&self) -> bool {
        self.shared.state.lock().terminal.is_some()
    }

    /// Records currently buffered
    pub fn buffered(&self) -> usize {
        self.shared.state.lock().queue.len()
    }
}

impl Iterator for RecordStream {
    type Item = Result<Record, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        match self.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.exhausted = true;
                None
            }
            Err(err) => {
                self.exhausted = true;
                Some(Err(err))
            }
        }
    }
}

impl Drop for RecordStream {
    fn drop(&mut self) {
        self.close();
    }
}

impl RecordSink {
    /// Enqueues a record, blocking while a bounded stream is full.
    ///
    /// Returns false if the consumer closed the stream or a terminal was
    /// already signalled; the record is dropped in that case.
    pub fn push(&self, record: Record) -> bool {
        let mut state = self.shared.state.lock();
        loop {
            if state.closed || state.terminal.is_some() {
                return false;
            }
            if state.capacity.has_room(state.queue.len()) {
                break;
            }
            self.shared.writable.wait(&mut state);
        }
        state.queue.push_back(record);
        self.shared.readable.notify_one();
        true
    }

    /// Signals normal end of stream
    pub fn complete(&self) {
        self.terminate(Terminal::End);
    }

    /// Signals a terminal failure
    pub fn fail(&self, error: StoreError) {
        self.terminate(Terminal::Failed(error));
    }

    /// True if the consumer closed the stream
    pub fn is_closed(&self) -> bool {
        self.shared.state.lock().closed
    }

    fn terminate(&self, terminal: Terminal) {
        let mut state = self.shared.state.lock();
        if state.terminal.is_none() {
            state.terminal = Some(terminal);
        }
        self.shared.readable.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use std::collections::BTreeMap;
    use std::thread;
    use std::time::Duration;

    fn record(i: i64) -> Record {
        let mut bins = BTreeMap::new();
        bins.insert("n".to_string(), Value::Int(i));
        Record::new(None, bins, 1)
    }

    fn n(record: &Record) -> i64 {
        record.bin("n").and_then(Value::as_int).unwrap()
    }

    #[test]
    fn test_records_then_end() {
        let (sink, mut stream) = RecordStream::unbounded();
        for i in 0..3 {
            assert!(sink.push(record(i)));
        }
        sink.complete();

        for i in 0..3 {
            assert_eq!(n(&stream.next_record().unwrap().unwrap()), i);
        }
        assert_eq!(stream.next_record().unwrap(), None);
        // terminal is sticky
        assert_eq!(stream.next_record().unwrap(), None);
    }

    #[test]
    fn test_failure_after_buffered_records() {
        let (sink, stream) = RecordStream::unbounded();
        sink.push(record(1));
        sink.push(record(2));
        sink.fail(StoreError::Timeout(100));

        let items: Vec<_> = stream.collect();
        assert_eq!(items.len(), 3);
        assert!(items[0].is_ok());
        assert!(items[1].is_ok());
        assert_eq!(items[2], Err(StoreError::Timeout(100)));
    }

    #[test]
    fn test_first_terminal_wins() {
        let (sink, mut stream) = RecordStream::unbounded();
        sink.complete();
        sink.fail(StoreError::Abandoned);
        assert!(!sink.push(record(1)));
        assert_eq!(stream.next_record().unwrap(), None);
    }

    #[test]
    fn test_bounded_backpressure() {
        let (sink, mut stream) = RecordStream::bounded(1);
        let producer = thread::spawn(move || {
            for i in 0..5 {
                assert!(sink.push(record(i)));
            }
            sink.complete();
        });

        thread::sleep(Duration::from_millis(20));
        // producer is parked on the second push
        assert_eq!(stream.buffered(), 1);

        let received: Vec<i64> = stream.by_ref().map(|r| n(&r.unwrap())).collect();
        assert_eq!(received, vec![0, 1, 2, 3, 4]);
        producer.join().unwrap();
    }

    #[test]
    fn test_terminal_does_not_wait_for_capacity() {
        let (sink, mut stream) = RecordStream::bounded(1);
        assert!(sink.push(record(1)));
        sink.complete();
        assert!(stream.is_terminated());
        assert_eq!(n(&stream.next_record().unwrap().unwrap()), 1);
        assert_eq!(stream.next_record().unwrap(), None);
    }

    #[test]
    fn test_close_releases_blocked_producer() {
        let (sink, mut stream) = RecordStream::bounded(1);
        let producer_sink = sink.clone();
        let producer = thread::spawn(move || {
            let mut accepted = 0;
            for i in 0..10 {
                if !producer_sink.push(record(i)) {
                    break;
                }
                accepted += 1;
            }
            accepted
        });

        thread::sleep(Duration::from_millis(20));
        stream.close();

        let accepted = producer.join().unwrap();
        assert!(accepted < 10);
        assert!(sink.is_closed());
        assert!(!sink.push(record(99)));
    }

    #[test]
    fn test_drop_closes() {
        let (sink, stream) = RecordStream::unbounded();
        drop(stream);
        assert!(sink.is_closed());
        assert!(!sink.push(record(1)));
    }

    #[test]
    fn test_consumer_waits_for_producer() {
        let (sink, mut stream) = RecordStream::unbounded();
        let producer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            sink.push(record(7));
            sink.complete();
        });
        assert_eq!(n(&stream.next_record().unwrap().unwrap()), 7);
        assert_eq!(stream.next_record().unwrap(), None);
        producer.join().unwrap();
    }
}
