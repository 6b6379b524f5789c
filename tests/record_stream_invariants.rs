//! Record Stream Invariant Tests
//!
//! Tests for stream invariants:
//! - N records then end yields exactly N records then completion
//! - Failure after records yields the records, then the failure
//! - Terminal state is sticky
//! - Bounded streams apply backpressure; closing releases producers

use std::collections::BTreeMap;
use std::thread;
use std::time::Duration;

use aerosql::model::Record;
use aerosql::store::StoreError;
use aerosql::stream::{RecordStream, StreamCapacity};
use aerosql::value::Value;

// =============================================================================
// Helper Functions
// =============================================================================

fn record(n: i64) -> Record {
    let mut bins = BTreeMap::new();
    bins.insert("n".to_string(), Value::Int(n));
    Record::new(None, bins, 1)
}

fn n_of(record: &Record) -> i64 {
    record.bin("n").and_then(Value::as_int).unwrap()
}

// =============================================================================
// Completion Tests
// =============================================================================

/// N records then end yields N records in order, then completion.
#[test]
fn test_exact_delivery_in_order() {
    for capacity in [StreamCapacity::Bounded(1), StreamCapacity::Bounded(7), StreamCapacity::Unbounded] {
        let (sink, mut stream) = RecordStream::channel(capacity);
        let producer = thread::spawn(move || {
            for n in 0..100 {
                assert!(sink.push(record(n)));
            }
            sink.complete();
        });

        let mut seen = Vec::new();
        while let Some(r) = stream.next_record().unwrap() {
            seen.push(n_of(&r));
        }
        producer.join().unwrap();

        assert_eq!(seen, (0..100).collect::<Vec<_>>());
    }
}

/// Zero records still terminates.
#[test]
fn test_empty_stream_terminates() {
    let (sink, mut stream) = RecordStream::unbounded();
    sink.complete();
    assert_eq!(stream.next_record(), Ok(None));
    assert_eq!(stream.next_record(), Ok(None));
}

// =============================================================================
// Failure Tests
// =============================================================================

/// Records enqueued before a failure are delivered before it.
#[test]
fn test_failure_never_truncates_silently() {
    let (sink, stream) = RecordStream::unbounded();
    for n in 0..5 {
        sink.push(record(n));
    }
    sink.fail(StoreError::Server {
        code: 9,
        message: "timeout".into(),
    });

    let items: Vec<_> = stream.collect();
    assert_eq!(items.len(), 6);
    assert!(items[..5].iter().all(Result::is_ok));
    assert!(matches!(items[5], Err(StoreError::Server { code: 9, .. })));
}

/// Failure is sticky; completion after failure is ignored.
#[test]
fn test_failure_is_sticky() {
    let (sink, mut stream) = RecordStream::unbounded();
    sink.fail(StoreError::Timeout(1));
    sink.complete();
    assert!(!sink.push(record(1)));

    for _ in 0..3 {
        assert_eq!(stream.next_record(), Err(StoreError::Timeout(1)));
    }
}

// =============================================================================
// Backpressure and Cancellation Tests
// =============================================================================

/// A full bounded stream blocks the producer until the consumer drains.
#[test]
fn test_backpressure_blocks_producer() {
    let (sink, mut stream) = RecordStream::bounded(2);
    let producer = thread::spawn(move || {
        for n in 0..10 {
            sink.push(record(n));
        }
        sink.complete();
    });

    thread::sleep(Duration::from_millis(30));
    assert!(stream.buffered() <= 2);

    let drained = stream.by_ref().filter(Result::is_ok).count();
    producer.join().unwrap();
    assert_eq!(drained, 10);
}

/// Closing the consumer releases a blocked producer and rejects pushes.
#[test]
fn test_close_releases_producer() {
    let (sink, mut stream) = RecordStream::bounded(1);
    let producer = thread::spawn(move || {
        let mut accepted = 0;
        for n in 0..1000 {
            if !sink.push(record(n)) {
                break;
            }
            accepted += 1;
        }
        accepted
    });

    thread::sleep(Duration::from_millis(20));
    stream.close();
    let accepted = producer.join().unwrap();
    assert!(accepted < 1000);
    assert_eq!(stream.next_record(), Ok(None));
}

/// Dropping the consumer is the same as closing it.
#[test]
fn test_drop_releases_producer() {
    let (sink, stream) = RecordStream::bounded(1);
    assert!(sink.push(record(0)));
    drop(stream);
    assert!(sink.is_closed());
    assert!(!sink.push(record(1)));
}
