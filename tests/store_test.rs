//! Integration tests for coordination store backends.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use execution_gate::core::{ExecutionHandle, SchedulerError};
use execution_gate::store::{CoordinationStore, InMemoryStore, RedisStore};

#[test]
fn test_memory_store_pop_push_total_order() {
    let store = Arc::new(InMemoryStore::new());
    store
        .reset_queue(
            "bucket",
            &[ExecutionHandle::valid_at(1), ExecutionHandle::valid_at(2)],
        )
        .unwrap();

    // Hammer the queue from several threads: every pop gets a distinct
    // handle, and pushing it back keeps the population constant.
    let workers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..200 {
                    if let Some(handle) = store.pop_front("bucket").unwrap() {
                        store.push_back("bucket", handle).unwrap();
                    }
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(store.queue_len("bucket").unwrap(), 2);
}

#[test]
fn test_memory_store_subscribe_before_publish_never_misses() {
    let store = Arc::new(InMemoryStore::new());

    // Subscribe first, publish from another thread, then wait: the hint must
    // be buffered even though the waiter was not blocked yet.
    let subscription = store.subscribe("ch").unwrap();
    let publisher = {
        let store = Arc::clone(&store);
        thread::spawn(move || store.publish("ch").unwrap())
    };
    publisher.join().unwrap();

    subscription.wait().unwrap();
}

#[test]
fn test_memory_store_wakes_waiter_blocked_on_empty_queue() {
    let store = Arc::new(InMemoryStore::new());
    store.reset_queue("bucket", &[]).unwrap();

    let waiter = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            let subscription = store.subscribe("ch").unwrap();
            loop {
                if let Some(handle) = store.pop_front("bucket").unwrap() {
                    return handle;
                }
                subscription.wait().unwrap();
            }
        })
    };

    thread::sleep(Duration::from_millis(20));
    store
        .push_back("bucket", ExecutionHandle::valid_at(42))
        .unwrap();
    store.publish("ch").unwrap();

    assert_eq!(waiter.join().unwrap().valid_at_ms, 42);
}

#[test]
fn test_redis_adapter_reports_unavailable() {
    let store = RedisStore::new("unknown-host:6379");

    assert!(matches!(
        store.reset_queue("bucket", &[]),
        Err(SchedulerError::StoreUnavailable(_))
    ));
    assert!(matches!(
        store.pop_front("bucket"),
        Err(SchedulerError::StoreUnavailable(_))
    ));
    assert!(matches!(
        store.push_back("bucket", ExecutionHandle::valid_at(0)),
        Err(SchedulerError::StoreUnavailable(_))
    ));
    assert!(matches!(
        store.queue_len("bucket"),
        Err(SchedulerError::StoreUnavailable(_))
    ));
    assert!(matches!(
        store.publish("ch"),
        Err(SchedulerError::StoreUnavailable(_))
    ));
    assert!(store.subscribe("ch").is_err());
}

#[test]
fn test_redis_adapter_documents_every_primitive() {
    // One command template per store primitive plus the queue length read.
    assert_eq!(RedisStore::commands().len(), 6);
    assert_eq!(RedisStore::new("redis:6379").addr(), "redis:6379");
}
