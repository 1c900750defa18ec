//! Blocking handle acquisition.
//!
//! The protocol is the classic missed-wakeup guard: try the fast path,
//! subscribe, re-check, then suspend on the channel and re-check on every
//! hint. The subscription must be established before the second check; a
//! release landing between the fast path and the subscription would
//! otherwise go unseen and the waiter would sleep on a nonempty queue.

use crate::core::{ExecutionHandle, HandlePool, SchedulerError};

/// Block until a handle can be popped from `pool`.
///
/// May block indefinitely while capacity never frees; bounded waiting is the
/// caller's responsibility.
pub(crate) fn acquire(pool: &HandlePool) -> Result<ExecutionHandle, SchedulerError> {
    // Fast path: no subscription churn under low contention.
    if let Some(handle) = pool.try_acquire()? {
        return Ok(handle);
    }

    let subscription = pool.subscribe()?;

    // Re-check after subscribing: a release may have slipped in between the
    // fast path and the subscription.
    if let Some(handle) = pool.try_acquire()? {
        return Ok(handle);
    }

    loop {
        subscription.wait()?;
        // A hint, not a grant: several waiters may wake for one released
        // handle and all but one lose the pop.
        if let Some(handle) = pool.try_acquire()? {
            return Ok(handle);
        }
        tracing::trace!(bucket = %pool.bucket(), "lost wake race, re-suspending");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Constraint;
    use crate::store::{CoordinationStore, InMemoryStore};
    use crate::util::clock::now_ms;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_acquire_takes_fast_path_when_pool_nonempty() {
        let store: Arc<dyn CoordinationStore> = Arc::new(InMemoryStore::new());
        let pool = HandlePool::seed(
            "fast",
            Constraint {
                threshold: 1,
                interval: Duration::ZERO,
            },
            store,
        )
        .unwrap();

        acquire(&pool).unwrap();
        assert_eq!(pool.free_count().unwrap(), 0);
    }

    #[test]
    fn test_acquire_blocks_until_release() {
        let store: Arc<dyn CoordinationStore> = Arc::new(InMemoryStore::new());
        let pool = Arc::new(
            HandlePool::seed(
                "blocked",
                Constraint {
                    threshold: 1,
                    interval: Duration::ZERO,
                },
                store,
            )
            .unwrap(),
        );
        let _checked_out = pool.try_acquire().unwrap().unwrap();

        let waiter = {
            let pool = Arc::clone(&pool);
            thread::spawn(move || acquire(&pool).unwrap())
        };

        thread::sleep(Duration::from_millis(20));
        assert!(!waiter.is_finished());

        pool.release(now_ms()).unwrap();
        waiter.join().unwrap();
        assert_eq!(pool.free_count().unwrap(), 0);
    }

    #[test]
    fn test_one_release_admits_exactly_one_of_many_waiters() {
        let store: Arc<dyn CoordinationStore> = Arc::new(InMemoryStore::new());
        let pool = Arc::new(
            HandlePool::seed(
                "contended",
                Constraint {
                    threshold: 1,
                    interval: Duration::ZERO,
                },
                store,
            )
            .unwrap(),
        );
        let _checked_out = pool.try_acquire().unwrap().unwrap();

        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let pool = Arc::clone(&pool);
                thread::spawn(move || acquire(&pool).unwrap())
            })
            .collect();

        thread::sleep(Duration::from_millis(20));
        pool.release(now_ms()).unwrap();
        thread::sleep(Duration::from_millis(50));

        let finished = waiters.iter().filter(|w| w.is_finished()).count();
        assert_eq!(finished, 1);

        // Unblock the losers so the test can join them.
        pool.release(now_ms()).unwrap();
        pool.release(now_ms()).unwrap();
        for waiter in waiters {
            waiter.join().unwrap();
        }
    }
}
