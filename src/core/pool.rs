//! Handle pool: one bucket's FIFO queue of execution handles.

use std::sync::Arc;

use crate::config::Constraint;
use crate::core::{ExecutionHandle, SchedulerError};
use crate::store::{CoordinationStore, Subscription};
use crate::util::clock::now_ms;

/// FIFO pool of execution handles for a single bucket, backed by the
/// coordination store.
///
/// The pool is seeded with `threshold` handles at construction and handles
/// are conserved thereafter: `free_count() + active_count() == threshold` at
/// every quiescent instant. Released handles go to the back of the queue, so
/// every waiter has a bounded number of turns ahead of it as long as releases
/// keep occurring.
pub struct HandlePool {
    bucket: String,
    channel: String,
    constraint: Constraint,
    store: Arc<dyn CoordinationStore>,
}

impl HandlePool {
    /// Create the pool and seed it with `threshold` immediately valid
    /// handles. Any prior queue state under the same bucket name is
    /// discarded.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::StoreUnavailable`] when the store cannot be
    /// reached; the seeding reset doubles as the reachability probe.
    pub fn seed(
        bucket: impl Into<String>,
        constraint: Constraint,
        store: Arc<dyn CoordinationStore>,
    ) -> Result<Self, SchedulerError> {
        let bucket = bucket.into();
        let channel = format!("{bucket}:handle-released");
        let pool = Self {
            bucket,
            channel,
            constraint,
            store,
        };
        pool.reset(now_ms())?;
        Ok(pool)
    }

    /// Atomically clear the queue and fill it with `threshold` handles valid
    /// at `now_ms`. A single store operation, so no caller can observe a
    /// half-filled pool.
    fn reset(&self, now_ms: u128) -> Result<(), SchedulerError> {
        let handles =
            vec![ExecutionHandle::valid_at(now_ms); self.constraint.threshold as usize];
        self.store.reset_queue(&self.bucket, &handles)?;
        tracing::debug!(
            bucket = %self.bucket,
            threshold = self.constraint.threshold,
            "seeded handle pool"
        );
        Ok(())
    }

    /// Pop the front handle if one is queued. Never blocks.
    ///
    /// # Errors
    ///
    /// Propagates store failures unmodified.
    pub fn try_acquire(&self) -> Result<Option<ExecutionHandle>, SchedulerError> {
        self.store.pop_front(&self.bucket)
    }

    /// Return a handle to the back of the queue, stamped `now + interval`,
    /// then wake waiters.
    ///
    /// The wake hint is only a hint: a waiter that polls late still finds the
    /// pushed handle, and a waiter that wakes without winning the pop
    /// re-suspends.
    ///
    /// # Errors
    ///
    /// Propagates store failures unmodified.
    pub fn release(&self, now_ms: u128) -> Result<(), SchedulerError> {
        let valid_at = now_ms + self.constraint.interval.as_millis();
        self.store
            .push_back(&self.bucket, ExecutionHandle::valid_at(valid_at))?;
        self.store.publish(&self.channel)?;
        tracing::debug!(bucket = %self.bucket, valid_at_ms = %valid_at, "released handle");
        Ok(())
    }

    /// Number of handles currently queued.
    ///
    /// Counts handles, not currently usable slots: a queued handle may still
    /// be inside its cooldown.
    ///
    /// # Errors
    ///
    /// Propagates store failures unmodified.
    pub fn free_count(&self) -> Result<usize, SchedulerError> {
        self.store.queue_len(&self.bucket)
    }

    /// Number of handles currently checked out.
    ///
    /// # Errors
    ///
    /// Propagates store failures unmodified.
    pub fn active_count(&self) -> Result<usize, SchedulerError> {
        Ok((self.constraint.threshold as usize).saturating_sub(self.free_count()?))
    }

    /// Bucket name this pool serves.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Constraint this pool enforces.
    #[must_use]
    pub const fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    /// Subscribe to this bucket's wake channel.
    pub(crate) fn subscribe(&self) -> Result<Box<dyn Subscription>, SchedulerError> {
        self.store.subscribe(&self.channel)
    }
}
