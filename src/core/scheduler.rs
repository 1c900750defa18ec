//! Rate-limited scheduler facade.

use std::sync::Arc;
use std::thread;

use crate::config::{Constraint, ConstraintSpec, Defaults};
use crate::core::{waiter, HandlePool, SchedulerError};
use crate::store::CoordinationStore;
use crate::util::clock::now_ms;

/// Rate-limited execution scheduler for a single bucket.
///
/// Bounds concurrent executions to `threshold` and enforces `interval` of
/// cooldown before a released slot is reused. All admission state lives in
/// the coordination store, so independent processes sharing a store and a
/// bucket name are governed together. Schedulers compose: work run under one
/// scheduler may call into another, and the outer handle stays checked out
/// for the whole inner call, so aggregate throughput follows the stricter
/// constraint.
pub struct RateLimitedScheduler {
    pool: HandlePool,
}

impl RateLimitedScheduler {
    /// Create a scheduler for `bucket`, resolving missing constraint fields
    /// against the stock defaults (threshold 5, interval 1 s).
    ///
    /// Seeds the bucket's handle queue, discarding any prior state under the
    /// same name.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::StoreUnavailable`] when the coordination store
    /// cannot be reached; [`SchedulerError::InvalidConstraint`] when the
    /// resolved threshold is zero.
    pub fn new(
        bucket: impl Into<String>,
        spec: ConstraintSpec,
        store: Arc<dyn CoordinationStore>,
    ) -> Result<Self, SchedulerError> {
        Self::with_defaults(bucket, &spec, &Defaults::default(), store)
    }

    /// Like [`Self::new`], with caller-supplied defaults.
    ///
    /// # Errors
    ///
    /// Same as [`Self::new`].
    pub fn with_defaults(
        bucket: impl Into<String>,
        spec: &ConstraintSpec,
        defaults: &Defaults,
        store: Arc<dyn CoordinationStore>,
    ) -> Result<Self, SchedulerError> {
        let constraint = spec.resolve(defaults)?;
        let pool = HandlePool::seed(bucket, constraint, store)?;
        tracing::info!(
            bucket = %pool.bucket(),
            threshold = constraint.threshold,
            interval_ms = %constraint.interval.as_millis(),
            "scheduler ready"
        );
        Ok(Self { pool })
    }

    /// Run `work` under this bucket's constraints.
    ///
    /// Blocks until a handle is free (possibly forever), sleeps out the
    /// handle's remaining cooldown, runs `work`, and releases the handle on
    /// every exit path. A panicking `work` keeps unwinding after the release,
    /// so a failure costs the pool nothing. The handle is stamped
    /// `now + interval` on release, which is what enforces the cooldown for
    /// its next holder.
    ///
    /// # Errors
    ///
    /// Propagates store failures; `work`'s own outcome is returned untouched
    /// as the `Ok` value.
    pub fn within_constraints<T, F>(&self, work: F) -> Result<T, SchedulerError>
    where
        F: FnOnce() -> T,
    {
        let handle = waiter::acquire(&self.pool)?;
        if let Some(delay) = handle.remaining_delay(now_ms()) {
            tracing::debug!(
                bucket = %self.pool.bucket(),
                delay_ms = %delay.as_millis(),
                "handle inside cooldown, sleeping"
            );
            thread::sleep(delay);
        }

        let guard = ReleaseGuard { pool: &self.pool };
        let out = work();
        guard.finish()?;
        Ok(out)
    }

    /// Handles currently checked out. Informational only; admission is
    /// governed by the queue itself, never by this counter.
    ///
    /// # Errors
    ///
    /// Propagates store failures unmodified.
    pub fn count_active_executions(&self) -> Result<usize, SchedulerError> {
        self.pool.active_count()
    }

    /// Handles currently queued. Counts handles, not currently usable slots:
    /// a free handle may still be inside its cooldown.
    ///
    /// # Errors
    ///
    /// Propagates store failures unmodified.
    pub fn count_free_execution_handles(&self) -> Result<usize, SchedulerError> {
        self.pool.free_count()
    }

    /// The constraint this scheduler enforces.
    #[must_use]
    pub const fn constraint(&self) -> &Constraint {
        self.pool.constraint()
    }
}

/// Returns the checked-out handle to the pool exactly once.
///
/// `finish` covers the normal path and can propagate a store failure; `Drop`
/// covers the unwinding path, where a failure can only be logged. A handle
/// leaked here would violate conservation permanently, so release fires on
/// every exit.
struct ReleaseGuard<'a> {
    pool: &'a HandlePool,
}

impl ReleaseGuard<'_> {
    fn finish(self) -> Result<(), SchedulerError> {
        let pool = self.pool;
        std::mem::forget(self);
        pool.release(now_ms())
    }
}

impl Drop for ReleaseGuard<'_> {
    fn drop(&mut self) {
        if let Err(error) = self.pool.release(now_ms()) {
            tracing::error!(
                bucket = %self.pool.bucket(),
                %error,
                "failed to release handle during unwind"
            );
        }
    }
}
