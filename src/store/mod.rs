//! Coordination store abstraction and backends.
//!
//! The store is the only shared mutable state between callers: it holds each
//! bucket's handle queue and its notification channel. All cross-caller
//! serialization is delegated to the atomicity of these primitives; clients
//! never lock around them.

pub mod memory;
pub mod redis;

pub use memory::InMemoryStore;
pub use redis::RedisStore;

use crate::core::{ExecutionHandle, SchedulerError};

/// A blocking subscription to a notification channel.
///
/// Dropping the subscription unsubscribes.
pub trait Subscription: Send {
    /// Block until the next wake hint arrives on the channel.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::StoreUnavailable`] when the store side of
    /// the channel has gone away.
    fn wait(&self) -> Result<(), SchedulerError>;
}

/// Shared, atomic backing service for handle queues and wake channels.
///
/// Each operation is atomic and total-ordered from the callers' perspective:
/// no two callers can pop the same handle, and a reset is never observable
/// half-applied.
///
/// # Errors
///
/// Every operation returns [`SchedulerError::StoreUnavailable`] when the
/// store cannot be reached.
pub trait CoordinationStore: Send + Sync {
    /// Atomically clear the queue under `key` and fill it with `handles`.
    fn reset_queue(&self, key: &str, handles: &[ExecutionHandle]) -> Result<(), SchedulerError>;

    /// Atomically pop the front handle, if present. Never blocks.
    fn pop_front(&self, key: &str) -> Result<Option<ExecutionHandle>, SchedulerError>;

    /// Atomically push a handle to the back of the queue under `key`.
    fn push_back(&self, key: &str, handle: ExecutionHandle) -> Result<(), SchedulerError>;

    /// Current length of the queue under `key`.
    fn queue_len(&self, key: &str) -> Result<usize, SchedulerError>;

    /// Publish a wake hint to every current subscriber of `channel`.
    fn publish(&self, channel: &str) -> Result<(), SchedulerError>;

    /// Subscribe to wake hints on `channel`.
    fn subscribe(&self, channel: &str) -> Result<Box<dyn Subscription>, SchedulerError>;
}
