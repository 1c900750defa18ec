//! Redis-backed coordination store adapter (command mapping and interface stubs).

use super::{CoordinationStore, Subscription};
use crate::core::{ExecutionHandle, SchedulerError};

/// Redis store adapter placeholder.
///
/// Holds the target address and documents the command mapping for each store
/// primitive; every operation reports the store as unavailable until the
/// adapter is wired to a Redis client. A scheduler constructed over this
/// backend therefore fails fast with [`SchedulerError::StoreUnavailable`],
/// which is the required behavior for an unreachable store.
pub struct RedisStore {
    addr: String,
}

impl RedisStore {
    /// Create a new adapter targeting `addr` (for example `"redis:6379"`).
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    /// Address this adapter targets.
    #[must_use]
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Command templates for each store primitive.
    ///
    /// Handles travel as their JSON encoding. The reset runs inside a
    /// transaction so that no caller observes a half-filled queue.
    #[must_use]
    pub const fn commands() -> &'static [&'static str] {
        &[
            "MULTI; DEL <bucket>; RPUSH <bucket> <handle>...; EXEC",
            "LPOP <bucket>",
            "RPUSH <bucket> <handle>",
            "LLEN <bucket>",
            "PUBLISH <channel> ''",
            "SUBSCRIBE <channel>",
        ]
    }

    fn unavailable(&self) -> SchedulerError {
        SchedulerError::StoreUnavailable(format!(
            "redis store at {} not wired to a client",
            self.addr
        ))
    }
}

impl CoordinationStore for RedisStore {
    fn reset_queue(&self, _key: &str, _handles: &[ExecutionHandle]) -> Result<(), SchedulerError> {
        Err(self.unavailable())
    }

    fn pop_front(&self, _key: &str) -> Result<Option<ExecutionHandle>, SchedulerError> {
        Err(self.unavailable())
    }

    fn push_back(&self, _key: &str, _handle: ExecutionHandle) -> Result<(), SchedulerError> {
        Err(self.unavailable())
    }

    fn queue_len(&self, _key: &str) -> Result<usize, SchedulerError> {
        Err(self.unavailable())
    }

    fn publish(&self, _channel: &str) -> Result<(), SchedulerError> {
        Err(self.unavailable())
    }

    fn subscribe(&self, _channel: &str) -> Result<Box<dyn Subscription>, SchedulerError> {
        Err(self.unavailable())
    }
}
