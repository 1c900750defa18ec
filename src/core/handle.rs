//! Execution handle: one unit of available capacity.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A fungible token representing one unit of execution capacity.
///
/// A handle carries only the earliest timestamp at which it may be used; it
/// has no identity beyond its position in the bucket queue. A handle can be
/// out of the queue's cooldown ("valid") or still inside it, in which case
/// the holder sleeps out the remainder before running work. Validity is
/// deferred admission: the pool's free count includes handles that are not
/// yet usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionHandle {
    /// Earliest timestamp (milliseconds since the Unix epoch) at which this
    /// handle may be used.
    pub valid_at_ms: u128,
}

impl ExecutionHandle {
    /// Create a handle usable from `valid_at_ms` onward.
    #[must_use]
    pub const fn valid_at(valid_at_ms: u128) -> Self {
        Self { valid_at_ms }
    }

    /// Remaining cooldown before this handle becomes usable, if any.
    #[must_use]
    pub fn remaining_delay(&self, now_ms: u128) -> Option<Duration> {
        if self.valid_at_ms > now_ms {
            let delta = u64::try_from(self.valid_at_ms - now_ms).unwrap_or(u64::MAX);
            Some(Duration::from_millis(delta))
        } else {
            None
        }
    }
}
