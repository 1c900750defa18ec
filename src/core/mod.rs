//! Core admission/release protocol and capacity accounting.

pub mod error;
pub mod handle;
pub mod pool;
pub mod scheduler;

pub(crate) mod waiter;

pub use error::{AppResult, SchedulerError};
pub use handle::ExecutionHandle;
pub use pool::HandlePool;
pub use scheduler::RateLimitedScheduler;
