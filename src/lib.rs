//! # Execution Gate
//!
//! A distributed, fairness-preserving rate-limited execution scheduler.
//!
//! This library bounds how many logical executions may be concurrently active
//! across possibly many independent processes, using a shared coordination
//! store as the single source of truth. Callers wrap a unit of work; the
//! scheduler admits it only when capacity exists and enforces a minimum
//! cooldown before that capacity is reused.
//!
//! ## Core Problem Solved
//!
//! Upstream services and shared resources impose admission limits that a
//! single in-process semaphore cannot enforce:
//!
//! - **Cross-Process Limits**: Several worker processes must share one quota
//! - **Cooldown Windows**: A freed slot must rest before it is handed out again
//! - **No Capacity Leaks**: A failing caller must never consume a slot forever
//! - **No Starvation**: Every waiter must eventually be served under contention
//!
//! ## Key Concepts
//!
//! - **Bucket**: a named, independently configured rate-limit domain
//! - **Handle**: a fungible token of execution capacity, stamped with the
//!   earliest time it may be used
//! - **Handle Pool**: a strict FIFO queue of handles held in the coordination
//!   store, seeded with `threshold` handles at construction
//! - **Coordination Store**: the shared atomic backing service; an in-memory
//!   implementation covers single-process use, a networked adapter covers
//!   fleets of processes
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use execution_gate::config::ConstraintSpec;
//! use execution_gate::core::RateLimitedScheduler;
//! use execution_gate::store::{CoordinationStore, InMemoryStore};
//!
//! let store: Arc<dyn CoordinationStore> = Arc::new(InMemoryStore::new());
//! let scheduler = RateLimitedScheduler::new(
//!     "api-calls",
//!     ConstraintSpec::new(2, Duration::from_millis(500)),
//!     store,
//! ).expect("store reachable");
//!
//! let answer = scheduler.within_constraints(|| 21 * 2).expect("admitted");
//! assert_eq!(answer, 42);
//! ```
//!
//! Admission blocks while all handles are checked out and sleeps out a
//! handle's remaining cooldown before running the work. The handle is
//! returned to the pool on every exit path, including a panicking closure.
//!
//! For complete examples, see:
//! - `tests/scheduler_test.rs` - Full integration tests
//! - `README.md` - Comprehensive documentation

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core admission/release protocol: handles, pool, waiter, and scheduler.
pub mod core;
/// Configuration models for constraint defaults and bucket maps.
pub mod config;
/// Builders to construct schedulers from configuration.
pub mod builders;
/// Coordination store abstraction and backends.
pub mod store;
/// Shared utilities.
pub mod util;
