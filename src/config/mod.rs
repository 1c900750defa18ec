//! Configuration models for constraint defaults and bucket maps.

pub mod constraint;

pub use constraint::{BucketsConfig, Constraint, ConstraintSpec, Defaults};
