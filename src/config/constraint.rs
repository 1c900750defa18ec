//! Bucket constraint configuration structures.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::SchedulerError;

/// Process-wide constraint defaults.
///
/// An explicit, immutable value passed at construction time; there is no
/// shared mutable singleton behind it. The stock defaults are 5 executions
/// per 1 second cooldown.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Defaults {
    /// Threshold applied when a bucket omits one.
    pub threshold: u32,
    /// Cooldown in milliseconds applied when a bucket omits one.
    pub interval_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            threshold: 5,
            interval_ms: 1_000,
        }
    }
}

/// Per-bucket constraint as supplied by the caller.
///
/// Missing fields resolve against [`Defaults`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConstraintSpec {
    /// Maximum concurrent executions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u32>,
    /// Minimum cooldown in milliseconds before a released handle is valid again.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_ms: Option<u64>,
}

impl ConstraintSpec {
    /// Spec with both fields set.
    #[must_use]
    pub fn new(threshold: u32, interval: Duration) -> Self {
        Self {
            threshold: Some(threshold),
            interval_ms: Some(u64::try_from(interval.as_millis()).unwrap_or(u64::MAX)),
        }
    }

    /// Resolve against `defaults` and validate.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidConstraint`] when the resolved
    /// threshold is zero.
    pub fn resolve(&self, defaults: &Defaults) -> Result<Constraint, SchedulerError> {
        let threshold = self.threshold.unwrap_or(defaults.threshold);
        if threshold == 0 {
            return Err(SchedulerError::InvalidConstraint(
                "threshold must be greater than 0".into(),
            ));
        }
        let interval = Duration::from_millis(self.interval_ms.unwrap_or(defaults.interval_ms));
        Ok(Constraint {
            threshold,
            interval,
        })
    }
}

/// Fully resolved, immutable bucket constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraint {
    /// Maximum number of handles (maximum concurrency) for the bucket.
    pub threshold: u32,
    /// Minimum cooldown before a released handle becomes valid again.
    pub interval: Duration,
}

/// Root configuration: defaults plus a map of named buckets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketsConfig {
    /// Defaults applied to buckets with missing fields.
    #[serde(default)]
    pub defaults: Defaults,
    /// Map of bucket name to constraint spec.
    pub buckets: HashMap<String, ConstraintSpec>,
}

impl BucketsConfig {
    /// Validate all buckets and ensure at least one bucket exists.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidConstraint`] naming the offending
    /// bucket.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.buckets.is_empty() {
            return Err(SchedulerError::InvalidConstraint(
                "at least one bucket must be defined".into(),
            ));
        }
        for (name, spec) in &self.buckets {
            spec.resolve(&self.defaults).map_err(|e| {
                SchedulerError::InvalidConstraint(format!("bucket `{name}` invalid: {e}"))
            })?;
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidConstraint`] on malformed JSON or an
    /// invalid bucket.
    pub fn from_json_str(input: &str) -> Result<Self, SchedulerError> {
        let cfg: Self = serde_json::from_str(input)
            .map_err(|e| SchedulerError::InvalidConstraint(format!("parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let resolved = ConstraintSpec::default()
            .resolve(&Defaults::default())
            .unwrap();
        assert_eq!(resolved.threshold, 5);
        assert_eq!(resolved.interval, Duration::from_secs(1));
    }

    #[test]
    fn test_explicit_fields_override_defaults() {
        let spec = ConstraintSpec::new(2, Duration::from_millis(250));
        let resolved = spec.resolve(&Defaults::default()).unwrap();
        assert_eq!(resolved.threshold, 2);
        assert_eq!(resolved.interval, Duration::from_millis(250));
    }

    #[test]
    fn test_zero_threshold_is_rejected() {
        let spec = ConstraintSpec {
            threshold: Some(0),
            interval_ms: None,
        };
        assert!(spec.resolve(&Defaults::default()).is_err());
    }

    #[test]
    fn test_zero_interval_is_allowed() {
        let spec = ConstraintSpec::new(1, Duration::ZERO);
        let resolved = spec.resolve(&Defaults::default()).unwrap();
        assert_eq!(resolved.interval, Duration::ZERO);
    }

    #[test]
    fn test_config_requires_a_bucket() {
        let cfg = BucketsConfig {
            defaults: Defaults::default(),
            buckets: HashMap::new(),
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_config_from_json() {
        let cfg = BucketsConfig::from_json_str(
            r#"{
                "defaults": { "threshold": 3, "interval_ms": 200 },
                "buckets": {
                    "api": { "threshold": 2 },
                    "batch": { "interval_ms": 50 }
                }
            }"#,
        )
        .unwrap();

        let api = cfg.buckets["api"].resolve(&cfg.defaults).unwrap();
        assert_eq!(api.threshold, 2);
        assert_eq!(api.interval, Duration::from_millis(200));

        let batch = cfg.buckets["batch"].resolve(&cfg.defaults).unwrap();
        assert_eq!(batch.threshold, 3);
        assert_eq!(batch.interval, Duration::from_millis(50));
    }

    #[test]
    fn test_config_rejects_invalid_bucket() {
        let result = BucketsConfig::from_json_str(
            r#"{ "buckets": { "bad": { "threshold": 0 } } }"#,
        );
        assert!(result.is_err());
    }
}
