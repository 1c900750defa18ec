//! Construct one scheduler per configured bucket.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::BucketsConfig;
use crate::core::{RateLimitedScheduler, SchedulerError};
use crate::store::CoordinationStore;

/// Build schedulers for every bucket in `cfg`, all sharing `store`.
///
/// Seeding is destructive per bucket, so this is meant to run once at process
/// startup.
///
/// # Errors
///
/// Returns the first configuration or store error encountered.
pub fn build_schedulers(
    cfg: &BucketsConfig,
    store: &Arc<dyn CoordinationStore>,
) -> Result<HashMap<String, RateLimitedScheduler>, SchedulerError> {
    cfg.validate()?;

    let mut schedulers = HashMap::new();
    for (name, spec) in &cfg.buckets {
        let scheduler = RateLimitedScheduler::with_defaults(
            name.clone(),
            spec,
            &cfg.defaults,
            Arc::clone(store),
        )?;
        schedulers.insert(name.clone(), scheduler);
    }

    Ok(schedulers)
}
