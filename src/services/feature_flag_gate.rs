//! Feature flag lookup with a sync-then-async fallback chain.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::domain::models::FlagTable;
use crate::domain::ports::FeatureManager;

/// Wraps a [`FeatureManager`] so that flag checks never fail.
///
/// Each evaluation tries the synchronous form once, then the asynchronous
/// form once, then settles on `false`. Nothing is retried.
pub struct FeatureFlagGate {
    manager: Arc<dyn FeatureManager>,
    failures: AtomicU64,
}

impl FeatureFlagGate {
    pub fn new(manager: Arc<dyn FeatureManager>) -> Self {
        Self {
            manager,
            failures: AtomicU64::new(0),
        }
    }

    /// Evaluate `flag`, degrading to `false` when both paths fail.
    pub async fn is_enabled(&self, flag: &str) -> bool {
        match self.manager.is_enabled(flag) {
            Ok(enabled) => {
                tracing::debug!(flag, enabled, method = "sync", "feature flag evaluated");
                return enabled;
            }
            Err(e) => {
                tracing::warn!(flag, error = %e, "error checking feature flag with sync method");
            }
        }

        match self.manager.is_enabled_async(flag).await {
            Ok(enabled) => {
                tracing::debug!(flag, enabled, method = "async", "feature flag evaluated");
                enabled
            }
            Err(e) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                tracing::error!(flag, error = %e, "error checking feature flag, defaulting to disabled");
                false
            }
        }
    }

    /// Hand a freshly refreshed flag table to the underlying client.
    pub fn update_flags(&self, flags: FlagTable) {
        self.manager.update_flags(flags);
    }

    /// Number of evaluations that fell through to the `false` default.
    pub fn failure_count(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }
}
