//! Periodic log line with the current configuration snapshot.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local};

use super::config_store::ConfigStore;
use super::job_scheduler::ScheduledJob;
use crate::domain::models::ConfigSnapshot;

/// Logs the current snapshot; read-only.
pub struct ConfigLoggerJob {
    store: Arc<ConfigStore>,
}

impl ConfigLoggerJob {
    pub const fn new(store: Arc<ConfigStore>) -> Self {
        Self { store }
    }
}

/// `HH:MM:SS | Message: "..." | Version: ... | Environment: ...`
pub fn format_snapshot_line(snapshot: &ConfigSnapshot, at: DateTime<Local>) -> String {
    format!(
        "{} | Message: \"{}\" | Version: {} | Environment: {}",
        at.format("%H:%M:%S"),
        snapshot.message,
        snapshot.version,
        snapshot.environment
    )
}

#[async_trait]
impl ScheduledJob for ConfigLoggerJob {
    fn name(&self) -> &str {
        "config-logger"
    }

    async fn run(&self) {
        let snapshot = self.store.current();
        tracing::info!(
            feature_enabled = snapshot.feature_enabled,
            "{}",
            format_snapshot_line(&snapshot, Local::now())
        );
    }
}
