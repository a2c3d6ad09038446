//! In-memory holder of the latest known configuration.
//!
//! State is swapped as a unit through `arc-swap`, so readers never observe
//! entries from one refresh paired with a snapshot from another.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::domain::models::{AppSettings, ConfigEntries, ConfigSnapshot, DefaultsConfig};

#[derive(Debug)]
struct StoreState {
    entries: ConfigEntries,
    settings: AppSettings,
    snapshot: ConfigSnapshot,
}

/// Holder of the current configuration snapshot.
#[derive(Debug)]
pub struct ConfigStore {
    defaults: DefaultsConfig,
    state: ArcSwap<StoreState>,
}

impl ConfigStore {
    /// Start from the configured defaults with the flag off and no entries.
    pub fn new(defaults: DefaultsConfig) -> Self {
        let settings = AppSettings::from_defaults(&defaults);
        let snapshot = ConfigSnapshot::resolve(&settings, false);

        Self {
            defaults,
            state: ArcSwap::from_pointee(StoreState {
                entries: ConfigEntries::new(),
                settings,
                snapshot,
            }),
        }
    }

    /// The latest snapshot.
    pub fn current(&self) -> ConfigSnapshot {
        self.state.load().snapshot.clone()
    }

    /// Feature-enabled message when the snapshot's flag is on, else the base
    /// message.
    pub fn message(&self) -> String {
        let state = self.state.load();
        state
            .settings
            .resolve_message(state.snapshot.feature_enabled)
            .to_string()
    }

    pub fn settings(&self) -> AppSettings {
        self.state.load().settings.clone()
    }

    /// Entries of the last successful refresh that changed anything.
    pub fn entries(&self) -> ConfigEntries {
        self.state.load().entries.clone()
    }

    pub const fn defaults(&self) -> &DefaultsConfig {
        &self.defaults
    }

    /// Replace the whole state and return the new snapshot.
    pub(crate) fn replace(
        &self,
        entries: ConfigEntries,
        settings: AppSettings,
        feature_enabled: bool,
    ) -> ConfigSnapshot {
        let snapshot = ConfigSnapshot::resolve(&settings, feature_enabled);

        self.state.store(Arc::new(StoreState {
            entries,
            settings,
            snapshot: snapshot.clone(),
        }));

        tracing::info!(
            message = %snapshot.message,
            version = %snapshot.version,
            environment = %snapshot.environment,
            feature_enabled = snapshot.feature_enabled,
            "configuration snapshot replaced"
        );

        snapshot
    }
}
