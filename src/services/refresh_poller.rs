//! Pulls configuration from the provider and reconciles the store.
//!
//! Runs on a fixed delay from the job scheduler or on demand from the
//! manual-refresh endpoint. Overlapping refreshes are not serialized; the
//! last one to finish wins.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::config_store::ConfigStore;
use super::feature_flag_gate::FeatureFlagGate;
use super::job_scheduler::ScheduledJob;
use crate::domain::errors::ProviderError;
use crate::domain::models::{diff_keys, AppSettings, FlagTable, RefreshOutcome};
use crate::domain::ports::ConfigurationProvider;

/// Whether a refresh is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Polling,
}

impl PollerState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Polling => "polling",
        }
    }
}

/// Point-in-time refresh counters.
#[derive(Debug, Clone)]
pub struct RefreshStats {
    pub total: u64,
    pub failed: u64,
    pub last_success: Option<DateTime<Utc>>,
}

/// Counts one in-flight refresh until dropped, however the refresh exits.
struct PollingGuard<'a>(&'a AtomicUsize);

impl<'a> PollingGuard<'a> {
    fn enter(in_flight: &'a AtomicUsize) -> Self {
        in_flight.fetch_add(1, Ordering::SeqCst);
        Self(in_flight)
    }
}

impl Drop for PollingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Refreshes [`ConfigStore`] from a [`ConfigurationProvider`].
pub struct RefreshPoller {
    provider: Arc<dyn ConfigurationProvider>,
    store: Arc<ConfigStore>,
    gate: Arc<FeatureFlagGate>,
    feature_name: String,
    in_flight: AtomicUsize,
    total: AtomicU64,
    failed: AtomicU64,
    last_success: ArcSwapOption<DateTime<Utc>>,
}

impl RefreshPoller {
    pub fn new(
        provider: Arc<dyn ConfigurationProvider>,
        store: Arc<ConfigStore>,
        gate: Arc<FeatureFlagGate>,
        feature_name: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            store,
            gate,
            feature_name: feature_name.into(),
            in_flight: AtomicUsize::new(0),
            total: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            last_success: ArcSwapOption::empty(),
        }
    }

    /// Fetch, publish the flag table and, when any key changed, swap in a new
    /// snapshot.
    ///
    /// Returns the changed keys. On a provider error the store is left as it
    /// was and the error is returned.
    pub async fn try_refresh(&self) -> Result<BTreeSet<String>, ProviderError> {
        let _guard = PollingGuard::enter(&self.in_flight);
        self.total.fetch_add(1, Ordering::Relaxed);

        tracing::debug!(provider = self.provider.name(), "checking for configuration changes");

        let entries = match self.provider.fetch().await {
            Ok(entries) => entries,
            Err(e) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                return Err(e);
            }
        };

        let changed = diff_keys(&self.store.entries(), &entries);
        self.last_success.store(Some(Arc::new(Utc::now())));

        // Every successful fetch publishes flags, changed or not
        self.gate.update_flags(FlagTable::from_entries(&entries));

        if changed.is_empty() {
            tracing::debug!("no configuration changes detected");
            return Ok(changed);
        }

        let settings = AppSettings::bind(&entries, self.store.defaults());
        let feature_enabled = self.gate.is_enabled(&self.feature_name).await;
        self.store.replace(entries, settings, feature_enabled);

        tracing::info!(keys = ?changed, "refresh detected changes in keys");
        Ok(changed)
    }

    /// Like [`Self::try_refresh`] but logs and swallows provider errors.
    pub async fn refresh(&self) -> BTreeSet<String> {
        match self.try_refresh().await {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    error = %e,
                    "error during configuration refresh, keeping previous snapshot"
                );
                BTreeSet::new()
            }
        }
    }

    /// Refresh and report the snapshots on either side.
    pub async fn refresh_with_outcome(&self) -> RefreshOutcome {
        let before = self.store.current();
        let refreshed_keys = self.refresh().await;
        let after = self.store.current();

        RefreshOutcome::new(refreshed_keys, before, after)
    }

    pub fn state(&self) -> PollerState {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            PollerState::Polling
        } else {
            PollerState::Idle
        }
    }

    pub fn stats(&self) -> RefreshStats {
        RefreshStats {
            total: self.total.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            last_success: self.last_success.load_full().map(|at| *at),
        }
    }
}

#[async_trait]
impl ScheduledJob for RefreshPoller {
    fn name(&self) -> &str {
        "config-refresh"
    }

    async fn run(&self) {
        self.refresh().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::FeatureError;
    use crate::domain::models::snapshot::{FEATURE_ENABLED_MESSAGE_KEY, MESSAGE_KEY, VERSION_KEY};
    use crate::domain::models::{ConfigEntries, DefaultsConfig};
    use crate::domain::ports::FeatureManager;
    use crate::infrastructure::features::ProviderFeatureManager;
    use crate::infrastructure::providers::InMemoryProvider;
    use mockall::mock;
    use mockall::Sequence;

    mock! {
        pub Features {}

        #[async_trait::async_trait]
        impl FeatureManager for Features {
            fn is_enabled(&self, feature: &str) -> Result<bool, FeatureError>;
            async fn is_enabled_async(&self, feature: &str) -> Result<bool, FeatureError>;
            fn update_flags(&self, flags: FlagTable);
        }
    }

    fn entries(pairs: &[(&str, &str)]) -> ConfigEntries {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn features(enabled: bool) -> Arc<FeatureFlagGate> {
        let mut manager = MockFeatures::new();
        manager.expect_is_enabled().returning(move |_| Ok(enabled));
        manager.expect_update_flags().return_const(());
        Arc::new(FeatureFlagGate::new(Arc::new(manager)))
    }

    fn build(
        provider: Arc<InMemoryProvider>,
        gate: Arc<FeatureFlagGate>,
    ) -> (RefreshPoller, Arc<ConfigStore>) {
        let store = Arc::new(ConfigStore::new(DefaultsConfig::default()));
        let poller = RefreshPoller::new(provider, store.clone(), gate, "test-feature");
        (poller, store)
    }

    #[tokio::test]
    async fn test_refresh_applies_changed_keys() {
        let provider = Arc::new(InMemoryProvider::new(entries(&[
            (MESSAGE_KEY, "Hello"),
            (VERSION_KEY, "2.0.0"),
        ])));

        let (poller, store) = build(provider, features(false));
        let keys = poller.try_refresh().await.unwrap();

        assert_eq!(keys.len(), 2);
        assert!(keys.contains(MESSAGE_KEY));
        assert_eq!(store.current().message, "Hello");
        assert_eq!(store.current().version, "2.0.0");
        assert_eq!(poller.state(), PollerState::Idle);
    }

    #[tokio::test]
    async fn test_refresh_without_changes_keeps_snapshot() {
        let provider = Arc::new(InMemoryProvider::new(entries(&[(MESSAGE_KEY, "Hello")])));

        let (poller, _store) = build(provider, features(false));
        poller.refresh().await;

        let outcome = poller.refresh_with_outcome().await;
        assert!(outcome.refreshed_keys.is_empty());
        assert!(!outcome.changed);
        assert_eq!(outcome.before, outcome.after);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_snapshot() {
        let provider = Arc::new(InMemoryProvider::new(entries(&[(MESSAGE_KEY, "Hello")])));

        let (poller, store) = build(provider.clone(), features(false));
        poller.refresh().await;
        let before = store.current();

        provider.set(MESSAGE_KEY, "Changed").await;
        provider.set_unavailable(true);

        assert!(poller.try_refresh().await.is_err());
        assert_eq!(store.current(), before);
        assert_eq!(store.current().message, "Hello");

        let stats = poller.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.failed, 1);
        assert!(stats.last_success.is_some());
    }

    #[tokio::test]
    async fn test_refresh_swallows_errors() {
        let provider = Arc::new(InMemoryProvider::new(entries(&[(MESSAGE_KEY, "Hello")])));
        provider.set_unavailable(true);

        let (poller, store) = build(provider, features(false));
        let outcome = poller.refresh_with_outcome().await;

        assert!(outcome.refreshed_keys.is_empty());
        assert!(!outcome.changed);
        assert_eq!(store.current().message, "Default message");
        assert_eq!(poller.state(), PollerState::Idle);
    }

    #[tokio::test]
    async fn test_removed_key_falls_back_to_default() {
        let provider = Arc::new(InMemoryProvider::new(entries(&[(VERSION_KEY, "2.0.0")])));

        let (poller, store) = build(provider.clone(), features(false));
        poller.refresh().await;
        assert_eq!(store.current().version, "2.0.0");

        provider.remove(VERSION_KEY).await;
        let outcome = poller.refresh_with_outcome().await;

        assert!(outcome.refreshed_keys.contains(VERSION_KEY));
        assert!(outcome.changed);
        assert_eq!(outcome.after.version, "1.0.0");
    }

    #[tokio::test]
    async fn test_flag_change_switches_message() {
        let provider = Arc::new(InMemoryProvider::new(entries(&[
            (MESSAGE_KEY, "Hello"),
            (FEATURE_ENABLED_MESSAGE_KEY, "Hello (flag on)"),
            ("feature-management.test-feature", "false"),
        ])));

        let mut manager = MockFeatures::new();
        let mut seq = Sequence::new();
        manager.expect_update_flags().times(2).return_const(());
        manager
            .expect_is_enabled()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(false));
        manager
            .expect_is_enabled()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(true));
        let gate = Arc::new(FeatureFlagGate::new(Arc::new(manager)));

        let (poller, store) = build(provider.clone(), gate);
        poller.refresh().await;
        assert_eq!(store.message(), "Hello");

        provider.set("feature-management.test-feature", "true").await;
        let outcome = poller.refresh_with_outcome().await;

        assert!(outcome.changed);
        assert_eq!(
            outcome.refreshed_keys.iter().collect::<Vec<_>>(),
            vec!["feature-management.test-feature"]
        );
        assert_eq!(outcome.before.message, "Hello");
        assert_eq!(outcome.after.message, "Hello (flag on)");
        assert!(outcome.after.feature_enabled);
    }

    #[tokio::test]
    async fn test_empty_first_fetch_loads_sync_flag_path() {
        let provider = Arc::new(InMemoryProvider::new(ConfigEntries::new()));
        let manager = Arc::new(ProviderFeatureManager::new(provider.clone()));
        let gate = Arc::new(FeatureFlagGate::new(manager.clone()));

        let (poller, _store) = build(provider, gate.clone());
        let keys = poller.try_refresh().await.unwrap();

        assert!(keys.is_empty());
        assert!(!manager.is_enabled("test-feature").unwrap());
        assert!(!gate.is_enabled("test-feature").await);
        assert_eq!(gate.failure_count(), 0);
    }

    #[tokio::test]
    async fn test_unchanged_refresh_still_publishes_flags() {
        let provider = Arc::new(InMemoryProvider::new(entries(&[(
            "feature-management.test-feature",
            "true",
        )])));

        let mut manager = MockFeatures::new();
        manager.expect_update_flags().times(2).return_const(());
        manager.expect_is_enabled().returning(|_| Ok(true));
        let gate = Arc::new(FeatureFlagGate::new(Arc::new(manager)));

        let (poller, _store) = build(provider, gate);
        assert_eq!(poller.try_refresh().await.unwrap().len(), 1);
        assert!(poller.try_refresh().await.unwrap().is_empty());
    }

    #[test]
    fn test_state_stays_polling_until_every_refresh_exits() {
        let provider = Arc::new(InMemoryProvider::new(ConfigEntries::new()));
        let (poller, _store) = build(provider, features(false));
        assert_eq!(poller.state(), PollerState::Idle);

        let scheduled = PollingGuard::enter(&poller.in_flight);
        let manual = PollingGuard::enter(&poller.in_flight);
        assert_eq!(poller.state(), PollerState::Polling);

        drop(manual);
        assert_eq!(poller.state(), PollerState::Polling);

        drop(scheduled);
        assert_eq!(poller.state(), PollerState::Idle);
    }
}
