//! Service wiring.
//!
//! provider → feature manager → gate → store → poller → jobs → router.

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;

use crate::adapters::http::{router, AppState, ConfigHttpServer, HttpServerConfig};
use crate::domain::models::Config;
use crate::domain::ports::ConfigurationProvider;
use crate::infrastructure::features::ProviderFeatureManager;
use crate::infrastructure::providers::build_provider;
use crate::services::{
    ConfigLoggerJob, ConfigStore, FeatureFlagGate, JobScheduler, RefreshPoller,
};

/// A fully wired service, ready to serve.
pub struct Application {
    state: Arc<AppState>,
    scheduler: JobScheduler,
    server: HttpServerConfig,
}

impl Application {
    /// Wire the service around the provider selected in `config`.
    pub async fn build(config: &Config) -> Result<Self> {
        let provider = build_provider(&config.provider)
            .context("Failed to create configuration provider")?;
        Ok(Self::with_provider(config, provider).await)
    }

    /// Wire the service around an existing provider and run the initial
    /// refresh. A failing provider leaves the defaults in place.
    pub async fn with_provider(config: &Config, provider: Arc<dyn ConfigurationProvider>) -> Self {
        let manager = Arc::new(ProviderFeatureManager::new(provider.clone()));
        let gate = Arc::new(FeatureFlagGate::new(manager));
        let store = Arc::new(ConfigStore::new(config.defaults.clone()));
        let poller = Arc::new(RefreshPoller::new(
            provider,
            store.clone(),
            gate.clone(),
            config.feature.name.clone(),
        ));

        let keys = poller.refresh().await;
        tracing::info!(keys = keys.len(), "initial configuration loaded");

        let mut scheduler = JobScheduler::new();
        if config.schedule.enabled {
            scheduler.register(poller.clone(), config.schedule.refresh_interval());
            scheduler.register(
                Arc::new(ConfigLoggerJob::new(store.clone())),
                config.schedule.log_interval(),
            );
        }

        let state = Arc::new(AppState {
            service_name: config.service_name.clone(),
            feature_name: config.feature.name.clone(),
            store,
            gate,
            poller,
        });

        Self {
            state,
            scheduler,
            server: HttpServerConfig::from(&config.server),
        }
    }

    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    pub fn router(&self) -> Router {
        router(self.state.clone(), self.server.enable_cors)
    }

    pub const fn scheduler(&self) -> &JobScheduler {
        &self.scheduler
    }

    /// Start the jobs, serve until `shutdown` resolves, then stop the jobs.
    pub async fn run<F>(mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.scheduler.start();

        let server = ConfigHttpServer::new(self.state.clone(), self.server.clone());
        let served = server
            .serve_with_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!(e))
            .context("HTTP server failed");

        self.scheduler.shutdown().await;
        served
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ConfigEntries;
    use crate::infrastructure::providers::InMemoryProvider;

    #[tokio::test]
    async fn test_initial_refresh_populates_store() {
        let entries: ConfigEntries = [
            ("app.message".to_string(), "Hello".to_string()),
            ("feature-management.test-feature".to_string(), "true".to_string()),
            ("app.message.feature-enabled".to_string(), "Hello (flag on)".to_string()),
        ]
        .into_iter()
        .collect();

        let app =
            Application::with_provider(&Config::default(), Arc::new(InMemoryProvider::new(entries)))
                .await;

        let snapshot = app.state().store.current();
        assert_eq!(snapshot.message, "Hello (flag on)");
        assert!(snapshot.feature_enabled);
        assert_eq!(app.scheduler().list().len(), 2);
    }

    #[tokio::test]
    async fn test_unavailable_provider_keeps_defaults() {
        let provider = Arc::new(InMemoryProvider::new(ConfigEntries::new()));
        provider.set_unavailable(true);

        let mut config = Config::default();
        config.schedule.enabled = false;
        let app = Application::with_provider(&config, provider).await;

        let snapshot = app.state().store.current();
        assert_eq!(snapshot.message, "Default message");
        assert_eq!(snapshot.version, "1.0.0");
        assert!(!snapshot.feature_enabled);
        assert!(app.scheduler().list().is_empty());
    }
}
