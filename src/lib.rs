//! appconfig-demo - refreshable configuration and feature flags over HTTP
//!
//! A small service that pulls key/value configuration and feature flags from
//! a remote provider, keeps the latest snapshot in memory, refreshes it on a
//! fixed delay, and exposes it over a JSON API.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors, and the provider / feature manager ports
//! - **Service Layer** (`services`): store, flag gate, refresh poller, scheduled jobs
//! - **Infrastructure Layer** (`infrastructure`): provider adapters, config, logging
//! - **Adapters** (`adapters`): the axum HTTP API
//! - **Application Layer** (`application`): wiring and lifecycle
//!
//! # Example
//!
//! ```ignore
//! use appconfig_demo::{Application, ConfigLoader};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load(None)?;
//!     let app = Application::build(&config).await?;
//!     app.run(async { let _ = tokio::signal::ctrl_c().await; }).await
//! }
//! ```

pub mod adapters;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use application::Application;
pub use domain::models::{Config, ConfigSnapshot, FlagTable, RefreshOutcome};
pub use domain::ports::{ConfigurationProvider, FeatureManager};
pub use domain::{FeatureError, ProviderError};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{ConfigStore, FeatureFlagGate, JobScheduler, RefreshPoller};
