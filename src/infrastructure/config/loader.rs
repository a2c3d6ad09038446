use std::path::Path;

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::{Config, ProviderKind};

/// Default service config file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "appconfig-demo.yaml";

/// Prefix for environment overrides, nested with `__`
pub const ENV_PREFIX: &str = "APPCONFIG_DEMO_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {name}: {value}. Must be greater than zero")]
    InvalidInterval { name: &'static str, value: u64 },

    #[error("Invalid port: 0")]
    InvalidPort,

    #[error("Feature flag name cannot be empty")]
    EmptyFeatureName,

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Provider path cannot be empty for the file provider")]
    EmptyProviderPath,

    #[error("The http provider needs an endpoint or a connection string")]
    MissingEndpoint,

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. `path`, or `appconfig-demo.yaml` in the working directory (optional)
    /// 3. Environment variables (`APPCONFIG_DEMO_*`, `__` for nesting)
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

        if path.is_some() && !file.exists() {
            anyhow::bail!("Config file not found: {}", file.display());
        }

        let config: Config = Self::figment(file)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load configuration from {}", file.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, without environment overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Self::figment(path.as_ref())
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.as_ref().display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment(file: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(file))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.server.port == 0 {
            return Err(ConfigError::InvalidPort);
        }

        if config.schedule.refresh_interval_ms == 0 {
            return Err(ConfigError::InvalidInterval {
                name: "schedule.refresh_interval_ms",
                value: 0,
            });
        }
        if config.schedule.log_interval_ms == 0 {
            return Err(ConfigError::InvalidInterval {
                name: "schedule.log_interval_ms",
                value: 0,
            });
        }

        if config.feature.name.trim().is_empty() {
            return Err(ConfigError::EmptyFeatureName);
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        match config.provider.kind {
            ProviderKind::File if config.provider.path.as_os_str().is_empty() => {
                return Err(ConfigError::EmptyProviderPath);
            }
            ProviderKind::Http
                if config.provider.endpoint.is_none()
                    && config.provider.connection_string.is_none() =>
            {
                return Err(ConfigError::MissingEndpoint);
            }
            ProviderKind::Http if config.provider.timeout_ms == 0 => {
                return Err(ConfigError::InvalidInterval {
                    name: "provider.timeout_ms",
                    value: 0,
                });
            }
            _ => {}
        }

        if config.provider.selectors.iter().any(String::is_empty) {
            return Err(ConfigError::ValidationFailed(
                "provider selectors cannot contain empty prefixes".to_string(),
            ));
        }

        Ok(())
    }
}
