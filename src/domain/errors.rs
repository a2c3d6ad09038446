//! Errors raised at the boundary with external configuration clients.

use thiserror::Error;

/// Errors a configuration provider can return while fetching entries.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Failed to read configuration source {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration document: {0}")]
    Parse(String),

    #[error("Request to configuration endpoint failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration endpoint returned status {0}")]
    Status(u16),

    #[error("Invalid connection string: {0}")]
    InvalidConnectionString(String),

    #[error("Configuration provider unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<serde_yaml::Error> for ProviderError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Errors a feature manager can return while evaluating a flag.
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("Feature flags have not been loaded yet")]
    NotLoaded,

    #[error("Invalid value for feature flag '{name}': {value}")]
    InvalidValue { name: String, value: String },

    #[error("Feature provider error: {0}")]
    Provider(#[from] ProviderError),
}
