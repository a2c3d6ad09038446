//! Configuration provider adapters.

pub mod document;
pub mod file;
pub mod http;
pub mod memory;

use std::sync::Arc;
use std::time::Duration;

pub use document::{flatten_document, KeySelectors};
pub use file::FileProvider;
pub use http::{ConnectionString, HttpProvider};
pub use memory::InMemoryProvider;

use crate::domain::errors::ProviderError;
use crate::domain::models::{ProviderConfig, ProviderKind};
use crate::domain::ports::ConfigurationProvider;

/// Build the provider selected by `config.kind`.
pub fn build_provider(
    config: &ProviderConfig,
) -> Result<Arc<dyn ConfigurationProvider>, ProviderError> {
    let selectors = KeySelectors::new(config.selectors.iter().cloned());

    let provider: Arc<dyn ConfigurationProvider> = match config.kind {
        ProviderKind::File => Arc::new(FileProvider::new(config.path.clone(), selectors)),
        ProviderKind::Memory => Arc::new(InMemoryProvider::with_selectors(
            config.values.clone().into_iter().collect(),
            selectors,
        )),
        ProviderKind::Http => {
            let timeout = Duration::from_millis(config.timeout_ms);
            if let Some(raw) = &config.connection_string {
                Arc::new(HttpProvider::from_connection_string(raw, timeout, selectors)?)
            } else {
                let endpoint = config.endpoint.clone().ok_or_else(|| {
                    ProviderError::InvalidConnectionString(
                        "http provider needs an endpoint or connection string".to_string(),
                    )
                })?;
                Arc::new(HttpProvider::new(
                    endpoint,
                    config.api_key.clone(),
                    timeout,
                    selectors,
                )?)
            }
        }
    };

    tracing::info!(kind = ?config.kind, provider = provider.name(), "configuration provider ready");
    Ok(provider)
}
