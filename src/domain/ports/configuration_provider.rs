use crate::domain::errors::ProviderError;
use crate::domain::models::ConfigEntries;
use async_trait::async_trait;

/// Port for the remote configuration store
#[async_trait]
pub trait ConfigurationProvider: Send + Sync {
    /// Fetch every selected key/value the store currently holds
    async fn fetch(&self) -> Result<ConfigEntries, ProviderError>;

    /// Human-readable name for logging
    fn name(&self) -> &str;
}
