use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;

use crate::domain::errors::FeatureError;
use crate::domain::models::FlagTable;
use crate::domain::ports::{ConfigurationProvider, FeatureManager};

/// Flag client backed by the configuration provider.
///
/// The synchronous path answers from the table published by the last
/// refresh and fails with [`FeatureError::NotLoaded`] until one arrives.
/// The asynchronous path reads the flag live from the provider.
pub struct ProviderFeatureManager {
    provider: Arc<dyn ConfigurationProvider>,
    flags: ArcSwapOption<FlagTable>,
}

impl ProviderFeatureManager {
    pub fn new(provider: Arc<dyn ConfigurationProvider>) -> Self {
        Self {
            provider,
            flags: ArcSwapOption::empty(),
        }
    }
}

#[async_trait]
impl FeatureManager for ProviderFeatureManager {
    fn is_enabled(&self, feature: &str) -> Result<bool, FeatureError> {
        let table = self.flags.load();
        let table = table.as_ref().ok_or(FeatureError::NotLoaded)?;
        Ok(table.get(feature).unwrap_or(false))
    }

    async fn is_enabled_async(&self, feature: &str) -> Result<bool, FeatureError> {
        let entries = self.provider.fetch().await?;
        Ok(FlagTable::from_entries(&entries).get(feature).unwrap_or(false))
    }

    fn update_flags(&self, flags: FlagTable) {
        tracing::debug!(flags = flags.len(), "feature flag table updated");
        self.flags.store(Some(Arc::new(flags)));
    }
}
