use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::document::KeySelectors;
use crate::domain::errors::ProviderError;
use crate::domain::models::ConfigEntries;
use crate::domain::ports::ConfigurationProvider;

/// Process-local provider. Useful for demos without a backing store and
/// for driving refreshes from tests.
pub struct InMemoryProvider {
    entries: RwLock<ConfigEntries>,
    selectors: KeySelectors,
    unavailable: AtomicBool,
}

impl InMemoryProvider {
    pub fn new(entries: ConfigEntries) -> Self {
        Self::with_selectors(entries, KeySelectors::all())
    }

    pub fn with_selectors(entries: ConfigEntries, selectors: KeySelectors) -> Self {
        Self {
            entries: RwLock::new(entries),
            selectors,
            unavailable: AtomicBool::new(false),
        }
    }

    pub async fn set(&self, key: &str, value: &str) {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
    }

    pub async fn remove(&self, key: &str) {
        self.entries.write().await.remove(key);
    }

    /// Simulate an outage: every fetch fails until cleared.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl ConfigurationProvider for InMemoryProvider {
    async fn fetch(&self) -> Result<ConfigEntries, ProviderError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ProviderError::Unavailable(
                "in-memory provider marked unavailable".to_string(),
            ));
        }

        let entries = self.entries.read().await.clone();
        Ok(self.selectors.apply(entries))
    }

    fn name(&self) -> &str {
        "memory"
    }
}
