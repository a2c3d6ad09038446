//! Configuration provider backed by a YAML or JSON document on disk.
//!
//! The document is re-read on every fetch, so editing the file is how a
//! local setup "changes the remote store".

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;

use super::document::{flatten_document, KeySelectors};
use crate::domain::errors::ProviderError;
use crate::domain::models::ConfigEntries;
use crate::domain::ports::ConfigurationProvider;

pub struct FileProvider {
    path: PathBuf,
    selectors: KeySelectors,
    name: String,
}

impl FileProvider {
    pub fn new(path: impl Into<PathBuf>, selectors: KeySelectors) -> Self {
        let path = path.into();
        let name = format!("file:{}", path.display());
        Self {
            path,
            selectors,
            name,
        }
    }

    fn is_json(&self) -> bool {
        self.path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    }
}

#[async_trait]
impl ConfigurationProvider for FileProvider {
    async fn fetch(&self) -> Result<ConfigEntries, ProviderError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ProviderError::Io {
                path: self.path.display().to_string(),
                source,
            })?;

        let document: Value = if self.is_json() {
            serde_json::from_str(&raw)?
        } else if raw.trim().is_empty() {
            Value::Null
        } else {
            serde_yaml::from_str(&raw)?
        };

        Ok(self.selectors.apply(flatten_document(&document)))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
