//! Configuration provider that fetches a JSON document over HTTP.
//!
//! The endpoint may return either a (possibly nested) JSON object, which is
//! flattened like a file document, or a key/value listing of the form
//! `{"items": [{"key": "...", "value": "..."}]}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::document::{flatten_document, KeySelectors};
use crate::domain::errors::ProviderError;
use crate::domain::models::ConfigEntries;
use crate::domain::ports::ConfigurationProvider;

/// Parsed `Endpoint=...;Id=...;Secret=...` connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionString {
    pub endpoint: String,
    pub id: Option<String>,
    pub secret: Option<String>,
}

impl ConnectionString {
    pub fn parse(raw: &str) -> Result<Self, ProviderError> {
        let mut endpoint = None;
        let mut id = None;
        let mut secret = None;

        for segment in raw.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let (key, value) = segment.split_once('=').ok_or_else(|| {
                ProviderError::InvalidConnectionString(format!("segment '{segment}' has no '='"))
            })?;

            match key.trim().to_ascii_lowercase().as_str() {
                "endpoint" => endpoint = Some(value.trim().to_string()),
                "id" => id = Some(value.trim().to_string()),
                "secret" => secret = Some(value.trim().to_string()),
                other => {
                    return Err(ProviderError::InvalidConnectionString(format!(
                        "unknown segment '{other}'"
                    )))
                }
            }
        }

        let endpoint = endpoint
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ProviderError::InvalidConnectionString("missing Endpoint".to_string()))?;

        Ok(Self {
            endpoint,
            id,
            secret,
        })
    }
}

#[derive(Debug, Deserialize)]
struct KeyValueListing {
    items: Vec<KeyValueItem>,
}

#[derive(Debug, Deserialize)]
struct KeyValueItem {
    key: String,
    #[serde(default)]
    value: Option<String>,
}

/// Credentials attached to each request.
#[derive(Debug, Clone)]
enum Credentials {
    None,
    Bearer(String),
    Basic { id: String, secret: Option<String> },
}

pub struct HttpProvider {
    http: Client,
    endpoint: String,
    credentials: Credentials,
    selectors: KeySelectors,
}

impl HttpProvider {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
        selectors: KeySelectors,
    ) -> Result<Self, ProviderError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            credentials: api_key.map_or(Credentials::None, Credentials::Bearer),
            selectors,
        })
    }

    /// Build from a connection string; `Id`/`Secret` become basic auth.
    pub fn from_connection_string(
        raw: &str,
        timeout: Duration,
        selectors: KeySelectors,
    ) -> Result<Self, ProviderError> {
        let parsed = ConnectionString::parse(raw)?;
        let mut provider = Self::new(parsed.endpoint, None, timeout, selectors)?;
        if let Some(id) = parsed.id {
            provider.credentials = Credentials::Basic {
                id,
                secret: parsed.secret,
            };
        }
        Ok(provider)
    }

    fn decode(body: Value) -> Result<ConfigEntries, ProviderError> {
        if body.get("items").is_some_and(Value::is_array) {
            let listing: KeyValueListing = serde_json::from_value(body)?;
            return Ok(listing
                .items
                .into_iter()
                .filter_map(|item| item.value.map(|value| (item.key, value)))
                .collect());
        }
        Ok(flatten_document(&body))
    }
}

#[async_trait]
impl ConfigurationProvider for HttpProvider {
    async fn fetch(&self) -> Result<ConfigEntries, ProviderError> {
        let request = self
            .http
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .header("User-Agent", "appconfig-demo");

        let request = match &self.credentials {
            Credentials::None => request,
            Credentials::Bearer(token) => request.bearer_auth(token),
            Credentials::Basic { id, secret } => request.basic_auth(id, secret.as_ref()),
        };

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body: Value = response.json().await?;
        Ok(self.selectors.apply(Self::decode(body)?))
    }

    fn name(&self) -> &str {
        &self.endpoint
    }
}
