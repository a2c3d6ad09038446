//! HTTP API over the configuration store.
//!
//! Handlers are stateless projections of [`AppState`]; every route answers
//! 200 with a JSON body.

pub mod api;
pub mod server;

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone};

use crate::services::{ConfigStore, FeatureFlagGate, RefreshPoller};

pub use server::{router, ConfigHttpServer, HttpServerConfig};

/// Source label for message responses.
pub const MESSAGE_SOURCE: &str = "App Configuration (refreshable snapshot)";

/// Source label for feature flag responses.
pub const FEATURE_FLAG_SOURCE: &str = "App Configuration Feature Flag";

/// Shared state handed to every handler.
pub struct AppState {
    pub service_name: String,
    pub feature_name: String,
    pub store: Arc<ConfigStore>,
    pub gate: Arc<FeatureFlagGate>,
    pub poller: Arc<RefreshPoller>,
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Local date-time without offset, millisecond precision.
pub fn timestamp() -> String {
    local_timestamp(&Local::now())
}

/// Render any instant in the same local form as [`timestamp`].
pub fn local_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    at.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string()
}
