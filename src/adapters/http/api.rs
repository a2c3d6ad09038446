//! `/api` routes: current values, flag state, health.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;
use serde::Serialize;

use super::{local_timestamp, timestamp, AppState, FEATURE_FLAG_SOURCE, MESSAGE_SOURCE};
use crate::domain::models::ConfigSnapshot;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
    pub version: String,
    pub environment: String,
    pub timestamp: String,
    pub source: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlagResponse {
    pub feature_name: String,
    pub enabled: bool,
    pub timestamp: String,
    pub source: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: String,
    pub timestamp: String,
}

/// Refresh loop and flag evaluation counters.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshStatusResponse {
    pub state: &'static str,
    pub total_refreshes: u64,
    pub failed_refreshes: u64,
    pub last_success: Option<String>,
    pub flag_failures: u64,
    pub timestamp: String,
}

pub async fn get_message(State(state): State<Arc<AppState>>) -> Json<MessageResponse> {
    let snapshot = state.store.current();
    Json(MessageResponse {
        message: snapshot.message,
        version: snapshot.version,
        environment: snapshot.environment,
        timestamp: timestamp(),
        source: MESSAGE_SOURCE,
    })
}

/// Shared with `/test/test-feature-enabled`.
pub async fn get_feature_flag(State(state): State<Arc<AppState>>) -> Json<FeatureFlagResponse> {
    let enabled = state.gate.is_enabled(&state.feature_name).await;
    Json(FeatureFlagResponse {
        feature_name: state.feature_name.clone(),
        enabled,
        timestamp: timestamp(),
        source: FEATURE_FLAG_SOURCE,
    })
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<ConfigSnapshot> {
    Json(state.store.current())
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "UP",
        service: state.service_name.clone(),
        timestamp: timestamp(),
    })
}

pub async fn refresh_status(State(state): State<Arc<AppState>>) -> Json<RefreshStatusResponse> {
    let stats = state.poller.stats();
    Json(RefreshStatusResponse {
        state: state.poller.state().as_str(),
        total_refreshes: stats.total,
        failed_refreshes: stats.failed,
        last_success: stats.last_success.as_ref().map(local_timestamp),
        flag_failures: state.gate.failure_count(),
        timestamp: timestamp(),
    })
}
