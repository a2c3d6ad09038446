use crate::domain::errors::FeatureError;
use crate::domain::models::FlagTable;
use async_trait::async_trait;

/// Port for the external feature flag client
///
/// The client offers a blocking evaluation and a non-blocking one. Callers
/// decide how to combine them; see `FeatureFlagGate`.
#[async_trait]
pub trait FeatureManager: Send + Sync {
    /// Evaluate a flag without awaiting anything
    fn is_enabled(&self, feature: &str) -> Result<bool, FeatureError>;

    /// Evaluate a flag, possibly contacting the remote store
    async fn is_enabled_async(&self, feature: &str) -> Result<bool, FeatureError>;

    /// Accept the flag table produced by the latest successful refresh.
    /// Clients that track flags on their own can ignore it.
    fn update_flags(&self, _flags: FlagTable) {}
}
