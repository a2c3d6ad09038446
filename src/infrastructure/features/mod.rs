//! Feature manager adapters.

pub mod provider_feature_manager;

pub use provider_feature_manager::ProviderFeatureManager;
