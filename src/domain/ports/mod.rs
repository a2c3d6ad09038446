//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces implemented by infrastructure adapters:
//! - ConfigurationProvider: remote key/value store
//! - FeatureManager: feature flag client with sync and async evaluation
//!
//! Services depend only on these traits, never on a concrete client.

pub mod configuration_provider;
pub mod feature_manager;

pub use configuration_provider::ConfigurationProvider;
pub use feature_manager::FeatureManager;
