//! Domain layer for the configuration demo service
//!
//! Holds the snapshot models, the service configuration model and the port
//! traits that external configuration and feature-flag clients implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{FeatureError, ProviderError};
