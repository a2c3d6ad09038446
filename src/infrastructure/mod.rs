//! Infrastructure layer module
//!
//! Adapters and ambient plumbing:
//! - Configuration providers (file, HTTP, in-memory)
//! - Feature manager backed by the provider
//! - Service configuration loading
//! - Logging infrastructure
//!
//! Implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod features;
pub mod logging;
pub mod providers;
