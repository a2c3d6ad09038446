//! Application layer: wiring the service together.

pub mod bootstrap;

pub use bootstrap::Application;
