//! Service layer
//!
//! Configuration store, feature flag gate, refresh poller and the background
//! jobs that keep them current.

pub mod config_logger;
pub mod config_store;
pub mod feature_flag_gate;
pub mod job_scheduler;
pub mod refresh_poller;

pub use config_logger::ConfigLoggerJob;
pub use config_store::ConfigStore;
pub use feature_flag_gate::FeatureFlagGate;
pub use job_scheduler::{JobInfo, JobScheduler, ScheduledJob};
pub use refresh_poller::{PollerState, RefreshPoller, RefreshStats};
