pub mod config;
pub mod flags;
pub mod snapshot;

pub use config::{
    Config, DefaultsConfig, FeatureConfig, LogFormat, LoggingConfig, ProviderConfig, ProviderKind,
    RotationPolicy, ScheduleConfig, ServerConfig,
};
pub use flags::{FlagTable, FEATURE_FLAG_PREFIX};
pub use snapshot::{diff_keys, AppSettings, ConfigEntries, ConfigSnapshot, RefreshOutcome};
