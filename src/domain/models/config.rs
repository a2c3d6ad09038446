use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for the demo service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Service name reported by the health endpoint
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Remote configuration provider connection
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Fallback values for keys missing from the provider
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Feature flag selection
    #[serde(default)]
    pub feature: FeatureConfig,

    /// Background job intervals
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_service_name() -> String {
    "App Config Demo".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            server: ServerConfig::default(),
            provider: ProviderConfig::default(),
            defaults: DefaultsConfig::default(),
            feature: FeatureConfig::default(),
            schedule: ScheduleConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Whether to enable permissive CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    8080
}

const fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_cors: true,
        }
    }
}

/// Which adapter backs the configuration provider port
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// YAML or JSON document on disk, re-read on every refresh
    File,
    /// JSON document served over HTTP
    Http,
    /// Process-local map seeded from `provider.values`
    Memory,
}

/// Remote configuration provider connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProviderConfig {
    #[serde(default = "default_provider_kind")]
    pub kind: ProviderKind,

    /// Document path for the file provider
    #[serde(default = "default_provider_path")]
    pub path: PathBuf,

    /// Endpoint URL for the HTTP provider
    #[serde(default)]
    pub endpoint: Option<String>,

    /// `Endpoint=...;Id=...;Secret=...` form, takes precedence over `endpoint`
    #[serde(default)]
    pub connection_string: Option<String>,

    /// Bearer token sent by the HTTP provider
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout for the HTTP provider
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Key prefixes to load; an empty list selects every key
    #[serde(default = "default_selectors")]
    pub selectors: Vec<String>,

    /// Seed values for the memory provider
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

const fn default_provider_kind() -> ProviderKind {
    ProviderKind::File
}

fn default_provider_path() -> PathBuf {
    PathBuf::from("config/remote.yaml")
}

const fn default_timeout_ms() -> u64 {
    10_000
}

fn default_selectors() -> Vec<String> {
    vec!["app.".to_string(), "feature-management.".to_string()]
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: default_provider_kind(),
            path: default_provider_path(),
            endpoint: None,
            connection_string: None,
            api_key: None,
            timeout_ms: default_timeout_ms(),
            selectors: default_selectors(),
            values: BTreeMap::new(),
        }
    }
}

/// Values used when the provider does not supply a key
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct DefaultsConfig {
    #[serde(default = "default_message")]
    pub message: String,

    #[serde(default = "default_feature_enabled_message")]
    pub feature_enabled_message: String,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_message() -> String {
    "Default message".to_string()
}

fn default_feature_enabled_message() -> String {
    "Feature-enabled message!".to_string()
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_environment() -> String {
    "local".to_string()
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            message: default_message(),
            feature_enabled_message: default_feature_enabled_message(),
            version: default_version(),
            environment: default_environment(),
        }
    }
}

/// Feature flag selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FeatureConfig {
    /// Flag that switches the message variant
    #[serde(default = "default_feature_name")]
    pub name: String,
}

fn default_feature_name() -> String {
    "test-feature".to_string()
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            name: default_feature_name(),
        }
    }
}

/// Background job intervals
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScheduleConfig {
    /// Run the refresh and logger jobs at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Delay between refresh polls
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,

    /// Delay between snapshot log lines
    #[serde(default = "default_log_interval_ms")]
    pub log_interval_ms: u64,
}

const fn default_refresh_interval_ms() -> u64 {
    5_000
}

const fn default_log_interval_ms() -> u64 {
    3_000
}

impl ScheduleConfig {
    pub const fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub const fn log_interval(&self) -> Duration {
        Duration::from_millis(self.log_interval_ms)
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            refresh_interval_ms: default_refresh_interval_ms(),
            log_interval_ms: default_log_interval_ms(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for stdout
    #[serde(default = "default_log_format")]
    pub format: LogFormat,

    /// Directory for log files (if None logs only to stdout)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Log file rotation policy
    #[serde(default)]
    pub rotation: RotationPolicy,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    #[default]
    Daily,
    Hourly,
    Never,
}

fn default_log_level() -> String {
    "info".to_string()
}

const fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: RotationPolicy::default(),
        }
    }
}
