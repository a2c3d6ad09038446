//! Configuration snapshot models.
//!
//! A snapshot is an immutable value built from the entries of one successful
//! refresh. Readers always see a whole snapshot, never a mix of two refreshes.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::config::DefaultsConfig;

/// Key/value pairs as returned by a configuration provider, after key
/// selection. Nested documents are flattened with `.` separators.
pub type ConfigEntries = BTreeMap<String, String>;

pub const MESSAGE_KEY: &str = "app.message";
pub const FEATURE_ENABLED_MESSAGE_KEY: &str = "app.message.feature-enabled";
pub const VERSION_KEY: &str = "app.version";
pub const ENVIRONMENT_KEY: &str = "app.environment";

/// Values bound from provider entries, with defaults filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    pub base_message: String,
    pub feature_enabled_message: String,
    pub version: String,
    pub environment: String,
}

impl AppSettings {
    /// Settings made only of the configured defaults.
    pub fn from_defaults(defaults: &DefaultsConfig) -> Self {
        Self {
            base_message: defaults.message.clone(),
            feature_enabled_message: defaults.feature_enabled_message.clone(),
            version: defaults.version.clone(),
            environment: defaults.environment.clone(),
        }
    }

    /// Bind the `app.*` keys, falling back to `defaults` for absent ones.
    pub fn bind(entries: &ConfigEntries, defaults: &DefaultsConfig) -> Self {
        let lookup = |key: &str, fallback: &str| {
            entries
                .get(key)
                .cloned()
                .unwrap_or_else(|| fallback.to_string())
        };

        Self {
            base_message: lookup(MESSAGE_KEY, &defaults.message),
            feature_enabled_message: lookup(
                FEATURE_ENABLED_MESSAGE_KEY,
                &defaults.feature_enabled_message,
            ),
            version: lookup(VERSION_KEY, &defaults.version),
            environment: lookup(ENVIRONMENT_KEY, &defaults.environment),
        }
    }

    /// The message variant matching the flag state.
    pub fn resolve_message(&self, feature_enabled: bool) -> &str {
        if feature_enabled {
            &self.feature_enabled_message
        } else {
            &self.base_message
        }
    }
}

/// The latest known configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSnapshot {
    pub message: String,
    pub version: String,
    pub environment: String,
    pub feature_enabled: bool,
}

impl ConfigSnapshot {
    /// Resolve `settings` against a flag state captured at refresh time.
    pub fn resolve(settings: &AppSettings, feature_enabled: bool) -> Self {
        Self {
            message: settings.resolve_message(feature_enabled).to_string(),
            version: settings.version.clone(),
            environment: settings.environment.clone(),
            feature_enabled,
        }
    }
}

/// Result of one manual refresh: the keys the provider changed and the
/// snapshots on either side of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshOutcome {
    pub refreshed_keys: BTreeSet<String>,
    pub changed: bool,
    pub before: ConfigSnapshot,
    pub after: ConfigSnapshot,
}

impl RefreshOutcome {
    pub fn new(
        refreshed_keys: BTreeSet<String>,
        before: ConfigSnapshot,
        after: ConfigSnapshot,
    ) -> Self {
        Self {
            refreshed_keys,
            changed: before != after,
            before,
            after,
        }
    }
}

/// Keys added, removed or modified between two fetches.
pub fn diff_keys(previous: &ConfigEntries, current: &ConfigEntries) -> BTreeSet<String> {
    let mut changed: BTreeSet<String> = current
        .iter()
        .filter(|(key, value)| previous.get(*key) != Some(*value))
        .map(|(key, _)| key.clone())
        .collect();

    changed.extend(
        previous
            .keys()
            .filter(|key| !current.contains_key(*key))
            .cloned(),
    );

    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(pairs: &[(&str, &str)]) -> ConfigEntries {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_bind_uses_defaults_for_missing_keys() {
        let defaults = DefaultsConfig::default();
        let settings = AppSettings::bind(&entries(&[(VERSION_KEY, "2.1.0")]), &defaults);

        assert_eq!(settings.version, "2.1.0");
        assert_eq!(settings.base_message, "Default message");
        assert_eq!(settings.feature_enabled_message, "Feature-enabled message!");
        assert_eq!(settings.environment, "local");
    }

    #[test]
    fn test_bind_reads_all_app_keys() {
        let settings = AppSettings::bind(
            &entries(&[
                (MESSAGE_KEY, "Hello"),
                (FEATURE_ENABLED_MESSAGE_KEY, "Hello (flag on)"),
                (VERSION_KEY, "3.0.0"),
                (ENVIRONMENT_KEY, "staging"),
            ]),
            &DefaultsConfig::default(),
        );

        assert_eq!(settings.base_message, "Hello");
        assert_eq!(settings.feature_enabled_message, "Hello (flag on)");
        assert_eq!(settings.version, "3.0.0");
        assert_eq!(settings.environment, "staging");
    }

    #[test]
    fn test_resolve_message_follows_flag() {
        let cases = [
            ("Hello", "Hello (flag on)"),
            ("", "only when enabled"),
            ("same", "same"),
        ];

        for (base, enabled) in cases {
            let settings = AppSettings {
                base_message: base.to_string(),
                feature_enabled_message: enabled.to_string(),
                version: "1.0.0".to_string(),
                environment: "local".to_string(),
            };
            assert_eq!(settings.resolve_message(true), enabled);
            assert_eq!(settings.resolve_message(false), base);
            assert_eq!(ConfigSnapshot::resolve(&settings, true).message, enabled);
            assert_eq!(ConfigSnapshot::resolve(&settings, false).message, base);
        }
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let snapshot = ConfigSnapshot {
            message: "Hello".to_string(),
            version: "1.0.0".to_string(),
            environment: "local".to_string(),
            feature_enabled: true,
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["featureEnabled"], true);
        assert_eq!(json["message"], "Hello");
    }

    #[test]
    fn test_diff_keys_detects_added_removed_modified() {
        let previous = entries(&[("a", "1"), ("b", "2"), ("c", "3")]);
        let current = entries(&[("a", "1"), ("b", "20"), ("d", "4")]);

        let changed = diff_keys(&previous, &current);
        let changed: Vec<_> = changed.iter().map(String::as_str).collect();
        assert_eq!(changed, vec!["b", "c", "d"]);
    }

    #[test]
    fn test_diff_keys_identical_entries() {
        let same = entries(&[("a", "1")]);
        assert!(diff_keys(&same, &same.clone()).is_empty());
    }

    #[test]
    fn test_outcome_changed_tracks_snapshot_difference() {
        let before = ConfigSnapshot::resolve(
            &AppSettings::from_defaults(&DefaultsConfig::default()),
            false,
        );
        let mut after = before.clone();

        let unchanged = RefreshOutcome::new(BTreeSet::new(), before.clone(), after.clone());
        assert!(!unchanged.changed);

        after.version = "9.9.9".to_string();
        let changed = RefreshOutcome::new(
            BTreeSet::from([VERSION_KEY.to_string()]),
            before,
            after,
        );
        assert!(changed.changed);
    }
}
