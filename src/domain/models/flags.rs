use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

use super::snapshot::ConfigEntries;
use crate::domain::errors::FeatureError;

/// Key prefix under which providers publish feature flags.
pub const FEATURE_FLAG_PREFIX: &str = "feature-management.";

const OBJECT_SUFFIX: &str = ".enabled";

/// Object form of a flag value, e.g. `{"id": "beta", "enabled": true}`.
#[derive(Debug, Deserialize)]
struct FlagDocument {
    enabled: bool,
}

/// On/off state of every flag published by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagTable {
    flags: BTreeMap<String, bool>,
}

impl FlagTable {
    /// Collect the flags found under [`FEATURE_FLAG_PREFIX`].
    ///
    /// A flattened object flag (`feature-management.beta.enabled`) is read as
    /// flag `beta`; its sibling keys are ignored. Any other key names a flag
    /// by everything after the prefix, dots included. Values that do not
    /// parse are skipped with a warning.
    pub fn from_entries(entries: &ConfigEntries) -> Self {
        let prefixed: Vec<(&str, &str)> = entries
            .iter()
            .filter_map(|(key, raw)| {
                key.strip_prefix(FEATURE_FLAG_PREFIX)
                    .map(|rest| (rest, raw.as_str()))
            })
            .collect();
        let objects: BTreeSet<&str> = prefixed
            .iter()
            .filter_map(|(rest, _)| rest.strip_suffix(OBJECT_SUFFIX))
            .collect();

        let mut flags = BTreeMap::new();
        for (rest, raw) in prefixed {
            let name = match rest.strip_suffix(OBJECT_SUFFIX) {
                Some(name) => name,
                None if is_object_sibling(rest, &objects) => continue,
                None => rest,
            };

            match parse_flag_value(name, raw) {
                Ok(enabled) => {
                    flags.insert(name.to_string(), enabled);
                }
                Err(e) => tracing::warn!(flag = name, error = %e, "skipping feature flag"),
            }
        }

        Self { flags }
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.flags.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl FromIterator<(String, bool)> for FlagTable {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self {
            flags: iter.into_iter().collect(),
        }
    }
}

fn is_object_sibling(rest: &str, objects: &BTreeSet<&str>) -> bool {
    objects
        .iter()
        .any(|object| rest.strip_prefix(*object).is_some_and(|tail| tail.starts_with('.')))
}

/// Parse `true`/`false` (any case) or a JSON object carrying `enabled`.
pub fn parse_flag_value(name: &str, raw: &str) -> Result<bool, FeatureError> {
    let trimmed = raw.trim();

    if trimmed.eq_ignore_ascii_case("true") {
        return Ok(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Ok(false);
    }

    serde_json::from_str::<FlagDocument>(trimmed)
        .map(|doc| doc.enabled)
        .map_err(|_| FeatureError::InvalidValue {
            name: name.to_string(),
            value: raw.to_string(),
        })
}
