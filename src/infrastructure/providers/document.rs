use serde_json::Value;

use crate::domain::models::ConfigEntries;

/// Key prefixes a provider loads; an empty list selects everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySelectors {
    prefixes: Vec<String>,
}

impl KeySelectors {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Selector that matches every key.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn matches(&self, key: &str) -> bool {
        self.prefixes.is_empty() || self.prefixes.iter().any(|p| key.starts_with(p.as_str()))
    }

    /// Drop the keys no prefix matches.
    pub fn apply(&self, mut entries: ConfigEntries) -> ConfigEntries {
        entries.retain(|key, _| self.matches(key));
        entries
    }
}

/// Flatten a configuration document into dotted keys.
///
/// Objects nest with `.`, arrays with `[i]`, scalars become their string
/// form and `null` is dropped.
pub fn flatten_document(document: &Value) -> ConfigEntries {
    let mut entries = ConfigEntries::new();
    flatten_into(&mut entries, None, document);
    entries
}

fn flatten_into(entries: &mut ConfigEntries, prefix: Option<&str>, value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = match prefix {
                    Some(prefix) => format!("{prefix}.{key}"),
                    None => key.clone(),
                };
                flatten_into(entries, Some(&path), child);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                let path = format!("{}[{i}]", prefix.unwrap_or_default());
                flatten_into(entries, Some(&path), child);
            }
        }
        Value::Null => {}
        Value::String(s) => insert(entries, prefix, s.clone()),
        Value::Bool(b) => insert(entries, prefix, b.to_string()),
        Value::Number(n) => insert(entries, prefix, n.to_string()),
    }
}

fn insert(entries: &mut ConfigEntries, key: Option<&str>, value: String) {
    if let Some(key) = key {
        entries.insert(key.to_string(), value);
    }
}
