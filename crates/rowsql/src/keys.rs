//! Primary-key resolution.
//!
//! Keys for a table are found in three tiers:
//!
//! 1. an explicit key list passed to the call
//! 2. the per-table mapping of a [`KeyConfig`]
//! 3. the config's naming scheme, `{table}_id` by default
//!
//! # Example
//! ```ignore
//! use rowsql::KeyConfig;
//!
//! let config = KeyConfig::new()
//!     .map_table("users", "userid")
//!     .map_table("users_groups", ["userid", "groupid"]);
//!
//! assert_eq!(config.resolve_keys("users", &[]), vec!["userid"]);
//! assert_eq!(config.resolve_keys("groups", &[]), vec!["groups_id"]);
//! ```

use crate::error::OrmResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Placeholder substituted with the table name inside a key scheme.
pub const TABLE_PLACEHOLDER: &str = "{table}";

/// Default key naming scheme.
pub const DEFAULT_KEY_SCHEME: &str = "{table}_id";

/// Key field(s) configured for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeySpec {
    Single(String),
    Composite(Vec<String>),
}

impl KeySpec {
    pub fn to_fields(&self) -> Vec<String> {
        match self {
            KeySpec::Single(field) => vec![field.clone()],
            KeySpec::Composite(fields) => fields.clone(),
        }
    }
}

impl From<&str> for KeySpec {
    fn from(field: &str) -> Self {
        KeySpec::Single(field.to_string())
    }
}

impl From<String> for KeySpec {
    fn from(field: String) -> Self {
        KeySpec::Single(field)
    }
}

impl From<Vec<String>> for KeySpec {
    fn from(fields: Vec<String>) -> Self {
        KeySpec::Composite(fields)
    }
}

impl From<Vec<&str>> for KeySpec {
    fn from(fields: Vec<&str>) -> Self {
        KeySpec::Composite(fields.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for KeySpec {
    fn from(fields: [&str; N]) -> Self {
        KeySpec::Composite(fields.iter().map(|f| f.to_string()).collect())
    }
}

/// Key resolution configuration of a data-access object.
///
/// `scheme: None` disables the naming-scheme fallback; unmapped tables then
/// resolve to no key at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    /// table -> key field(s)
    pub mappings: HashMap<String, KeySpec>,
    /// Fallback naming scheme; `{table}` is replaced by the table name.
    pub scheme: Option<String>,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            mappings: HashMap::new(),
            scheme: Some(DEFAULT_KEY_SCHEME.to_string()),
        }
    }
}

impl KeyConfig {
    /// Create a config with no mappings and the default `{table}_id` scheme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from JSON, e.g. `{"mappings": {"users": "id"}, "scheme": "{table}id"}`.
    pub fn from_json(json: &str) -> OrmResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Override the naming scheme.
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    /// Disable the naming-scheme fallback.
    pub fn no_scheme(mut self) -> Self {
        self.scheme = None;
        self
    }

    /// Map a table to its key field(s).
    pub fn map_table(mut self, table: impl Into<String>, key: impl Into<KeySpec>) -> Self {
        self.mappings.insert(table.into(), key.into());
        self
    }

    /// Replace all table mappings.
    pub fn mappings(mut self, mappings: HashMap<String, KeySpec>) -> Self {
        self.mappings = mappings;
        self
    }

    /// Resolve the ordered key fields of `table`.
    ///
    /// A non-empty `explicit` list wins and is returned verbatim.
    pub fn resolve_keys<S: AsRef<str>>(&self, table: &str, explicit: &[S]) -> Vec<String> {
        if !explicit.is_empty() {
            return explicit.iter().map(|s| s.as_ref().to_string()).collect();
        }

        if let Some(spec) = self.mappings.get(table) {
            return spec.to_fields();
        }

        match &self.scheme {
            Some(scheme) => vec![scheme.replace(TABLE_PLACEHOLDER, table)],
            None => Vec::new(),
        }
    }
}
