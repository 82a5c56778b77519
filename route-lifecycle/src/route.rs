//! Route records supplied by the host router

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Query string as a key → JSON value mapping.
///
/// Two queries are equal only when they have the same keys; a key mapped to
/// `null` is not the same as a missing key.
pub type Query = BTreeMap<String, serde_json::Value>;

/// A resolved route location.
///
/// Owned by the host router; this crate only reads it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Route {
    /// Path without query or hash (e.g. "/products/42")
    pub path: String,
    /// Name of the route-table entry, if the entry is named
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Parsed query string
    #[serde(default)]
    pub query: Query,
    /// Hash fragment including the leading '#', or empty
    #[serde(default)]
    pub hash: String,
    /// Dynamic path segments (e.g. `id` → "42")
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

impl Route {
    /// Create an unnamed route for a path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// The route a router sits on before its first navigation.
    pub fn start() -> Self {
        Self::new("/")
    }

    /// Set the route-table entry name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a query parameter.
    pub fn with_query(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Set the hash fragment.
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = hash.into();
        self
    }

    /// Add a path parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Label used for logging and performance marks: the name, or the path
    /// for unnamed routes.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.path)
    }

    /// Path with query string and hash appended.
    pub fn full_path(&self) -> String {
        let mut full = self.path.clone();
        let mut separator = '?';
        for (key, value) in &self.query {
            full.push(separator);
            separator = '&';
            full.push_str(key);
            match value {
                serde_json::Value::Null => {}
                serde_json::Value::String(s) => {
                    full.push('=');
                    full.push_str(s);
                }
                other => {
                    full.push('=');
                    full.push_str(&other.to_string());
                }
            }
        }
        full.push_str(&self.hash);
        full
    }
}
