//! Configuration for the client and server integrations.
//!
//! # Example
//! ```rust,ignore
//! use route_lifecycle::LifecycleConfig;
//!
//! let config = LifecycleConfig::new()
//!     .with_performance_marks(cfg!(debug_assertions))
//!     .with_mark_prefix("shop:");
//! ```

use serde::{Deserialize, Serialize};

/// Default prefix of performance mark and measure names.
pub const DEFAULT_MARK_PREFIX: &str = "route-lifecycle:";

/// Integration configuration.
///
/// Every field has a default, so partial JSON/TOML documents deserialize.
///
/// * `performance_marks` - Record marks/measures when a timing API is
///   available. Default: true.
///
/// * `mark_prefix` - Prefix of every mark and measure this crate creates;
///   marks with this prefix are cleared at the start of each navigation.
///   Default: `"route-lifecycle:"`.
///
/// * `log_skipped_registrations` - Log "already registered" skips at info
///   level instead of debug. Default: true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Record performance marks (default: true)
    pub performance_marks: bool,
    /// Prefix of mark/measure names (default: "route-lifecycle:")
    pub mark_prefix: String,
    /// Log skipped registrations at info level (default: true)
    pub log_skipped_registrations: bool,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            performance_marks: true,
            mark_prefix: DEFAULT_MARK_PREFIX.to_string(),
            log_skipped_registrations: true,
        }
    }
}

impl LifecycleConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable performance marks.
    pub fn with_performance_marks(mut self, enabled: bool) -> Self {
        self.performance_marks = enabled;
        self
    }

    /// Set the mark/measure name prefix.
    pub fn with_mark_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.mark_prefix = prefix.into();
        self
    }

    /// Choose the level of "already registered" messages.
    pub fn with_log_skipped_registrations(mut self, at_info: bool) -> Self {
        self.log_skipped_registrations = at_info;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_document_keeps_defaults() {
        let config: LifecycleConfig =
            serde_json::from_str(r#"{"mark_prefix": "shop:"}"#).unwrap();
        assert_eq!(config.mark_prefix, "shop:");
        assert!(config.performance_marks);
        assert!(config.log_skipped_registrations);
    }

    #[test]
    fn builder_overrides() {
        let config = LifecycleConfig::new()
            .with_performance_marks(false)
            .with_log_skipped_registrations(false);
        assert!(!config.performance_marks);
        assert!(!config.log_skipped_registrations);
        assert_eq!(config.mark_prefix, DEFAULT_MARK_PREFIX);
    }
}
