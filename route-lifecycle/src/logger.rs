//! Logger injected into the lifecycle layer
//!
//! Log calls never influence control flow. The default [`TracingLogger`]
//! forwards to `tracing`, so messages pick up whatever navigation span is
//! active when they are emitted.

// =============================================================================
// Logger Trait
// =============================================================================

/// Single-message log sinks.
pub trait Logger: Send + Sync {
    /// General information (registrations, removals).
    fn info(&self, message: &str);

    /// Detail useful when debugging navigation.
    fn debug(&self, message: &str);

    /// Something unexpected that did not stop the navigation.
    fn warn(&self, message: &str);

    /// A failure.
    fn error(&self, message: &str);
}

// =============================================================================
// TracingLogger
// =============================================================================

/// Logger that emits `tracing` events under the `route_lifecycle` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!(target: "route_lifecycle", "{}", message);
    }

    fn debug(&self, message: &str) {
        tracing::debug!(target: "route_lifecycle", "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "route_lifecycle", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "route_lifecycle", "{}", message);
    }
}

// =============================================================================
// NoopLogger
// =============================================================================

/// Logger that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn info(&self, _message: &str) {}
    fn debug(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

/// Correlation id for one navigation, attached to the navigation span.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NavigationId(String);

impl NavigationId {
    /// Creates a new time-ordered id (UUID v7).
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext)).to_string())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for NavigationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NavigationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_ids_are_unique() {
        let a = NavigationId::new();
        let b = NavigationId::new();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }
}
