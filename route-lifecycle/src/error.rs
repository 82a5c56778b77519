//! Error types for navigation processing
//!
//! Everything that can abort a navigation is expressed as a [`NavigationError`].
//! Middleware and fetch functions fail with a [`Rejection`], which is either a
//! structured error or an arbitrary JSON value; the client pipeline normalizes
//! rejections into errors before they reach the router, the server pipeline
//! hands them back untouched.
//!
//! # Example
//! ```rust,ignore
//! use route_lifecycle::{NavigationError, NavigationErrorCode, Rejection};
//!
//! let error = NavigationError::new(NavigationErrorCode::FetchData, "catalog unavailable");
//! let error = NavigationError::fetch_data("catalog unavailable"); // Convenience method
//!
//! let rejection = Rejection::value(serde_json::json!({"error": "oops"}));
//! assert_eq!(rejection.into_error().message, r#"{"error":"oops"}"#);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error codes for navigation failures.
///
/// When serialized, codes are converted to SCREAMING_SNAKE_CASE
/// (e.g., `ModuleRegistration` becomes `"MODULE_REGISTRATION"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NavigationErrorCode {
    /// The router could not enumerate the components of a route
    RouteResolution,
    /// A module name could not be resolved for a route
    ModuleResolution,
    /// The store refused to register a module
    ModuleRegistration,
    /// The store failed to unregister a module
    ModuleRemoval,
    /// Pre- or post-middleware failed
    Middleware,
    /// A global or component data fetch failed
    FetchData,
    /// A fetch or middleware rejected with a plain value
    Rejected,
    /// An unexpected internal error occurred
    Internal,
}

impl NavigationErrorCode {
    /// Returns the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RouteResolution => "ROUTE_RESOLUTION",
            Self::ModuleResolution => "MODULE_RESOLUTION",
            Self::ModuleRegistration => "MODULE_REGISTRATION",
            Self::ModuleRemoval => "MODULE_REMOVAL",
            Self::Middleware => "MIDDLEWARE",
            Self::FetchData => "FETCH_DATA",
            Self::Rejected => "REJECTED",
            Self::Internal => "INTERNAL",
        }
    }

    /// Returns true if the error originated in store module handling.
    pub fn is_module_error(&self) -> bool {
        matches!(
            self,
            Self::ModuleResolution | Self::ModuleRegistration | Self::ModuleRemoval
        )
    }

    /// Returns true if the error originated in the fetch pipeline.
    pub fn is_pipeline_error(&self) -> bool {
        matches!(self, Self::Middleware | Self::FetchData | Self::Rejected)
    }
}

impl fmt::Display for NavigationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error that cancels a navigation.
///
/// # Example
/// ```rust,ignore
/// use route_lifecycle::NavigationError;
///
/// let error = NavigationError::module_registration("store is frozen")
///     .with_details(serde_json::json!({"path": ["cart"]}))
///     .with_cause("registerModule called during commit");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("[{code}] {message}")]
pub struct NavigationError {
    /// Error code
    pub code: NavigationErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (JSON value)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Optional cause for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl NavigationError {
    /// Create a new error with code and message.
    pub fn new(code: NavigationErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            cause: None,
        }
    }

    /// Add details to the error.
    pub fn with_details(mut self, details: impl Serialize) -> Self {
        self.details = serde_json::to_value(details).ok();
        self
    }

    /// Add a cause string for debugging.
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    // Convenience constructors

    /// Create a ROUTE_RESOLUTION error.
    pub fn route_resolution(message: impl Into<String>) -> Self {
        Self::new(NavigationErrorCode::RouteResolution, message)
    }

    /// Create a MODULE_RESOLUTION error.
    pub fn module_resolution(message: impl Into<String>) -> Self {
        Self::new(NavigationErrorCode::ModuleResolution, message)
    }

    /// Create a MODULE_REGISTRATION error.
    pub fn module_registration(message: impl Into<String>) -> Self {
        Self::new(NavigationErrorCode::ModuleRegistration, message)
    }

    /// Create a MODULE_REMOVAL error.
    pub fn module_removal(message: impl Into<String>) -> Self {
        Self::new(NavigationErrorCode::ModuleRemoval, message)
    }

    /// Create a MIDDLEWARE error.
    pub fn middleware(message: impl Into<String>) -> Self {
        Self::new(NavigationErrorCode::Middleware, message)
    }

    /// Create a FETCH_DATA error.
    pub fn fetch_data(message: impl Into<String>) -> Self {
        Self::new(NavigationErrorCode::FetchData, message)
    }

    /// Create a REJECTED error.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(NavigationErrorCode::Rejected, message)
    }

    /// Create an INTERNAL error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(NavigationErrorCode::Internal, message)
    }
}

impl From<serde_json::Error> for NavigationError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(format!("JSON error: {}", err))
    }
}

/// Result type alias for navigation operations.
pub type NavResult<T> = Result<T, NavigationError>;

/// Failure value of a middleware or fetch function.
///
/// A fetch may fail with a structured [`NavigationError`] or reject with any
/// JSON value. Server-side callers receive rejections as-is; the client
/// pipeline calls [`Rejection::into_error`] so the router always sees a
/// uniform error shape.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    /// Structured navigation error
    #[error(transparent)]
    Error(#[from] NavigationError),
    /// Arbitrary rejected value
    #[error("rejected with {0}")]
    Value(serde_json::Value),
}

impl Rejection {
    /// Reject with an arbitrary serializable value.
    pub fn value(value: impl Serialize) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => Self::Value(value),
            Err(err) => Self::Error(err.into()),
        }
    }

    /// Normalize into a [`NavigationError`].
    ///
    /// Strings become the error message verbatim, every other value is
    /// rendered as compact JSON.
    pub fn into_error(self) -> NavigationError {
        match self {
            Self::Error(err) => err,
            Self::Value(serde_json::Value::String(message)) => NavigationError::rejected(message),
            Self::Value(value) => NavigationError::rejected(value.to_string()),
        }
    }
}

impl From<String> for Rejection {
    fn from(message: String) -> Self {
        Self::Value(serde_json::Value::String(message))
    }
}

impl From<&str> for Rejection {
    fn from(message: &str) -> Self {
        Self::Value(serde_json::Value::String(message.to_string()))
    }
}
