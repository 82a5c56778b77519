//! Host router capabilities
//!
//! The lifecycle layer never routes. It asks the host router for the
//! components matched by a route and attaches hook bodies at three points:
//!
//! ```text
//! navigate(to)
//!   ├─ before_each(to, from)      pre-navigation, can redirect/cancel
//!   ├─ before_resolve(to, from)   pre-commit, can redirect/cancel
//!   ├─ <commit: current route = to>
//!   └─ after_each(to, from)       post-commit, cannot affect the outcome
//! ```

use crate::{NavResult, Route, RouteComponent};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Instruction returned by a guard to change where a navigation ends up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "to", rename_all = "snake_case")]
pub enum NavigationDirective {
    /// Navigate to another location instead
    Redirect(String),
    /// Stay on the current route
    Abort,
}

impl NavigationDirective {
    /// Redirect to `location`.
    pub fn redirect(location: impl Into<String>) -> Self {
        Self::Redirect(location.into())
    }
}

/// What a guard tells the router: `Ok(None)` continues, `Ok(Some(_))`
/// redirects or aborts, `Err(_)` cancels the navigation with an error.
pub type GuardResult = NavResult<Option<NavigationDirective>>;

/// Guard attached before navigation or before commit.
pub type GuardFn =
    Arc<dyn Fn(Route, Route) -> Pin<Box<dyn Future<Output = GuardResult> + Send>> + Send + Sync>;

/// Hook attached after commit.
pub type AfterHookFn =
    Arc<dyn Fn(Route, Route) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// The router this crate plugs into.
pub trait Router: Send + Sync {
    /// Components activated by `route`, outermost first.
    fn matched_components(&self, route: &Route) -> NavResult<Vec<Arc<dyn RouteComponent>>>;

    /// Attach a guard run before a navigation is resolved.
    fn before_each(&self, guard: GuardFn);

    /// Attach a guard run right before a navigation commits.
    fn before_resolve(&self, guard: GuardFn);

    /// Attach a hook run after a navigation committed.
    fn after_each(&self, hook: AfterHookFn);
}

/// Create a guard from an async function.
pub fn guard_fn<F, Fut>(f: F) -> GuardFn
where
    F: Fn(Route, Route) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = GuardResult> + Send + 'static,
{
    Arc::new(move |to, from| Box::pin(f(to, from)))
}

/// Create an after-hook from an async function.
pub fn after_hook_fn<F, Fut>(f: F) -> AfterHookFn
where
    F: Fn(Route, Route) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move |to, from| Box::pin(f(to, from)))
}
