//! Per-navigation context handed to gates, middleware and data loaders

use crate::{Route, Router, Store};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Handle to the host application, opaque to this crate.
///
/// Loaders downcast it to whatever the host put in.
#[derive(Clone)]
pub struct AppHandle(Arc<dyn Any + Send + Sync>);

impl AppHandle {
    /// Wrap an application value.
    pub fn new<T: Any + Send + Sync>(app: T) -> Self {
        Self(Arc::new(app))
    }

    /// Borrow the application as its concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl Default for AppHandle {
    fn default() -> Self {
        Self::new(())
    }
}

impl fmt::Debug for AppHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AppHandle(..)")
    }
}

/// Everything a data loader can see about the navigation in progress.
///
/// Built once per navigation and cloned, never mutated, as it travels
/// through the gate, middleware and loaders.
#[derive(Clone)]
pub struct FetchContext {
    /// Render context on the server, `None` in the browser
    pub ssr_context: Option<serde_json::Value>,
    /// Host application
    pub app: AppHandle,
    /// Router driving the navigation
    pub router: Arc<dyn Router>,
    /// Store receiving route modules
    pub store: Arc<dyn Store>,
    /// Route being entered
    pub route: Route,
    /// Route being left
    pub from: Route,
}

impl FetchContext {
    /// Create a client-side context for the `from` → `route` transition.
    pub fn new(
        app: AppHandle,
        router: Arc<dyn Router>,
        store: Arc<dyn Store>,
        route: Route,
        from: Route,
    ) -> Self {
        Self {
            ssr_context: None,
            app,
            router,
            store,
            route,
            from,
        }
    }

    /// Attach a server render context.
    pub fn with_ssr_context(mut self, ssr_context: serde_json::Value) -> Self {
        self.ssr_context = Some(ssr_context);
        self
    }

    /// True when rendering on the server.
    pub fn is_server(&self) -> bool {
        self.ssr_context.is_some()
    }
}

impl fmt::Debug for FetchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchContext")
            .field("ssr_context", &self.ssr_context)
            .field("route", &self.route)
            .field("from", &self.from)
            .finish_non_exhaustive()
    }
}
