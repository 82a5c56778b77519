//! Server-side integration
//!
//! A server render handles exactly one route: register the modules of every
//! matched component, then run the fetch pipeline over all of them. There is
//! no router cancellation on the server, so rejections are returned to the
//! caller as they were raised.

use crate::{
    AppHandle, FetchContext, FetchOptions, LifecycleConfig, Logger, ModuleLifecycle, NavResult,
    Rejection, Route, Router, Store, TracingLogger,
    fetch::{FetchOutcome, run_fetch_server},
};
use std::sync::Arc;

/// Prepares the store for rendering a single route.
pub struct ServerIntegration {
    router: Arc<dyn Router>,
    store: Arc<dyn Store>,
    app: AppHandle,
    logger: Arc<dyn Logger>,
    lifecycle: ModuleLifecycle,
    fetch: FetchOptions,
    config: LifecycleConfig,
}

impl ServerIntegration {
    /// Create an integration for one request's router and store.
    pub fn new(router: Arc<dyn Router>, store: Arc<dyn Store>) -> Self {
        let logger: Arc<dyn Logger> = Arc::new(TracingLogger);
        Self {
            lifecycle: ModuleLifecycle::new(store.clone(), logger.clone()),
            router,
            store,
            app: AppHandle::default(),
            logger,
            fetch: FetchOptions::default(),
            config: LifecycleConfig::default(),
        }
    }

    /// Application handle passed to loaders.
    pub fn app(mut self, app: AppHandle) -> Self {
        self.app = app;
        self
    }

    /// Logger (default: [`TracingLogger`]).
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.lifecycle =
            ModuleLifecycle::new(self.store.clone(), logger.clone()).with_config(&self.config);
        self.logger = logger;
        self
    }

    /// Application-wide middleware and loaders.
    pub fn fetch_options(mut self, fetch: FetchOptions) -> Self {
        self.fetch = fetch;
        self
    }

    /// Integration configuration.
    pub fn config(mut self, config: LifecycleConfig) -> Self {
        self.lifecycle = self.lifecycle.with_config(&config);
        self.config = config;
        self
    }

    /// Register the modules of every component matched by `route`.
    pub fn register_route_modules(&self, route: &Route) -> NavResult<usize> {
        self.logger
            .debug(&format!("Registering store modules for {}", route.full_path()));
        self.lifecycle.register_all(self.router.as_ref(), route)
    }

    /// Run the server pipeline for `route` over all matched components.
    ///
    /// A returned [`NavigationDirective`](crate::NavigationDirective) is left
    /// to the caller (e.g. to answer with an HTTP redirect).
    ///
    /// # Panics
    ///
    /// Outside of a Tokio runtime, see [`run_fetch`](crate::run_fetch).
    pub async fn fetch_data(&self, route: Route, ssr_context: serde_json::Value) -> FetchOutcome {
        let components = self.router.matched_components(&route)?;
        let ctx = FetchContext::new(
            self.app.clone(),
            self.router.clone(),
            self.store.clone(),
            route,
            Route::start(),
        )
        .with_ssr_context(ssr_context);
        run_fetch_server(&ctx, &components, &self.fetch).await
    }

    /// Register modules, then fetch data, for `route`.
    ///
    /// # Panics
    ///
    /// Outside of a Tokio runtime, see [`run_fetch`](crate::run_fetch).
    pub async fn prepare(&self, route: Route, ssr_context: serde_json::Value) -> FetchOutcome {
        self.register_route_modules(&route).map_err(Rejection::from)?;
        self.fetch_data(route, ssr_context).await
    }
}

impl std::fmt::Debug for ServerIntegration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerIntegration")
            .field("fetch", &self.fetch)
            .finish_non_exhaustive()
    }
}
