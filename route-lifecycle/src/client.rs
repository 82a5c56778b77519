//! Client-side integration
//!
//! Installs three hooks on the host router:
//!
//! - `before_each`: starts navigation timing when a component will process
//!   the transition
//! - `before_resolve`: registers route modules, then runs the fetch pipeline
//!   for the components that pass the route-update gate
//! - `after_each`: releases modules no longer used by either route
//!
//! # Example
//! ```rust,ignore
//! let router: Arc<dyn Router> = Arc::new(MemoryRouter::new().route("home", vec![home]));
//! let client = ClientIntegration::builder(router.clone(), store.clone())
//!     .logger(Arc::new(TracingLogger))
//!     .timing(Arc::new(InstantTiming::new()))
//!     .fetch_options(FetchOptions::new().middleware(auth_check))
//!     .install();
//!
//! // The initial route was rendered on the server.
//! client.hydrate(&initial_route)?;
//! ```

use crate::{
    AppHandle, FetchContext, FetchOptions, LifecycleConfig, Logger, ModuleLifecycle, NavResult,
    NavigationError, Route, RouteComponent, Router, Store, TracingLogger,
    fetch::run_fetch_client,
    gate::should_process,
    logger::NavigationId,
    perf::{PerfTracker, Timing},
    router::{GuardResult, after_hook_fn, guard_fn},
};
use std::sync::{Arc, Weak};
use tracing::Instrument;

/// Builder for [`ClientIntegration`].
pub struct ClientBuilder {
    router: Arc<dyn Router>,
    store: Arc<dyn Store>,
    app: AppHandle,
    logger: Arc<dyn Logger>,
    timing: Option<Arc<dyn Timing>>,
    fetch: FetchOptions,
    config: LifecycleConfig,
}

impl ClientBuilder {
    /// Application handle passed to loaders.
    pub fn app(mut self, app: AppHandle) -> Self {
        self.app = app;
        self
    }

    /// Logger (default: [`TracingLogger`]).
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Timing API for navigation measures.
    pub fn timing(mut self, timing: Arc<dyn Timing>) -> Self {
        self.timing = Some(timing);
        self
    }

    /// Application-wide middleware and loaders.
    pub fn fetch_options(mut self, fetch: FetchOptions) -> Self {
        self.fetch = fetch;
        self
    }

    /// Integration configuration.
    pub fn config(mut self, config: LifecycleConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach the hooks to the router.
    pub fn install(self) -> ClientIntegration {
        let timing = self.timing.filter(|_| self.config.performance_marks);
        let shared = Arc::new(ClientShared {
            router: Arc::downgrade(&self.router),
            store: self.store.clone(),
            app: self.app,
            logger: self.logger.clone(),
            lifecycle: ModuleLifecycle::new(self.store, self.logger).with_config(&self.config),
            fetch: self.fetch,
            perf: PerfTracker::new(timing, self.config.mark_prefix.clone()),
        });

        let hooks = shared.clone();
        self.router
            .before_each(guard_fn(move |to, from| hooks.clone().start_timing(to, from)));
        let hooks = shared.clone();
        self.router
            .before_resolve(guard_fn(move |to, from| hooks.clone().resolve(to, from)));
        let hooks = shared.clone();
        self.router
            .after_each(after_hook_fn(move |to, from| hooks.clone().release(to, from)));

        ClientIntegration { shared }
    }
}

/// Handle to an installed client integration.
#[derive(Clone)]
pub struct ClientIntegration {
    shared: Arc<ClientShared>,
}

impl ClientIntegration {
    /// Start configuring the integration for `router` and `store`.
    pub fn builder(router: Arc<dyn Router>, store: Arc<dyn Store>) -> ClientBuilder {
        ClientBuilder {
            router,
            store,
            app: AppHandle::default(),
            logger: Arc::new(TracingLogger),
            timing: None,
            fetch: FetchOptions::default(),
            config: LifecycleConfig::default(),
        }
    }

    /// Register the modules of the initial, server-rendered route.
    ///
    /// Runs no gate and no loaders: the server already fetched the data, and
    /// its state is kept because it is present in the store.
    pub fn hydrate(&self, route: &Route) -> NavResult<usize> {
        let router = self
            .shared
            .router
            .upgrade()
            .ok_or_else(|| NavigationError::internal("router dropped before hydration"))?;
        self.shared.lifecycle.register_all(router.as_ref(), route)
    }

    /// The module lifecycle owned by this integration.
    pub fn lifecycle(&self) -> &ModuleLifecycle {
        &self.shared.lifecycle
    }

    /// The navigation timing tracker.
    pub fn perf(&self) -> &PerfTracker {
        &self.shared.perf
    }
}

impl std::fmt::Debug for ClientIntegration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientIntegration")
            .field("lifecycle", &self.shared.lifecycle)
            .field("perf", &self.shared.perf)
            .field("fetch", &self.shared.fetch)
            .finish()
    }
}

struct ClientShared {
    // Weak: the router owns the hooks that own this.
    router: Weak<dyn Router>,
    store: Arc<dyn Store>,
    app: AppHandle,
    logger: Arc<dyn Logger>,
    lifecycle: ModuleLifecycle,
    fetch: FetchOptions,
    perf: PerfTracker,
}

impl ClientShared {
    fn context(&self, to: Route, from: Route) -> Option<FetchContext> {
        let router = self.router.upgrade()?;
        Some(FetchContext::new(
            self.app.clone(),
            router,
            self.store.clone(),
            to,
            from,
        ))
    }

    fn gated_components(&self, ctx: &FetchContext) -> NavResult<Vec<Arc<dyn RouteComponent>>> {
        let mut components = ctx.router.matched_components(&ctx.route)?;
        components.retain(|c| should_process(c.as_ref(), ctx));
        Ok(components)
    }

    async fn start_timing(self: Arc<Self>, to: Route, from: Route) -> GuardResult {
        if !self.perf.is_enabled() {
            return Ok(None);
        }
        let Some(ctx) = self.context(to, from) else {
            return Ok(None);
        };
        match self.gated_components(&ctx) {
            Ok(components) if !components.is_empty() => {
                self.perf.start_navigation(&ctx.from, &ctx.route);
            }
            Ok(_) => {}
            Err(err) => self
                .logger
                .warn(&format!("Navigation timing not started: {err}")),
        }
        Ok(None)
    }

    async fn resolve(self: Arc<Self>, to: Route, from: Route) -> GuardResult {
        let span = tracing::debug_span!(
            "navigation",
            id = %NavigationId::new(),
            from = %from.full_path(),
            to = %to.full_path(),
        );
        let Some(ctx) = self.context(to, from) else {
            return Ok(None);
        };

        async move {
            if let Err(err) = self.lifecycle.register_route_modules(&ctx) {
                self.logger
                    .error(&format!("Store module registration failed: {err}"));
                return Err(err);
            }
            let components = self.gated_components(&ctx)?;
            if components.is_empty() {
                self.logger.debug(&format!(
                    "No components to fetch for {}",
                    ctx.route.full_path()
                ));
                return Ok(None);
            }
            // Only gated navigations got a start mark in `start_timing`.
            self.perf.measure("beforeResolve");

            let result =
                run_fetch_client(&ctx, &components, &self.fetch, Some(&self.perf)).await;
            if let Err(err) = &result {
                self.logger.error(&format!("Data fetch failed: {err}"));
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn release(self: Arc<Self>, to: Route, from: Route) {
        let Some(ctx) = self.context(to, from) else {
            return;
        };
        if let Err(err) = self.lifecycle.release_inactive_modules(&ctx) {
            self.logger
                .error(&format!("Store module release failed: {err}"));
        }
    }
}
