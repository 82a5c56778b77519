//! Data-fetch pipeline
//!
//! Runs around a navigation in a fixed order, each step finishing before the
//! next starts:
//!
//! ```text
//! middleware ──► global_fetch_data ┐
//!                component fetch … ├─ concurrently ──► post_middleware
//!                component fetch … ┘
//! ```
//!
//! The concurrent step fails fast: the first rejection is returned at once.
//! Loaders still in flight keep running on the runtime and their results are
//! dropped.

use crate::{
    FetchContext, NavResult, NavigationDirective, NavigationError, Rejection, RouteComponent,
    perf::PerfTracker,
};
use futures::future::try_join_all;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Result of a data loader: an optional directive for the router.
pub type FetchOutcome = Result<Option<NavigationDirective>, Rejection>;

/// Data loader (global or per component).
pub type FetchDataFn =
    Arc<dyn Fn(FetchContext) -> Pin<Box<dyn Future<Output = FetchOutcome> + Send>> + Send + Sync>;

/// Middleware run before or after the loaders.
pub type MiddlewareFn = Arc<
    dyn Fn(FetchContext) -> Pin<Box<dyn Future<Output = Result<(), Rejection>> + Send>>
        + Send
        + Sync,
>;

/// Create a data loader from an async function.
///
/// # Example
/// ```rust,ignore
/// let loader = fetch_fn(|ctx: FetchContext| async move {
///     if ctx.route.params.get("id").is_none() {
///         return Ok(Some(NavigationDirective::redirect("/")));
///     }
///     Ok(None)
/// });
/// ```
pub fn fetch_fn<F, Fut>(f: F) -> FetchDataFn
where
    F: Fn(FetchContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = FetchOutcome> + Send + 'static,
{
    Arc::new(move |ctx| Box::pin(f(ctx)))
}

/// Create middleware from an async function.
pub fn middleware_fn<F, Fut>(f: F) -> MiddlewareFn
where
    F: Fn(FetchContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), Rejection>> + Send + 'static,
{
    Arc::new(move |ctx| Box::pin(f(ctx)))
}

/// Application-wide pipeline hooks.
#[derive(Clone, Default)]
pub struct FetchOptions {
    /// Runs first
    pub middleware: Option<MiddlewareFn>,
    /// Runs alongside the component loaders
    pub global_fetch_data: Option<FetchDataFn>,
    /// Runs last
    pub post_middleware: Option<MiddlewareFn>,
}

impl FetchOptions {
    /// No hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pre-middleware.
    pub fn middleware<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(FetchContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), Rejection>> + Send + 'static,
    {
        self.middleware = Some(middleware_fn(f));
        self
    }

    /// Set the global loader.
    pub fn global_fetch_data<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(FetchContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = FetchOutcome> + Send + 'static,
    {
        self.global_fetch_data = Some(fetch_fn(f));
        self
    }

    /// Set the post-middleware.
    pub fn post_middleware<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(FetchContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), Rejection>> + Send + 'static,
    {
        self.post_middleware = Some(middleware_fn(f));
        self
    }
}

impl std::fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchOptions")
            .field("middleware", &self.middleware.is_some())
            .field("global_fetch_data", &self.global_fetch_data.is_some())
            .field("post_middleware", &self.post_middleware.is_some())
            .finish()
    }
}

/// Run the pipeline for `components`.
///
/// Returns the first directive produced by the loaders, in order global
/// loader first, then components in match order. Measures are recorded on
/// `perf` when given.
///
/// # Panics
///
/// Loaders are spawned onto the current Tokio runtime; polling this future
/// outside of one panics.
pub async fn run_fetch(
    ctx: &FetchContext,
    components: &[Arc<dyn RouteComponent>],
    options: &FetchOptions,
    perf: Option<&PerfTracker>,
) -> FetchOutcome {
    if let Some(middleware) = &options.middleware {
        middleware(ctx.clone()).await?;
    }
    if let Some(perf) = perf {
        perf.measure("middleware-complete");
    }

    let loaders = options
        .global_fetch_data
        .iter()
        .chain(components.iter().filter_map(|c| c.fetch_data()))
        .map(|loader| tokio::spawn(loader(ctx.clone())))
        .map(|handle| async move {
            handle.await.unwrap_or_else(|err| {
                Err(NavigationError::internal(format!("data loader panicked: {err}")).into())
            })
        });
    let directives = try_join_all(loaders).await?;
    if let Some(perf) = perf {
        perf.measure("fetchData-complete");
    }

    if let Some(post_middleware) = &options.post_middleware {
        post_middleware(ctx.clone()).await?;
    }

    Ok(directives.into_iter().flatten().next())
}

/// Client pipeline: rejections are normalized into [`NavigationError`]s so the
/// router's cancellation path always receives the same shape.
///
/// # Panics
///
/// Outside of a Tokio runtime, see [`run_fetch`].
pub async fn run_fetch_client(
    ctx: &FetchContext,
    components: &[Arc<dyn RouteComponent>],
    options: &FetchOptions,
    perf: Option<&PerfTracker>,
) -> NavResult<Option<NavigationDirective>> {
    run_fetch(ctx, components, options, perf)
        .await
        .map_err(Rejection::into_error)
}

/// Server pipeline: rejections are handed to the caller untouched.
///
/// # Panics
///
/// Outside of a Tokio runtime, see [`run_fetch`].
pub async fn run_fetch_server(
    ctx: &FetchContext,
    components: &[Arc<dyn RouteComponent>],
    options: &FetchOptions,
) -> FetchOutcome {
    run_fetch(ctx, components, options, None).await
}
