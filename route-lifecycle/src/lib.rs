#![warn(missing_docs)]
//! # Route Lifecycle
//!
//! Route-scoped store modules and data fetching for SPA/SSR routers.
//!
//! ## Overview
//!
//! Route components declare the store modules they need and, optionally, a
//! data loader. This crate attaches to a host router and:
//!
//! - **registers** a component's store modules right before a navigation to
//!   it commits, so modules ship with code-split routes instead of the root
//!   bundle
//! - **removes** modules once neither side of a transition uses them, nested
//!   modules before their parents
//! - **fetches** data in a fixed order: middleware, then the global loader
//!   and component loaders concurrently, then post-middleware
//! - **measures** navigations on an optional timing API
//!
//! Whether a component takes part in a transition is decided by the
//! route-update gate ([`should_process`]) from the component's
//! [`UpdatePolicy`].
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────── host router ────────────────────────────┐
//! │  before_each ───────► before_resolve ───────► commit ──► after_each │
//! └──────┬──────────────────────┬────────────────────────────────┬──────┘
//!        │                      │                                │
//!        ▼                      ▼                                ▼
//!   PerfTracker          ModuleLifecycle                  ModuleLifecycle
//!   (start mark)         register_route_modules           release_inactive_modules
//!                        + run_fetch_client                (LIFO removal queue)
//!                               │
//!                               ▼
//!                         Store (trait)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use route_lifecycle::*;
//! use std::sync::Arc;
//!
//! let product = Component::new("ProductPage")
//!     .store_module(ModuleDeclaration::new(
//!         ModuleName::from_fn(|route| Ok(format!("product/{}", route.params["id"]))),
//!         ModuleDefinition::new(ModuleState(serde_json::json!({"item": null}))),
//!     ))
//!     .fetch_data(|ctx| async move { Ok(None) });
//!
//! let router: Arc<dyn Router> =
//!     Arc::new(MemoryRouter::new().route("product", vec![Arc::new(product)]));
//! let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
//!
//! let client = ClientIntegration::builder(router, store).install();
//! ```

mod component;
mod config;
mod context;
mod error;
mod logger;
mod module;
mod route;
mod store;

pub mod client;
pub mod fetch;
pub mod gate;
pub mod lifecycle;
pub mod memory;
pub mod perf;
pub mod router;
pub mod server;

pub use client::{ClientBuilder, ClientIntegration};
pub use component::{Component, RouteComponent};
pub use config::{DEFAULT_MARK_PREFIX, LifecycleConfig};
pub use context::{AppHandle, FetchContext};
pub use error::{NavResult, NavigationError, NavigationErrorCode, Rejection};
pub use fetch::{
    FetchDataFn, FetchOptions, FetchOutcome, MiddlewareFn, fetch_fn, middleware_fn, run_fetch,
    run_fetch_client, run_fetch_server,
};
pub use gate::{FieldPolicy, ResolvedPolicy, UpdatePolicy, should_process};
pub use lifecycle::ModuleLifecycle;
pub use logger::{Logger, NavigationId, NoopLogger, TracingLogger};
pub use memory::{MemoryRouter, MemoryStore, ModuleState, NavigationResult};
pub use module::{
    ModuleDeclaration, ModuleDefinition, ModuleName, ModuleNameFn, ModulePath, StoreModules,
};
pub use perf::{EntryKind, InstantTiming, PerfEntry, PerfTracker, Timing};
pub use route::{Query, Route};
pub use router::{NavigationDirective, Router};
pub use server::ServerIntegration;
pub use store::{RegisterOptions, Store, has_retained_state};

#[cfg(test)]
mod tests;
