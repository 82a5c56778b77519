//! Fakes shared by the tests

use crate::{
    AppHandle, Component, FetchContext, Logger, ModuleDeclaration, ModuleDefinition,
    ModulePath, NavResult, NavigationError, RegisterOptions, Route, RouteComponent, Router, Store,
    router::{AfterHookFn, GuardFn},
};
use serde_json::{Value, json};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

// =============================================================================
// Store
// =============================================================================

/// A call made on [`RecordingStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Register { path: String, preserve_state: bool },
    Unregister(String),
}

/// Store that records every mutating call and enforces nothing.
pub struct RecordingStore {
    modules: Mutex<BTreeSet<ModulePath>>,
    state: Mutex<Value>,
    calls: Mutex<Vec<StoreCall>>,
    fail_register: Mutex<Option<String>>,
}

impl RecordingStore {
    pub fn new() -> Arc<Self> {
        Self::with_state(json!({}))
    }

    pub fn with_state(state: Value) -> Arc<Self> {
        Arc::new(Self {
            modules: Mutex::new(BTreeSet::new()),
            state: Mutex::new(state),
            calls: Mutex::new(Vec::new()),
            fail_register: Mutex::new(None),
        })
    }

    /// Pretend `path` is already registered.
    pub fn preload(&self, path: &str) {
        self.modules.lock().unwrap().insert(ModulePath::parse(path));
    }

    /// Make every following registration fail with `message`.
    pub fn fail_registrations(&self, message: &str) {
        *self.fail_register.lock().unwrap() = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn registered(&self) -> Vec<String> {
        self.modules
            .lock()
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    pub fn unregistered(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Unregister(path) => Some(path),
                StoreCall::Register { .. } => None,
            })
            .collect()
    }

    pub fn register_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, StoreCall::Register { .. }))
            .count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl Store for RecordingStore {
    fn has_module(&self, path: &ModulePath) -> bool {
        self.modules.lock().unwrap().contains(path)
    }

    fn register_module(
        &self,
        path: &ModulePath,
        _module: ModuleDefinition,
        options: RegisterOptions,
    ) -> NavResult<()> {
        if let Some(message) = self.fail_register.lock().unwrap().clone() {
            return Err(NavigationError::module_registration(message));
        }
        self.calls.lock().unwrap().push(StoreCall::Register {
            path: path.to_string(),
            preserve_state: options.preserve_state,
        });
        self.modules.lock().unwrap().insert(path.clone());
        Ok(())
    }

    fn unregister_module(&self, path: &ModulePath) -> NavResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(StoreCall::Unregister(path.to_string()));
        self.modules.lock().unwrap().remove(path);
        Ok(())
    }

    fn state(&self) -> Value {
        self.state.lock().unwrap().clone()
    }
}

// =============================================================================
// Router
// =============================================================================

/// Router whose component lookup always fails (e.g. a malformed route).
pub struct FailingRouter;

impl Router for FailingRouter {
    fn matched_components(&self, route: &Route) -> NavResult<Vec<Arc<dyn RouteComponent>>> {
        Err(NavigationError::route_resolution(format!(
            "cannot resolve {}",
            route.path
        )))
    }

    fn before_each(&self, _guard: GuardFn) {}
    fn before_resolve(&self, _guard: GuardFn) {}
    fn after_each(&self, _hook: AfterHookFn) {}
}

// =============================================================================
// Logger
// =============================================================================

/// Logger that keeps every message with its level.
#[derive(Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingLogger {
    pub fn messages(&self, level: &str) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    fn push(&self, level: &'static str, message: &str) {
        self.entries
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}

impl Logger for RecordingLogger {
    fn info(&self, message: &str) {
        self.push("info", message);
    }
    fn debug(&self, message: &str) {
        self.push("debug", message);
    }
    fn warn(&self, message: &str) {
        self.push("warn", message);
    }
    fn error(&self, message: &str) {
        self.push("error", message);
    }
}

// =============================================================================
// Builders
// =============================================================================

/// Component declaring one module per name.
pub fn with_modules(name: &str, modules: &[&str]) -> Component {
    modules.iter().fold(Component::new(name), |component, module| {
        component.store_module(ModuleDeclaration::new(*module, ModuleDefinition::new(())))
    })
}

pub fn shared(component: Component) -> Arc<dyn RouteComponent> {
    Arc::new(component)
}

pub fn context(
    router: Arc<dyn Router>,
    store: Arc<dyn Store>,
    route: Route,
    from: Route,
) -> FetchContext {
    FetchContext::new(AppHandle::default(), router, store, route, from)
}

/// Context over a router that matches nothing; for gate and pipeline tests.
pub fn bare_context(route: Route, from: Route) -> FetchContext {
    context(
        Arc::new(crate::MemoryRouter::new()),
        RecordingStore::new(),
        route,
        from,
    )
}
