//! In-memory router and store
//!
//! Small host implementations for running the lifecycle layer natively: in
//! tests, in server renders, or in demos. [`MemoryRouter`] does no pattern
//! matching; routes are looked up by name, then by exact path.

use crate::{
    ModuleDefinition, ModulePath, NavResult, NavigationDirective, NavigationError,
    RegisterOptions, Route, RouteComponent, Router, Store,
    router::{AfterHookFn, GuardFn},
};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

// =============================================================================
// MemoryRouter
// =============================================================================

/// How a navigation through [`MemoryRouter::navigate`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationResult {
    /// The destination became the current route
    Completed,
    /// A guard redirected; the current route is unchanged
    Redirected(String),
    /// A guard aborted; the current route is unchanged
    Aborted,
}

/// Router with a fixed table of component chains.
#[derive(Default)]
pub struct MemoryRouter {
    by_name: HashMap<String, Vec<Arc<dyn RouteComponent>>>,
    by_path: HashMap<String, Vec<Arc<dyn RouteComponent>>>,
    current: Mutex<Route>,
    before_each: RwLock<Vec<GuardFn>>,
    before_resolve: RwLock<Vec<GuardFn>>,
    after_each: RwLock<Vec<AfterHookFn>>,
}

impl MemoryRouter {
    /// Empty router sitting on [`Route::start`].
    pub fn new() -> Self {
        Self {
            current: Mutex::new(Route::start()),
            ..Default::default()
        }
    }

    /// Match `components` (outermost first) for the named route entry.
    pub fn route(
        mut self,
        name: impl Into<String>,
        components: Vec<Arc<dyn RouteComponent>>,
    ) -> Self {
        self.by_name.insert(name.into(), components);
        self
    }

    /// Match `components` for an unnamed route at exactly `path`.
    pub fn path(
        mut self,
        path: impl Into<String>,
        components: Vec<Arc<dyn RouteComponent>>,
    ) -> Self {
        self.by_path.insert(path.into(), components);
        self
    }

    /// The committed route.
    pub fn current_route(&self) -> Route {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Set the current route without running any hooks (initial route of a
    /// hydrated client).
    pub fn replace_current(&self, route: Route) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = route;
    }

    /// Navigate to `to`, running guards and hooks in router order.
    ///
    /// An error returned by a guard cancels the navigation and is returned.
    pub async fn navigate(&self, to: Route) -> NavResult<NavigationResult> {
        let from = self.current_route();

        let guards: Vec<GuardFn> = read(&self.before_each)
            .iter()
            .chain(read(&self.before_resolve).iter())
            .cloned()
            .collect();
        for guard in guards {
            match guard(to.clone(), from.clone()).await? {
                None => {}
                Some(NavigationDirective::Redirect(location)) => {
                    return Ok(NavigationResult::Redirected(location));
                }
                Some(NavigationDirective::Abort) => return Ok(NavigationResult::Aborted),
            }
        }

        self.replace_current(to.clone());

        let hooks: Vec<AfterHookFn> = read(&self.after_each).clone();
        for hook in hooks {
            hook(to.clone(), from.clone()).await;
        }
        Ok(NavigationResult::Completed)
    }
}

fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl Router for MemoryRouter {
    fn matched_components(&self, route: &Route) -> NavResult<Vec<Arc<dyn RouteComponent>>> {
        let matched = route
            .name
            .as_ref()
            .and_then(|name| self.by_name.get(name))
            .or_else(|| self.by_path.get(&route.path));
        Ok(matched.cloned().unwrap_or_default())
    }

    fn before_each(&self, guard: GuardFn) {
        write(&self.before_each).push(guard);
    }

    fn before_resolve(&self, guard: GuardFn) {
        write(&self.before_resolve).push(guard);
    }

    fn after_each(&self, hook: AfterHookFn) {
        write(&self.after_each).push(hook);
    }
}

impl std::fmt::Debug for MemoryRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.by_name.keys().collect();
        names.sort();
        f.debug_struct("MemoryRouter")
            .field("routes", &names)
            .field("current", &self.current_route())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// MemoryStore
// =============================================================================

/// Initial state of a module registered on a [`MemoryStore`].
///
/// Definitions of any other type register with an empty object as state.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleState(pub Value);

#[derive(Default)]
struct StoreInner {
    modules: BTreeMap<ModulePath, ModuleDefinition>,
    state: Value,
}

/// Store keeping a JSON state tree and a table of registered modules.
pub struct MemoryStore {
    inner: RwLock<StoreInner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::with_state(Value::Object(Map::new()))
    }

    /// Store whose state tree starts as `state` (e.g. state serialized by a
    /// server render). Modules still have to be registered.
    pub fn with_state(state: Value) -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                modules: BTreeMap::new(),
                state,
            }),
        }
    }

    /// Registered module paths, sorted.
    pub fn modules(&self) -> Vec<ModulePath> {
        read(&self.inner).modules.keys().cloned().collect()
    }

    /// Value at `path` in the state tree.
    pub fn state_at(&self, path: &ModulePath) -> Option<Value> {
        let inner = read(&self.inner);
        let mut node = &inner.state;
        for segment in path.segments() {
            node = node.get(segment)?;
        }
        Some(node.clone())
    }

    /// Replace the value at `path`; parents must exist.
    pub fn set_state(&self, path: &ModulePath, value: Value) -> NavResult<()> {
        let mut inner = write(&self.inner);
        let slot = slot_mut(&mut inner.state, path)?;
        *slot = value;
        Ok(())
    }
}

/// Mutable slot for the last segment of `path`, creating it if missing.
fn slot_mut<'a>(state: &'a mut Value, path: &ModulePath) -> NavResult<&'a mut Value> {
    let (last, parents) = path
        .segments()
        .split_last()
        .ok_or_else(|| NavigationError::module_registration("empty module path"))?;
    let mut node = state;
    for segment in parents {
        node = node
            .get_mut(segment)
            .filter(|child| child.is_object())
            .ok_or_else(|| {
                NavigationError::module_registration(format!(
                    "parent state missing for module {path}"
                ))
            })?;
    }
    let object = node.as_object_mut().ok_or_else(|| {
        NavigationError::module_registration(format!("parent state of {path} is not an object"))
    })?;
    Ok(object.entry(last.clone()).or_insert(Value::Null))
}

impl Store for MemoryStore {
    fn has_module(&self, path: &ModulePath) -> bool {
        read(&self.inner).modules.contains_key(path)
    }

    fn register_module(
        &self,
        path: &ModulePath,
        module: ModuleDefinition,
        options: RegisterOptions,
    ) -> NavResult<()> {
        let mut inner = write(&self.inner);
        if inner.modules.contains_key(path) {
            return Err(NavigationError::module_registration(format!(
                "duplicate module: {path}"
            )));
        }
        let parent_registered = match path.segments().split_last() {
            Some((_, [])) => true,
            Some((_, parents)) => inner
                .modules
                .contains_key(&ModulePath::from_segments(parents.iter().cloned())),
            None => false,
        };
        if !parent_registered {
            return Err(NavigationError::module_registration(format!(
                "parent module of {path} is not registered"
            )));
        }

        let slot = slot_mut(&mut inner.state, path)?;
        if !options.preserve_state || slot.is_null() {
            *slot = module
                .downcast_ref::<ModuleState>()
                .map(|s| s.0.clone())
                .unwrap_or_else(|| Value::Object(Map::new()));
        }
        inner.modules.insert(path.clone(), module);
        Ok(())
    }

    fn unregister_module(&self, path: &ModulePath) -> NavResult<()> {
        let mut inner = write(&self.inner);
        if inner.modules.remove(path).is_none() {
            return Err(NavigationError::module_removal(format!(
                "module not registered: {path}"
            )));
        }
        let (last, parents) = path
            .segments()
            .split_last()
            .ok_or_else(|| NavigationError::module_removal("empty module path"))?;
        let mut node = &mut inner.state;
        for segment in parents {
            match node.get_mut(segment) {
                Some(child) => node = child,
                None => return Ok(()),
            }
        }
        if let Some(object) = node.as_object_mut() {
            object.remove(last);
        }
        Ok(())
    }

    fn state(&self) -> Value {
        read(&self.inner).state.clone()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("modules", &self.modules())
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Component;
    use serde_json::json;

    fn def(state: Value) -> ModuleDefinition {
        ModuleDefinition::new(ModuleState(state))
    }

    #[test]
    fn register_sets_initial_state() {
        let store = MemoryStore::new();
        let path = ModulePath::parse("cart");
        store
            .register_module(&path, def(json!({"items": []})), RegisterOptions::default())
            .unwrap();
        assert!(store.has_module(&path));
        assert_eq!(store.state(), json!({"cart": {"items": []}}));
    }

    #[test]
    fn preserve_state_keeps_hydrated_value() {
        let store = MemoryStore::with_state(json!({"cart": {"items": [1, 2]}}));
        let path = ModulePath::parse("cart");
        store
            .register_module(
                &path,
                def(json!({"items": []})),
                RegisterOptions {
                    preserve_state: true,
                },
            )
            .unwrap();
        assert_eq!(store.state_at(&path), Some(json!({"items": [1, 2]})));
    }

    #[test]
    fn nested_module_requires_parent() {
        let store = MemoryStore::new();
        let child = ModulePath::parse("a/b");
        assert!(store
            .register_module(&child, def(json!({})), RegisterOptions::default())
            .is_err());

        store
            .register_module(&ModulePath::parse("a"), def(json!({})), RegisterOptions::default())
            .unwrap();
        store
            .register_module(&child, def(json!({"n": 1})), RegisterOptions::default())
            .unwrap();
        assert_eq!(store.state(), json!({"a": {"b": {"n": 1}}}));
    }

    #[test]
    fn unregister_removes_state() {
        let store = MemoryStore::new();
        let path = ModulePath::parse("cart");
        store
            .register_module(&path, def(json!({})), RegisterOptions::default())
            .unwrap();
        store.unregister_module(&path).unwrap();
        assert!(!store.has_module(&path));
        assert_eq!(store.state(), json!({}));
        assert!(store.unregister_module(&path).is_err());
    }

    #[test]
    fn router_matches_by_name_then_path() {
        let page: Arc<dyn RouteComponent> = Arc::new(Component::new("Page"));
        let about: Arc<dyn RouteComponent> = Arc::new(Component::new("About"));
        let router = MemoryRouter::new()
            .route("page", vec![page])
            .path("/about", vec![about]);

        let named = router
            .matched_components(&Route::new("/x").named("page"))
            .unwrap();
        assert_eq!(named[0].name(), "Page");

        let by_path = router.matched_components(&Route::new("/about")).unwrap();
        assert_eq!(by_path[0].name(), "About");

        assert!(router.matched_components(&Route::new("/nowhere")).unwrap().is_empty());
    }
}
