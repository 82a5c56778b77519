//! Route-scoped store module lifecycle
//!
//! Modules declared by route components are registered right before a
//! navigation commits and removed once neither side of a later transition
//! needs them.
//!
//! Removal is deferred through a queue. After each transition the modules of
//! the route just left are queued, shallow paths first, and the queue is
//! drained from its tail on the next transition. Nested modules are
//! therefore removed before their parents:
//!
//! ```text
//! leave /cart      queue = [cart, cart/items]
//! next transition  pop cart/items → unregister
//!                  pop cart       → unregister
//! ```
//!
//! A queued module that is still referenced by either route of the current
//! transition is put back instead of removed.

use crate::{
    FetchContext, LifecycleConfig, Logger, ModuleDefinition, ModulePath, NavResult,
    RegisterOptions, Route, RouteComponent, Router, Store, gate::should_process,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Registers and removes the store modules of route components.
///
/// One instance is created per router/store pairing and owns the removal
/// queue for that pairing.
pub struct ModuleLifecycle {
    store: Arc<dyn Store>,
    logger: Arc<dyn Logger>,
    log_skips_at_info: bool,
    removal_queue: Mutex<Vec<ModulePath>>,
}

impl ModuleLifecycle {
    /// Create a lifecycle manager for `store`.
    pub fn new(store: Arc<dyn Store>, logger: Arc<dyn Logger>) -> Self {
        Self {
            store,
            logger,
            log_skips_at_info: true,
            removal_queue: Mutex::new(Vec::new()),
        }
    }

    /// Apply logging preferences from `config`.
    pub fn with_config(mut self, config: &LifecycleConfig) -> Self {
        self.log_skips_at_info = config.log_skipped_registrations;
        self
    }

    /// Modules waiting for removal, in queue order (the tail is removed first).
    pub fn pending_removals(&self) -> Vec<ModulePath> {
        self.queue().clone()
    }

    /// Register one module unless the store already has it.
    ///
    /// State already present at the path (for example state hydrated from a
    /// server render) is preserved. Returns `false` for a skip.
    pub fn register_module(&self, path: &ModulePath, module: ModuleDefinition) -> NavResult<bool> {
        if self.store.has_module(path) {
            let message = format!("Skipping registration of store module: {path}");
            if self.log_skips_at_info {
                self.logger.info(&message);
            } else {
                self.logger.debug(&message);
            }
            return Ok(false);
        }

        let preserve_state = crate::store::has_retained_state(&self.store.state(), path);
        self.logger.info(&format!(
            "Registering store module: {path} (preserve_state: {preserve_state})"
        ));
        self.store
            .register_module(path, module, RegisterOptions { preserve_state })?;
        Ok(true)
    }

    /// Pre-commit step: register the modules of every component on the
    /// destination route that passes the route-update gate.
    ///
    /// Any error aborts the navigation. Returns the number of modules
    /// registered.
    pub fn register_route_modules(&self, ctx: &FetchContext) -> NavResult<usize> {
        let components = components_with_modules(ctx.router.as_ref(), &ctx.route)?;
        let mut registered = 0;
        for component in components.iter().filter(|c| should_process(c.as_ref(), ctx)) {
            registered += self.register_component(component.as_ref(), &ctx.route)?;
        }
        Ok(registered)
    }

    /// Register the modules of every component matched by `route`, with no
    /// gate. Used for server renders and client hydration, where there is no
    /// previous route to compare against.
    pub fn register_all(&self, router: &dyn Router, route: &Route) -> NavResult<usize> {
        let mut registered = 0;
        for component in components_with_modules(router, route)? {
            registered += self.register_component(component.as_ref(), route)?;
        }
        Ok(registered)
    }

    fn register_component(
        &self,
        component: &dyn RouteComponent,
        route: &Route,
    ) -> NavResult<usize> {
        let Some(modules) = component.store_modules() else {
            return Ok(0);
        };
        let mut registered = 0;
        for declaration in modules {
            let path = declaration.name.resolve_path(route)?;
            if self.register_module(&path, declaration.module.clone())? {
                registered += 1;
            }
        }
        Ok(registered)
    }

    /// Post-commit step: remove queued modules no longer referenced by
    /// either route, then queue the modules of the route just left.
    ///
    /// Returns the number of modules removed.
    pub fn release_inactive_modules(&self, ctx: &FetchContext) -> NavResult<usize> {
        let to_components = ctx.router.matched_components(&ctx.route)?;
        if !to_components.iter().any(|c| should_process(c.as_ref(), ctx)) {
            self.logger.debug(&format!(
                "No components to process for {} -> {}, leaving store modules untouched",
                ctx.from.full_path(),
                ctx.route.full_path()
            ));
            return Ok(0);
        }

        let to_names = module_names(&to_components, &ctx.route)?;
        let from_components = ctx.router.matched_components(&ctx.from)?;
        let from_names = module_names(&from_components, &ctx.from)?;
        let active: HashSet<&ModulePath> = to_names.iter().chain(from_names.iter()).collect();

        let mut queue = self.queue();
        let mut requeue = Vec::new();
        let mut removed = 0;
        while let Some(path) = queue.pop() {
            if active.contains(&path) {
                self.logger
                    .debug(&format!("Store module still active, requeueing: {path}"));
                requeue.push(path);
            } else if !self.store.has_module(&path) {
                self.logger
                    .debug(&format!("Store module already removed: {path}"));
            } else {
                self.logger.info(&format!("Unregistering store module: {path}"));
                match self.store.unregister_module(&path) {
                    Ok(()) => removed += 1,
                    Err(err) => {
                        self.logger.error(&format!(
                            "Failed to unregister store module {path}: {err}"
                        ));
                        requeue.push(path);
                    }
                }
            }
        }

        let mut seen = HashSet::new();
        let mut next: Vec<ModulePath> = requeue
            .into_iter()
            .chain(from_names)
            .filter(|path| seen.insert(path.clone()))
            .collect();
        // Stable: equal depths keep their order.
        next.sort_by_key(ModulePath::depth);
        queue.extend(next);

        Ok(removed)
    }

    fn queue(&self) -> MutexGuard<'_, Vec<ModulePath>> {
        self.removal_queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ModuleLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleLifecycle")
            .field("removal_queue", &self.pending_removals())
            .finish_non_exhaustive()
    }
}

fn components_with_modules(
    router: &dyn Router,
    route: &Route,
) -> NavResult<Vec<Arc<dyn RouteComponent>>> {
    let mut components = router.matched_components(route)?;
    components.retain(|c| c.store_modules().is_some_and(|m| !m.is_empty()));
    Ok(components)
}

/// Module paths referenced by `components`, resolved against `route`.
pub fn module_names(
    components: &[Arc<dyn RouteComponent>],
    route: &Route,
) -> NavResult<Vec<ModulePath>> {
    let mut names = Vec::new();
    for modules in components.iter().filter_map(|c| c.store_modules()) {
        names.extend(modules.resolve_paths(route)?);
    }
    Ok(names)
}
