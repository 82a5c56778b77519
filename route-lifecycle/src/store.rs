//! Store capabilities needed for dynamic module registration

use crate::{ModuleDefinition, ModulePath, NavResult};
use serde_json::Value;

/// Options passed along with a module registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegisterOptions {
    /// Keep the state already present at the module path (e.g. state
    /// hydrated from a server render) instead of replacing it with the
    /// module's initial state.
    pub preserve_state: bool,
}

/// A store that can grow and shrink its module tree at runtime.
///
/// Implementations must be shareable across the hooks installed on a router,
/// so every method takes `&self`.
pub trait Store: Send + Sync {
    /// True if a module is registered at `path`.
    fn has_module(&self, path: &ModulePath) -> bool;

    /// Register `module` at `path`.
    fn register_module(
        &self,
        path: &ModulePath,
        module: ModuleDefinition,
        options: RegisterOptions,
    ) -> NavResult<()>;

    /// Remove the module at `path` together with its state.
    fn unregister_module(&self, path: &ModulePath) -> NavResult<()>;

    /// Snapshot of the nested state tree.
    fn state(&self) -> Value;
}

/// True if `state` holds a non-null value at `path`, looked up key by key.
pub fn has_retained_state(state: &Value, path: &ModulePath) -> bool {
    let mut node = state;
    for segment in path.segments() {
        match node.get(segment) {
            Some(child) => node = child,
            None => return false,
        }
    }
    !node.is_null()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn retained_state_walks_nested_keys() {
        let state = json!({"catalog": {"filters": {"color": "red"}, "empty": null}});
        assert!(has_retained_state(&state, &ModulePath::parse("catalog")));
        assert!(has_retained_state(&state, &ModulePath::parse("catalog/filters")));
        assert!(!has_retained_state(&state, &ModulePath::parse("catalog/empty")));
        assert!(!has_retained_state(&state, &ModulePath::parse("catalog/missing")));
        assert!(!has_retained_state(&state, &ModulePath::parse("cart/items")));
    }

    #[test]
    fn scalar_parent_has_no_children() {
        let state = json!({"count": 3});
        assert!(!has_retained_state(&state, &ModulePath::parse("count/value")));
    }
}
