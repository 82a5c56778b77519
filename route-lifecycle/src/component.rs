//! Route components as seen by the lifecycle layer
//!
//! The host framework owns its component types. This module only describes
//! the capabilities the lifecycle layer reads from them through
//! [`RouteComponent`], plus a [`Component`] builder for hosts (and tests)
//! that have no component type of their own.

use crate::{
    FetchContext, ModuleDeclaration, StoreModules, UpdatePolicy,
    fetch::{FetchDataFn, FetchOutcome, fetch_fn},
};
use std::future::Future;

/// Capabilities of a matched route component.
pub trait RouteComponent: Send + Sync {
    /// Component name, used in log messages.
    fn name(&self) -> &str;

    /// When this component wants its handlers to run on a route update.
    fn update_policy(&self) -> Option<&UpdatePolicy> {
        None
    }

    /// Store modules this component needs.
    fn store_modules(&self) -> Option<&StoreModules> {
        None
    }

    /// Data loader run before the navigation commits.
    fn fetch_data(&self) -> Option<&FetchDataFn> {
        None
    }
}

/// Component definition assembled with a builder.
///
/// # Example
/// ```rust,ignore
/// let page = Component::new("ProductPage")
///     .store_module(ModuleDeclaration::new("product", ModuleDefinition::new(product_module())))
///     .update_policy(UpdatePolicy::fields().query(true))
///     .fetch_data(|ctx| async move {
///         load_product(&ctx).await?;
///         Ok(None)
///     });
/// ```
#[derive(Clone, Default)]
pub struct Component {
    name: String,
    update_policy: Option<UpdatePolicy>,
    store_modules: Option<StoreModules>,
    fetch_data: Option<FetchDataFn>,
}

impl Component {
    /// Create a component with no modules, fetch or policy.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Declare a store module. Calling this repeatedly declares a list.
    pub fn store_module(mut self, declaration: ModuleDeclaration) -> Self {
        self.store_modules = Some(match self.store_modules.take() {
            None => StoreModules::Single(declaration),
            Some(StoreModules::Single(first)) => StoreModules::Many(vec![first, declaration]),
            Some(StoreModules::Many(mut list)) => {
                list.push(declaration);
                StoreModules::Many(list)
            }
        });
        self
    }

    /// Replace all module declarations.
    pub fn store_modules(mut self, modules: impl Into<StoreModules>) -> Self {
        self.store_modules = Some(modules.into());
        self
    }

    /// Set the route-update policy.
    pub fn update_policy(mut self, policy: impl Into<UpdatePolicy>) -> Self {
        self.update_policy = Some(policy.into());
        self
    }

    /// Set the data loader from an async function.
    pub fn fetch_data<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(FetchContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = FetchOutcome> + Send + 'static,
    {
        self.fetch_data = Some(fetch_fn(f));
        self
    }
}

impl RouteComponent for Component {
    fn name(&self) -> &str {
        &self.name
    }

    fn update_policy(&self) -> Option<&UpdatePolicy> {
        self.update_policy.as_ref()
    }

    fn store_modules(&self) -> Option<&StoreModules> {
        self.store_modules.as_ref()
    }

    fn fetch_data(&self) -> Option<&FetchDataFn> {
        self.fetch_data.as_ref()
    }
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name)
            .field("update_policy", &self.update_policy)
            .field("store_modules", &self.store_modules)
            .field("fetch_data", &self.fetch_data.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ModuleDefinition, Route};

    #[test]
    fn repeated_store_module_builds_a_list() {
        let def = ModuleDefinition::new(());
        let component = Component::new("Page")
            .store_module(ModuleDeclaration::new("a", def.clone()))
            .store_module(ModuleDeclaration::new("b", def.clone()))
            .store_module(ModuleDeclaration::new("c", def));

        let modules = RouteComponent::store_modules(&component).unwrap();
        let names: Vec<String> = modules
            .resolve_paths(&Route::start())
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn bare_component_declares_nothing() {
        let component = Component::new("Layout");
        assert_eq!(component.name(), "Layout");
        assert!(RouteComponent::store_modules(&component).is_none());
        assert!(RouteComponent::fetch_data(&component).is_none());
        assert!(RouteComponent::update_policy(&component).is_none());
    }
}
