//! Store module declarations carried by route components

use crate::{NavResult, Route};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Separator between nested module names ("cart/items").
pub const MODULE_PATH_SEPARATOR: char = '/';

/// Location of a module in the store's module tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModulePath(Vec<String>);

impl ModulePath {
    /// Split a resolved module name on `/`.
    pub fn parse(name: &str) -> Self {
        Self(name.split(MODULE_PATH_SEPARATOR).map(str::to_string).collect())
    }

    /// Build a path from its segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Path segments, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Nesting depth (number of segments).
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// True if `self` is a strict ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &ModulePath) -> bool {
        self.depth() < other.depth() && other.0.starts_with(&self.0)
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        for segment in &self.0 {
            write!(f, "{sep}{segment}")?;
            sep = "/";
        }
        Ok(())
    }
}

/// Function computing a module name from the route being entered.
pub type ModuleNameFn = Arc<dyn Fn(&Route) -> NavResult<String> + Send + Sync>;

/// Name of a declared module.
#[derive(Clone)]
pub enum ModuleName {
    /// Fixed name, possibly nested ("catalog/filters")
    Literal(String),
    /// Name derived from the route (e.g. one module per product id)
    Resolver(ModuleNameFn),
}

impl ModuleName {
    /// Create a name resolved from the route at navigation time.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Route) -> NavResult<String> + Send + Sync + 'static,
    {
        Self::Resolver(Arc::new(f))
    }

    /// Resolve the name against `route`.
    pub fn resolve(&self, route: &Route) -> NavResult<String> {
        match self {
            Self::Literal(name) => Ok(name.clone()),
            Self::Resolver(f) => f(route),
        }
    }

    /// Resolve and split into a [`ModulePath`].
    pub fn resolve_path(&self, route: &Route) -> NavResult<ModulePath> {
        self.resolve(route).map(|name| ModulePath::parse(&name))
    }
}

impl fmt::Debug for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(name) => f.debug_tuple("Literal").field(name).finish(),
            Self::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

impl From<&str> for ModuleName {
    fn from(name: &str) -> Self {
        Self::Literal(name.to_string())
    }
}

impl From<String> for ModuleName {
    fn from(name: String) -> Self {
        Self::Literal(name)
    }
}

/// Opaque store-module definition handed to
/// [`Store::register_module`](crate::Store::register_module).
///
/// The store decides what a definition is; it downcasts to its own type.
#[derive(Clone)]
pub struct ModuleDefinition(Arc<dyn Any + Send + Sync>);

impl ModuleDefinition {
    /// Wrap a store-specific module definition.
    pub fn new<T: Any + Send + Sync>(definition: T) -> Self {
        Self(Arc::new(definition))
    }

    /// Borrow the definition as the store's concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for ModuleDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ModuleDefinition(..)")
    }
}

/// A module a component needs while it is on screen.
#[derive(Debug, Clone)]
pub struct ModuleDeclaration {
    /// Where the module lives in the store
    pub name: ModuleName,
    /// The module itself
    pub module: ModuleDefinition,
}

impl ModuleDeclaration {
    /// Declare a module.
    pub fn new(name: impl Into<ModuleName>, module: ModuleDefinition) -> Self {
        Self {
            name: name.into(),
            module,
        }
    }
}

/// The module declarations of one component: a single module or a list.
#[derive(Debug, Clone)]
pub enum StoreModules {
    /// One module
    Single(ModuleDeclaration),
    /// Several modules, registered in order
    Many(Vec<ModuleDeclaration>),
}

impl StoreModules {
    /// Iterate over the declarations in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ModuleDeclaration> {
        match self {
            Self::Single(declaration) => std::slice::from_ref(declaration).iter(),
            Self::Many(declarations) => declarations.iter(),
        }
    }

    /// Number of declared modules.
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Many(declarations) => declarations.len(),
        }
    }

    /// True if no modules are declared.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve every declared module name against `route`.
    pub fn resolve_paths(&self, route: &Route) -> NavResult<Vec<ModulePath>> {
        self.iter().map(|d| d.name.resolve_path(route)).collect()
    }
}

impl From<ModuleDeclaration> for StoreModules {
    fn from(declaration: ModuleDeclaration) -> Self {
        Self::Single(declaration)
    }
}

impl From<Vec<ModuleDeclaration>> for StoreModules {
    fn from(declarations: Vec<ModuleDeclaration>) -> Self {
        Self::Many(declarations)
    }
}

impl<'a> IntoIterator for &'a StoreModules {
    type Item = &'a ModuleDeclaration;
    type IntoIter = std::slice::Iter<'a, ModuleDeclaration>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NavigationError;

    #[test]
    fn nested_name_splits_into_segments() {
        let path = ModulePath::parse("foo/bar/baz");
        assert_eq!(path.segments(), ["foo", "bar", "baz"]);
        assert_eq!(path.depth(), 3);
        assert_eq!(path.to_string(), "foo/bar/baz");
    }

    #[test]
    fn ancestor_check() {
        let parent = ModulePath::parse("a");
        let child = ModulePath::parse("a/b");
        assert!(parent.is_ancestor_of(&child));
        assert!(!child.is_ancestor_of(&parent));
        assert!(!parent.is_ancestor_of(&parent));
        assert!(!ModulePath::parse("ab").is_ancestor_of(&ModulePath::parse("a/b")));
    }

    #[test]
    fn resolver_receives_route() {
        let name = ModuleName::from_fn(|route| {
            route
                .params
                .get("id")
                .map(|id| format!("product/{id}"))
                .ok_or_else(|| NavigationError::module_resolution("missing :id"))
        });
        let route = Route::new("/p/7").with_param("id", "7");
        assert_eq!(
            name.resolve_path(&route).unwrap(),
            ModulePath::from_segments(["product", "7"])
        );
        assert!(name.resolve(&Route::new("/p")).is_err());
    }

    #[test]
    fn single_and_many_flatten_alike() {
        let def = ModuleDefinition::new(());
        let single = StoreModules::from(ModuleDeclaration::new("a", def.clone()));
        let many = StoreModules::from(vec![
            ModuleDeclaration::new("a", def.clone()),
            ModuleDeclaration::new("a/b", def),
        ]);
        let route = Route::start();
        assert_eq!(single.resolve_paths(&route).unwrap().len(), 1);
        assert_eq!(
            many.resolve_paths(&route).unwrap(),
            vec![ModulePath::parse("a"), ModulePath::parse("a/b")]
        );
    }

    #[test]
    fn definition_downcasts_to_store_type() {
        let def = ModuleDefinition::new(String::from("cart"));
        assert_eq!(def.downcast_ref::<String>().map(String::as_str), Some("cart"));
        assert!(def.downcast_ref::<u32>().is_none());
    }
}
