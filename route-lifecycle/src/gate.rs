//! Route-update gate
//!
//! Decides whether a component's modules and data loader take part in a
//! transition. Moving between different route-table entries always counts.
//! Within the same entry, a component's [`UpdatePolicy`] says which parts of
//! the location it cares about; without a policy only a path change counts.

use crate::{FetchContext, Route, RouteComponent};
use std::fmt;
use std::sync::Arc;

/// Predicate deciding a transition on its own.
pub type PolicyFn = Arc<dyn Fn(&FetchContext) -> bool + Send + Sync>;

/// Per-component route-update policy.
#[derive(Clone)]
pub enum UpdatePolicy {
    /// Compare selected parts of the location
    Fields(FieldPolicy),
    /// Delegate the decision entirely
    Predicate(PolicyFn),
}

impl UpdatePolicy {
    /// Start from the default field policy (path only).
    pub fn fields() -> FieldPolicy {
        FieldPolicy::default()
    }

    /// Decide with a predicate over the fetch context.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&FetchContext) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(f))
    }
}

impl fmt::Debug for UpdatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fields(fields) => f.debug_tuple("Fields").field(fields).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl From<FieldPolicy> for UpdatePolicy {
    fn from(fields: FieldPolicy) -> Self {
        Self::Fields(fields)
    }
}

/// Field policy as declared by a component. Unset fields fall back to
/// [`ResolvedPolicy::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldPolicy {
    /// React to path changes
    pub path: Option<bool>,
    /// React to query changes
    pub query: Option<bool>,
    /// React to hash changes
    pub hash: Option<bool>,
}

impl FieldPolicy {
    /// React (or not) to path changes.
    pub fn path(mut self, enabled: bool) -> Self {
        self.path = Some(enabled);
        self
    }

    /// React (or not) to query changes.
    pub fn query(mut self, enabled: bool) -> Self {
        self.query = Some(enabled);
        self
    }

    /// React (or not) to hash changes.
    pub fn hash(mut self, enabled: bool) -> Self {
        self.hash = Some(enabled);
        self
    }

    /// Merge with the defaults.
    pub fn resolve(&self) -> ResolvedPolicy {
        let defaults = ResolvedPolicy::default();
        ResolvedPolicy {
            path: self.path.unwrap_or(defaults.path),
            query: self.query.unwrap_or(defaults.query),
            hash: self.hash.unwrap_or(defaults.hash),
        }
    }
}

/// Field policy with every field decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPolicy {
    /// React to path changes
    pub path: bool,
    /// React to query changes
    pub query: bool,
    /// React to hash changes
    pub hash: bool,
}

impl Default for ResolvedPolicy {
    fn default() -> Self {
        Self {
            path: true,
            query: false,
            hash: false,
        }
    }
}

impl ResolvedPolicy {
    /// True if any enabled field differs between the two routes.
    pub fn is_triggered(&self, from: &Route, to: &Route) -> bool {
        (self.path && from.path != to.path)
            || (self.query && from.query != to.query)
            || (self.hash && from.hash != to.hash)
    }
}

/// Should `component` process the transition described by `ctx`?
pub fn should_process(component: &dyn RouteComponent, ctx: &FetchContext) -> bool {
    if ctx.from.name != ctx.route.name {
        return true;
    }
    match component.update_policy() {
        Some(UpdatePolicy::Predicate(f)) => f(ctx),
        Some(UpdatePolicy::Fields(fields)) => fields.resolve().is_triggered(&ctx.from, &ctx.route),
        None => ResolvedPolicy::default().is_triggered(&ctx.from, &ctx.route),
    }
}
