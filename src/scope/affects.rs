//! Dependency-aware "does this event touch this proxy" check.

use crate::model::{ChangeEvent, DependencyScope, Proxy};
use crate::scope::registry::ScopePredicateRegistry;

/// Logical OR of the registry predicates over every changed kind.
///
/// An unscoped event always affects the proxy, and so does any kind the
/// registry does not know. Iteration order cannot change the result: each
/// term is either true, which ends the scan, or false.
pub fn affects_proxy<S: DependencyScope>(
    registry: &ScopePredicateRegistry,
    event: &ChangeEvent,
    proxy: &Proxy<S>,
) -> bool {
    if event.is_unscoped() {
        return true;
    }

    event
        .configs_updated()
        .iter()
        .any(|(kind, names)| registry.affects(kind, &proxy.scope, names).unwrap_or(true))
}
