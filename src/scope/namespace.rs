//! Namespace narrowing.

use crate::model::{ChangeEvent, DependencyScope, Proxy};

/// Whether the namespaces touched by `event` are relevant to `proxy`.
///
/// With no namespaces in the event there is nothing to narrow. Otherwise the
/// proxy qualifies if its primary service binding lives in one of them, or
/// if its scope imports any of them.
pub fn namespace_scope_allows<S: DependencyScope>(event: &ChangeEvent, proxy: &Proxy<S>) -> bool {
    let namespaces = event.namespaces_updated();
    if namespaces.is_empty() {
        return true;
    }

    if let Some(ns) = proxy.primary_namespace() {
        if namespaces.contains(ns) {
            return true;
        }
    }

    namespaces.iter().any(|ns| proxy.scope.depends_on_namespace(ns))
}
