//! Per-kind dependency predicates.
//!
//! Only kinds whose resources are tracked in a proxy's dependency scope are
//! registered here. A kind that is not registered gets no answer from this
//! registry; callers must treat it as affecting the proxy.

use std::collections::HashMap;

use crate::model::{kinds, DependencyScope, NameSet, ResourceKind, ScopeDependency};

/// Registry of `ResourceKind -> ScopeDependency` predicates.
#[derive(Debug, Clone)]
pub struct ScopePredicateRegistry {
    predicates: HashMap<ResourceKind, ScopeDependency>,
}

impl ScopePredicateRegistry {
    /// An empty registry. Every kind is then unknown.
    pub fn empty() -> Self {
        Self {
            predicates: HashMap::new(),
        }
    }

    /// Service registrations, routing rules and destination policies.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register(kinds::SERVICE_ENTRY, ScopeDependency::Service);
        registry.register(kinds::VIRTUAL_SERVICE, ScopeDependency::VirtualService);
        registry.register(kinds::DESTINATION_RULE, ScopeDependency::DestinationRule);
        registry
    }

    /// Register `kind`, replacing any previous category. Returns the old one.
    pub fn register(&mut self, kind: ResourceKind, category: ScopeDependency) -> Option<ScopeDependency> {
        self.predicates.insert(kind, category)
    }

    pub fn contains(&self, kind: &ResourceKind) -> bool {
        self.predicates.contains_key(kind)
    }

    pub fn category(&self, kind: &ResourceKind) -> Option<ScopeDependency> {
        self.predicates.get(kind).copied()
    }

    /// Evaluate the predicate for `kind`.
    ///
    /// Returns `None` when the kind is not registered. Otherwise an empty
    /// name set is a wildcard and always matches; a non-empty one matches
    /// when any name is in the proxy's scope.
    pub fn affects(&self, kind: &ResourceKind, scope: &dyn DependencyScope, names: &NameSet) -> Option<bool> {
        let category = self.predicates.get(kind)?;
        if names.is_empty() {
            return Some(true);
        }
        Some(names.iter().any(|name| category.contains(scope, name)))
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl Default for ScopePredicateRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SidecarScope;

    fn names(list: &[&str]) -> NameSet {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_wildcard_always_matches() {
        let registry = ScopePredicateRegistry::standard();
        let scope = SidecarScope::new();
        for kind in [kinds::SERVICE_ENTRY, kinds::VIRTUAL_SERVICE, kinds::DESTINATION_RULE] {
            assert_eq!(registry.affects(&kind, &scope, &NameSet::new()), Some(true));
        }
    }

    #[test]
    fn test_named_resources_checked_against_scope() {
        let registry = ScopePredicateRegistry::standard();
        let mut scope = SidecarScope::new();
        scope.add_config_dependency(&kinds::SERVICE_ENTRY, "svc1.com");
        scope.add_config_dependency(&kinds::DESTINATION_RULE, "dr1");

        assert_eq!(
            registry.affects(&kinds::SERVICE_ENTRY, &scope, &names(&["other.com", "svc1.com"])),
            Some(true)
        );
        assert_eq!(
            registry.affects(&kinds::SERVICE_ENTRY, &scope, &names(&["other.com"])),
            Some(false)
        );
        // Same name, wrong category.
        assert_eq!(
            registry.affects(&kinds::VIRTUAL_SERVICE, &scope, &names(&["dr1"])),
            Some(false)
        );
    }

    #[test]
    fn test_unregistered_kind_has_no_answer() {
        let registry = ScopePredicateRegistry::standard();
        let scope = SidecarScope::new();
        assert_eq!(registry.affects(&kinds::GATEWAY, &scope, &names(&["gw1"])), None);
        assert!(!registry.contains(&kinds::ENVOY_FILTER));
    }

    #[test]
    fn test_register_extra_kind() {
        let mut registry = ScopePredicateRegistry::standard();
        let backend = ResourceKind::new("example.io", "v1", "Backend");
        assert!(registry.register(backend.clone(), ScopeDependency::Service).is_none());

        let mut scope = SidecarScope::new();
        scope.add_dependency(ScopeDependency::Service, "b1");
        assert_eq!(registry.affects(&backend, &scope, &names(&["b1"])), Some(true));
        assert_eq!(registry.affects(&backend, &scope, &names(&["b2"])), Some(false));
        assert_eq!(registry.len(), 4);
    }
}
