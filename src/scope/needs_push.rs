//! Top-level per-proxy push decision.
//!
//! # Decision Order
//! ```text
//! no changed kinds: global change, push
//! coarse pre-filter (kind × role)
//!     → RoleMatch: push, nothing else consulted
//!     → NotApplicable: no push
//!     → Applies:
//!         affects_proxy (dependency scope)
//!         → namespace_scope_allows
//! ```
//!
//! The pre-filter resolves role-restricted kinds over the whole changed
//! set before falling back to the generic default, so the outcome never
//! depends on the order kinds were recorded in.

use crate::model::{kinds, ChangeEvent, DependencyScope, Proxy, ProxyRole, ResourceKind};
use crate::scope::affects::affects_proxy;
use crate::scope::namespace::namespace_scope_allows;
use crate::scope::registry::ScopePredicateRegistry;

/// Outcome of the kind/role pre-filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefilter {
    /// A kind restricted to this proxy's role changed.
    RoleMatch,
    /// Some unrestricted kind changed, or the event is global.
    Applies,
    /// Only kinds restricted to the other role changed.
    NotApplicable,
}

/// Role a kind is restricted to, if any.
fn restricted_role(kind: &ResourceKind) -> Option<ProxyRole> {
    if *kind == kinds::GATEWAY {
        Some(ProxyRole::Gateway)
    } else if kinds::is_quota(kind) {
        Some(ProxyRole::Sidecar)
    } else {
        None
    }
}

/// Coarse, dependency-unaware filter over changed kinds.
pub fn prefilter(event: &ChangeEvent, role: ProxyRole) -> Prefilter {
    if event.is_unscoped() {
        return Prefilter::Applies;
    }

    let mut applies = false;
    for kind in event.changed_kinds() {
        match restricted_role(kind) {
            Some(restricted) if restricted == role => return Prefilter::RoleMatch,
            Some(_) => {}
            None => applies = true,
        }
    }

    if applies {
        Prefilter::Applies
    } else {
        Prefilter::NotApplicable
    }
}

/// Whether `proxy` needs any push at all for `event`.
pub fn proxy_needs_push<S: DependencyScope>(
    registry: &ScopePredicateRegistry,
    event: &ChangeEvent,
    proxy: &Proxy<S>,
) -> bool {
    // A global change reaches every proxy; namespaces do not narrow it.
    if event.is_unscoped() {
        return true;
    }

    match prefilter(event, proxy.role) {
        Prefilter::RoleMatch => return true,
        Prefilter::NotApplicable => return false,
        Prefilter::Applies => {}
    }

    if !affects_proxy(registry, event, proxy) {
        return false;
    }

    namespace_scope_allows(event, proxy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ServiceBinding, SidecarScope};

    const SVC: &str = "svc1.com";
    const DR: &str = "dr1";
    const VS: &str = "vs1";

    fn sidecar() -> Proxy {
        let mut scope = SidecarScope::new();
        scope.add_config_dependency(&kinds::SERVICE_ENTRY, SVC);
        scope.add_config_dependency(&kinds::VIRTUAL_SERVICE, VS);
        scope.add_config_dependency(&kinds::DESTINATION_RULE, DR);
        Proxy::new("sidecar-0", ProxyRole::Sidecar, scope)
    }

    fn gateway() -> Proxy {
        Proxy::new("gateway-0", ProxyRole::Gateway, SidecarScope::new())
    }

    #[test]
    fn test_prefilter() {
        let gw_only = ChangeEvent::builder().resource_changed(kinds::GATEWAY, "gw1").build();
        assert_eq!(prefilter(&gw_only, ProxyRole::Gateway), Prefilter::RoleMatch);
        assert_eq!(prefilter(&gw_only, ProxyRole::Sidecar), Prefilter::NotApplicable);

        let quota = ChangeEvent::builder().kind_changed(kinds::QUOTA_SPEC_BINDING).build();
        assert_eq!(prefilter(&quota, ProxyRole::Sidecar), Prefilter::RoleMatch);
        assert_eq!(prefilter(&quota, ProxyRole::Gateway), Prefilter::NotApplicable);

        assert_eq!(prefilter(&ChangeEvent::global(), ProxyRole::Gateway), Prefilter::Applies);
    }

    #[test]
    fn test_role_match_found_behind_generic_kind() {
        // The destination rule orders before the gateway kind; the role match
        // must still win.
        let event = ChangeEvent::builder()
            .resource_changed(kinds::DESTINATION_RULE, "unrelated")
            .resource_changed(kinds::GATEWAY, "gw1")
            .build();
        assert_eq!(prefilter(&event, ProxyRole::Gateway), Prefilter::RoleMatch);
        assert_eq!(prefilter(&event, ProxyRole::Sidecar), Prefilter::Applies);
    }

    #[test]
    fn test_global_change_ignores_namespaces() {
        let registry = ScopePredicateRegistry::standard();
        let event = ChangeEvent::builder().namespace("elsewhere").build();
        assert!(proxy_needs_push(&registry, &event, &sidecar()));
        assert!(proxy_needs_push(&registry, &event, &gateway()));
    }

    #[test]
    fn test_role_specific_kinds() {
        let registry = ScopePredicateRegistry::standard();

        let gw = ChangeEvent::builder().resource_changed(kinds::GATEWAY, "name1").build();
        assert!(!proxy_needs_push(&registry, &gw, &sidecar()));
        assert!(proxy_needs_push(&registry, &gw, &gateway()));

        let quota = ChangeEvent::builder().resource_changed(kinds::QUOTA_SPEC, "name1").build();
        assert!(proxy_needs_push(&registry, &quota, &sidecar()));
        assert!(!proxy_needs_push(&registry, &quota, &gateway()));
    }

    #[test]
    fn test_role_match_skips_namespace_filter() {
        let registry = ScopePredicateRegistry::standard();
        let event = ChangeEvent::builder()
            .namespace("elsewhere")
            .resource_changed(kinds::GATEWAY, "gw1")
            .build();
        assert!(proxy_needs_push(&registry, &event, &gateway()));
    }

    #[test]
    fn test_role_match_behind_generic_kind_skips_namespace_filter() {
        let registry = ScopePredicateRegistry::standard();
        let event = ChangeEvent::builder()
            .namespace("elsewhere")
            .resource_changed(kinds::DESTINATION_RULE, "x")
            .resource_changed(kinds::GATEWAY, "gw")
            .build();
        assert!(proxy_needs_push(&registry, &event, &gateway()));
    }

    #[test]
    fn test_unknown_kind_pushes() {
        let registry = ScopePredicateRegistry::standard();
        let event = ChangeEvent::builder()
            .kind_changed(ResourceKind::new("", "", "INVALID_KIND"))
            .build();
        assert!(proxy_needs_push(&registry, &event, &sidecar()));
    }

    #[test]
    fn test_scoped_kinds_with_namespaces() {
        let registry = ScopePredicateRegistry::standard();
        let proxy = sidecar();

        for (kind, name) in [
            (kinds::SERVICE_ENTRY, SVC),
            (kinds::VIRTUAL_SERVICE, VS),
            (kinds::DESTINATION_RULE, DR),
        ] {
            for (namespace, want) in [(None, true), (Some("ns1invalid"), false)] {
                let with_ns = |b: crate::model::ChangeEventBuilder| match namespace {
                    Some(ns) => b.namespace(ns),
                    None => b,
                };

                let matched = with_ns(ChangeEvent::builder().resource_changed(kind.clone(), name)).build();
                assert_eq!(proxy_needs_push(&registry, &matched, &proxy), want, "{kind} {namespace:?}");

                let wildcard = with_ns(ChangeEvent::builder().kind_changed(kind.clone())).build();
                assert_eq!(proxy_needs_push(&registry, &wildcard, &proxy), want, "{kind} wildcard {namespace:?}");

                let unmatched = with_ns(
                    ChangeEvent::builder().resource_changed(kind.clone(), format!("{name}invalid")),
                )
                .build();
                assert!(!proxy_needs_push(&registry, &unmatched, &proxy), "{kind} unmatched {namespace:?}");
            }
        }
    }

    #[test]
    fn test_namespace_narrowing_via_binding() {
        let registry = ScopePredicateRegistry::standard();
        let proxy = sidecar().with_binding(ServiceBinding::new("app.ns1.svc", "ns1"));
        let event = ChangeEvent::builder()
            .namespace("ns1")
            .resource_changed(kinds::SERVICE_ENTRY, SVC)
            .build();
        assert!(proxy_needs_push(&registry, &event, &proxy));
    }
}
