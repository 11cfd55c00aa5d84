//! Read-only view of a connected data-plane proxy.
//!
//! The control plane keeps one `Proxy` per connection. Push scoping only
//! reads the role, the service bindings and the dependency scope.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::kind::{kinds, ResourceKind};

/// Role a proxy plays in the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProxyRole {
    /// Proxy deployed next to a workload.
    Sidecar,
    /// Standalone ingress/egress router.
    Gateway,
}

impl ProxyRole {
    pub const ALL: [ProxyRole; 2] = [ProxyRole::Sidecar, ProxyRole::Gateway];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProxyRole::Sidecar => "sidecar",
            ProxyRole::Gateway => "gateway",
        }
    }
}

impl fmt::Display for ProxyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Membership oracles over the resources a proxy's active configuration
/// depends on.
///
/// Implementations must be side-effect free; they are queried concurrently
/// from many evaluations.
pub trait DependencyScope: Send + Sync {
    fn depends_on_service(&self, hostname: &str) -> bool;
    fn depends_on_virtual_service(&self, name: &str) -> bool;
    fn depends_on_destination_rule(&self, name: &str) -> bool;
    /// True if the proxy imports configuration from `namespace`.
    fn depends_on_namespace(&self, namespace: &str) -> bool;
}

/// The dependency category a scoped resource kind is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeDependency {
    Service,
    VirtualService,
    DestinationRule,
}

impl ScopeDependency {
    /// Category of a built-in kind, if it has one.
    pub fn for_kind(kind: &ResourceKind) -> Option<Self> {
        if *kind == kinds::SERVICE_ENTRY {
            Some(ScopeDependency::Service)
        } else if *kind == kinds::VIRTUAL_SERVICE {
            Some(ScopeDependency::VirtualService)
        } else if *kind == kinds::DESTINATION_RULE {
            Some(ScopeDependency::DestinationRule)
        } else {
            None
        }
    }

    /// Ask `scope` whether it depends on `name` in this category.
    pub fn contains(&self, scope: &dyn DependencyScope, name: &str) -> bool {
        match self {
            ScopeDependency::Service => scope.depends_on_service(name),
            ScopeDependency::VirtualService => scope.depends_on_virtual_service(name),
            ScopeDependency::DestinationRule => scope.depends_on_destination_rule(name),
        }
    }
}

/// Set-backed dependency scope, as computed for a sidecar's egress listeners.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SidecarScope {
    pub services: BTreeSet<String>,
    pub virtual_services: BTreeSet<String>,
    pub destination_rules: BTreeSet<String>,
    pub namespaces: BTreeSet<String>,
}

impl SidecarScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the proxy's configuration depends on resource `name` of `kind`.
    ///
    /// Kinds without a dependency category are ignored.
    pub fn add_config_dependency(&mut self, kind: &ResourceKind, name: impl Into<String>) {
        match ScopeDependency::for_kind(kind) {
            Some(category) => self.add_dependency(category, name),
            None => tracing::trace!(%kind, "kind has no dependency category, ignoring"),
        }
    }

    pub fn add_dependency(&mut self, category: ScopeDependency, name: impl Into<String>) {
        let set = match category {
            ScopeDependency::Service => &mut self.services,
            ScopeDependency::VirtualService => &mut self.virtual_services,
            ScopeDependency::DestinationRule => &mut self.destination_rules,
        };
        set.insert(name.into());
    }

    pub fn import_namespace(&mut self, namespace: impl Into<String>) {
        self.namespaces.insert(namespace.into());
    }
}

impl DependencyScope for SidecarScope {
    fn depends_on_service(&self, hostname: &str) -> bool {
        self.services.contains(hostname)
    }

    fn depends_on_virtual_service(&self, name: &str) -> bool {
        self.virtual_services.contains(name)
    }

    fn depends_on_destination_rule(&self, name: &str) -> bool {
        self.destination_rules.contains(name)
    }

    fn depends_on_namespace(&self, namespace: &str) -> bool {
        self.namespaces.contains(namespace)
    }
}

/// A service the proxy's workload is registered under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceBinding {
    pub hostname: String,
    pub namespace: String,
}

impl ServiceBinding {
    pub fn new(hostname: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            namespace: namespace.into(),
        }
    }
}

/// A connected proxy, generic over its dependency scope oracle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proxy<S = SidecarScope> {
    /// Connection identifier, used for logging and plans.
    pub id: String,

    pub role: ProxyRole,

    #[serde(default)]
    pub scope: S,

    /// Service bindings in registration order; the first one is primary.
    #[serde(default)]
    pub service_bindings: Vec<ServiceBinding>,
}

impl<S: DependencyScope> Proxy<S> {
    pub fn new(id: impl Into<String>, role: ProxyRole, scope: S) -> Self {
        Self {
            id: id.into(),
            role,
            scope,
            service_bindings: Vec::new(),
        }
    }

    pub fn with_binding(mut self, binding: ServiceBinding) -> Self {
        self.service_bindings.push(binding);
        self
    }

    /// Namespace of the primary service binding, if any.
    pub fn primary_namespace(&self) -> Option<&str> {
        self.service_bindings.first().map(|b| b.namespace.as_str())
    }
}
