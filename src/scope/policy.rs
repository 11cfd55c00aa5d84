//! The frozen push policy.
//!
//! A `PushPolicy` bundles the predicate registry with the per-role channel
//! tables. It is built once (at startup or on reload), never mutated, and
//! passed by reference into every evaluation.

use crate::config::ScopingConfig;
use crate::model::{ChangeEvent, DependencyScope, Proxy, ProxyRole};
use crate::scope::affects::affects_proxy;
use crate::scope::channels::{push_channels_for, ChannelSet, RoleChannelTables};
use crate::scope::namespace::namespace_scope_allows;
use crate::scope::needs_push::proxy_needs_push;
use crate::scope::registry::ScopePredicateRegistry;

#[derive(Debug, Clone, Default)]
pub struct PushPolicy {
    registry: ScopePredicateRegistry,
    tables: RoleChannelTables,
}

impl PushPolicy {
    pub fn new(registry: ScopePredicateRegistry, tables: RoleChannelTables) -> Self {
        Self { registry, tables }
    }

    /// Built-in registry and tables, no overrides.
    pub fn standard() -> Self {
        Self::new(ScopePredicateRegistry::standard(), RoleChannelTables::standard())
    }

    /// Standard policy with the configured extra kinds and overrides applied.
    pub fn from_config(config: &ScopingConfig) -> Self {
        let mut policy = Self::standard();

        for scoped in &config.scoped_kinds {
            if let Some(previous) = policy.registry.register(scoped.kind.clone(), scoped.dependency) {
                tracing::warn!(
                    kind = %scoped.kind,
                    ?previous,
                    dependency = ?scoped.dependency,
                    "Scoped kind replaces an existing predicate"
                );
            }
        }

        for role in ProxyRole::ALL {
            let table = policy.tables.for_role_mut(role);
            for entry in config.overrides_for(role) {
                let channels: ChannelSet = entry.channels.iter().copied().collect();
                let previous = table.set(entry.kind.clone(), channels);
                tracing::debug!(
                    %role,
                    kind = %entry.kind,
                    %channels,
                    replaced = previous.is_some(),
                    "Channel override applied"
                );
            }
        }

        tracing::info!(
            scoped_kinds = policy.registry.len(),
            sidecar_entries = policy.tables.sidecar.len(),
            gateway_entries = policy.tables.gateway.len(),
            "Push policy built"
        );

        policy
    }

    pub fn registry(&self) -> &ScopePredicateRegistry {
        &self.registry
    }

    pub fn tables(&self) -> &RoleChannelTables {
        &self.tables
    }

    pub fn affects_proxy<S: DependencyScope>(&self, event: &ChangeEvent, proxy: &Proxy<S>) -> bool {
        affects_proxy(&self.registry, event, proxy)
    }

    pub fn namespace_scope_allows<S: DependencyScope>(&self, event: &ChangeEvent, proxy: &Proxy<S>) -> bool {
        namespace_scope_allows(event, proxy)
    }

    pub fn proxy_needs_push<S: DependencyScope>(&self, event: &ChangeEvent, proxy: &Proxy<S>) -> bool {
        proxy_needs_push(&self.registry, event, proxy)
    }

    pub fn push_channels_for(&self, role: ProxyRole, event: &ChangeEvent) -> ChannelSet {
        push_channels_for(&self.tables, role, event)
    }
}
