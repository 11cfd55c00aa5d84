//! Change events.
//!
//! One `ChangeEvent` is produced per batch of configuration changes and then
//! evaluated, read-only, against every connected proxy. It is never mutated
//! after `build()`.
//!
//! Empty collections carry meaning:
//! - no changed kinds at all: global change, affects every proxy;
//! - a kind with no names: every resource of that kind changed (wildcard);
//! - no namespaces: no namespace narrowing requested.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::kind::ResourceKind;

/// Names of changed resources for a single kind. Empty means wildcard.
pub type NameSet = BTreeSet<String>;

/// An immutable batch of configuration changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangeEvent {
    namespaces_updated: BTreeSet<String>,
    configs_updated: BTreeMap<ResourceKind, NameSet>,
}

impl ChangeEvent {
    /// An unscoped change: every proxy, every channel.
    pub fn global() -> Self {
        Self::default()
    }

    pub fn builder() -> ChangeEventBuilder {
        ChangeEventBuilder::default()
    }

    pub fn namespaces_updated(&self) -> &BTreeSet<String> {
        &self.namespaces_updated
    }

    pub fn configs_updated(&self) -> &BTreeMap<ResourceKind, NameSet> {
        &self.configs_updated
    }

    /// True when no kinds were named, i.e. the change is global.
    pub fn is_unscoped(&self) -> bool {
        self.configs_updated.is_empty()
    }

    /// Changed kinds in a stable order.
    pub fn changed_kinds(&self) -> impl Iterator<Item = &ResourceKind> {
        self.configs_updated.keys()
    }
}

/// Accumulates changes before freezing them into a `ChangeEvent`.
#[derive(Debug, Default)]
pub struct ChangeEventBuilder {
    namespaces_updated: BTreeSet<String>,
    configs_updated: BTreeMap<ResourceKind, NameSet>,
    wildcards: BTreeSet<ResourceKind>,
}

impl ChangeEventBuilder {
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespaces_updated.insert(namespace.into());
        self
    }

    /// Mark every resource of `kind` as changed, dropping any names
    /// recorded for it so far.
    pub fn kind_changed(mut self, kind: ResourceKind) -> Self {
        self.configs_updated.entry(kind.clone()).or_default().clear();
        self.wildcards.insert(kind);
        self
    }

    /// Mark a single named resource as changed.
    ///
    /// Has no narrowing effect once the kind was marked as a wildcard.
    pub fn resource_changed(mut self, kind: ResourceKind, name: impl Into<String>) -> Self {
        let wildcard = self.wildcards.contains(&kind);
        let names = self.configs_updated.entry(kind).or_default();
        if !wildcard {
            names.insert(name.into());
        }
        self
    }

    pub fn build(self) -> ChangeEvent {
        ChangeEvent {
            namespaces_updated: self.namespaces_updated,
            configs_updated: self.configs_updated,
        }
    }
}
