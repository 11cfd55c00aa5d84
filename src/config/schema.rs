//! Configuration schema definitions.
//!
//! This module defines the policy file structure. All types derive Serde
//! traits for deserialization from TOML; every field has a default so an
//! empty file yields the standard policy.

use serde::{Deserialize, Serialize};

use crate::model::{ProxyRole, ResourceKind, ScopeDependency};
use crate::scope::PushChannel;

/// Root configuration for the push scoping engine.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ScopeConfig {
    /// Extra scoped kinds and per-role channel overrides.
    pub scoping: ScopingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Adjustments applied on top of the built-in push policy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ScopingConfig {
    /// Kinds checked against a proxy's dependency scope, beyond the built-in three.
    pub scoped_kinds: Vec<ScopedKindConfig>,

    /// Channel table entries for sidecar proxies.
    pub sidecar_overrides: Vec<ChannelOverrideConfig>,

    /// Channel table entries for gateway proxies.
    pub gateway_overrides: Vec<ChannelOverrideConfig>,
}

impl ScopingConfig {
    pub fn overrides_for(&self, role: ProxyRole) -> &[ChannelOverrideConfig] {
        match role {
            ProxyRole::Sidecar => &self.sidecar_overrides,
            ProxyRole::Gateway => &self.gateway_overrides,
        }
    }
}

/// A resource kind whose names are looked up in one dependency category.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScopedKindConfig {
    /// Kind in `group/version/Kind` form.
    pub kind: ResourceKind,

    /// Dependency category the names belong to.
    pub dependency: ScopeDependency,
}

/// Channel table entry for one kind.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChannelOverrideConfig {
    /// Kind in `group/version/Kind` form.
    pub kind: ResourceKind,

    /// Channels to resend; empty means no push for this role.
    #[serde(default)]
    pub channels: Vec<PushChannel>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
