//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject duplicate kinds within one list
//! - Keep built-in scoped kinds from being redefined
//! - Keep every cluster resend paired with an endpoint resend
//! - Validate observability values
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ScopeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{ChannelOverrideConfig, ScopeConfig};
use crate::model::{ProxyRole, ResourceKind};
use crate::scope::{PushChannel, ScopePredicateRegistry};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a config file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("scoped kind {0} is listed more than once")]
    DuplicateScopedKind(ResourceKind),

    #[error("scoped kind {0} is built in and cannot be redefined")]
    BuiltinScopedKind(ResourceKind),

    #[error("{role} override for {kind} is listed more than once")]
    DuplicateOverride { role: ProxyRole, kind: ResourceKind },

    #[error("{role} override for {kind} resends clusters without endpoints")]
    ClusterWithoutEndpoint { role: ProxyRole, kind: ResourceKind },

    #[error("invalid metrics address '{0}'")]
    InvalidMetricsAddress(String),

    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),
}

/// Validate a parsed config, collecting every error.
pub fn validate_config(config: &ScopeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let builtin = ScopePredicateRegistry::standard();
    let mut seen = HashSet::new();
    for scoped in &config.scoping.scoped_kinds {
        if builtin.contains(&scoped.kind) {
            errors.push(ValidationError::BuiltinScopedKind(scoped.kind.clone()));
        } else if !seen.insert(&scoped.kind) {
            errors.push(ValidationError::DuplicateScopedKind(scoped.kind.clone()));
        }
    }

    for role in ProxyRole::ALL {
        validate_overrides(role, config.scoping.overrides_for(role), &mut errors);
    }

    let observability = &config.observability;
    if !LOG_LEVELS.contains(&observability.log_level.to_lowercase().as_str()) {
        errors.push(ValidationError::UnknownLogLevel(observability.log_level.clone()));
    }
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidMetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_overrides(role: ProxyRole, overrides: &[ChannelOverrideConfig], errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();
    for entry in overrides {
        if !seen.insert(&entry.kind) {
            errors.push(ValidationError::DuplicateOverride {
                role,
                kind: entry.kind.clone(),
            });
        }
        if entry.channels.contains(&PushChannel::Cluster) && !entry.channels.contains(&PushChannel::Endpoint) {
            errors.push(ValidationError::ClusterWithoutEndpoint {
                role,
                kind: entry.kind.clone(),
            });
        }
    }
}
