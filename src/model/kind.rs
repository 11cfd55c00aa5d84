//! Resource kind identity.
//!
//! A `ResourceKind` names a schema category of configuration resource as a
//! `group/version/Kind` triple. It is used purely as a lookup key, so it is a
//! small value type with `Eq`, `Hash` and `Ord`.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Schema category of a configuration resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceKind {
    group: Cow<'static, str>,
    version: Cow<'static, str>,
    kind: Cow<'static, str>,
}

impl ResourceKind {
    /// Build a kind from static strings. Usable in `const` position.
    pub const fn from_static(group: &'static str, version: &'static str, kind: &'static str) -> Self {
        Self {
            group: Cow::Borrowed(group),
            version: Cow::Borrowed(version),
            kind: Cow::Borrowed(kind),
        }
    }

    /// Build a kind from owned parts.
    pub fn new(group: impl Into<String>, version: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            group: Cow::Owned(group.into()),
            version: Cow::Owned(version.into()),
            kind: Cow::Owned(kind.into()),
        }
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.group, self.version, self.kind)
    }
}

/// Error returned when a `group/version/Kind` string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KindParseError {
    #[error("resource kind '{0}' must have the form group/version/Kind")]
    Malformed(String),

    #[error("resource kind '{input}' has an empty {segment} segment")]
    EmptySegment { input: String, segment: &'static str },

    #[error("resource kind '{input}' has surrounding whitespace in its {segment} segment")]
    PaddedSegment { input: String, segment: &'static str },
}

impl FromStr for ResourceKind {
    type Err = KindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        let [group, version, kind] = parts.as_slice() else {
            return Err(KindParseError::Malformed(s.to_string()));
        };

        for (segment, value) in [("group", group), ("version", version), ("kind", kind)] {
            if value.trim().is_empty() {
                return Err(KindParseError::EmptySegment {
                    input: s.to_string(),
                    segment,
                });
            }
            if value.trim().len() != value.len() {
                return Err(KindParseError::PaddedSegment {
                    input: s.to_string(),
                    segment,
                });
            }
        }

        Ok(Self::new(*group, *version, *kind))
    }
}

impl TryFrom<String> for ResourceKind {
    type Error = KindParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ResourceKind> for String {
    fn from(kind: ResourceKind) -> Self {
        kind.to_string()
    }
}

/// Well-known resource kinds referenced by the push policy tables.
pub mod kinds {
    use super::ResourceKind;

    pub const GATEWAY: ResourceKind = ResourceKind::from_static("networking", "v1alpha3", "Gateway");
    pub const VIRTUAL_SERVICE: ResourceKind =
        ResourceKind::from_static("networking", "v1alpha3", "VirtualService");
    pub const SERVICE_ENTRY: ResourceKind =
        ResourceKind::from_static("networking", "v1alpha3", "ServiceEntry");
    pub const DESTINATION_RULE: ResourceKind =
        ResourceKind::from_static("networking", "v1alpha3", "DestinationRule");
    pub const ENVOY_FILTER: ResourceKind =
        ResourceKind::from_static("networking", "v1alpha3", "EnvoyFilter");
    pub const SIDECAR: ResourceKind = ResourceKind::from_static("networking", "v1alpha3", "Sidecar");

    pub const QUOTA_SPEC: ResourceKind = ResourceKind::from_static("policy", "v1", "QuotaSpec");
    pub const QUOTA_SPEC_BINDING: ResourceKind =
        ResourceKind::from_static("policy", "v1", "QuotaSpecBinding");

    pub const AUTHN_POLICY: ResourceKind = ResourceKind::from_static("authentication", "v1alpha1", "Policy");
    pub const AUTHN_MESH_POLICY: ResourceKind =
        ResourceKind::from_static("authentication", "v1alpha1", "MeshPolicy");

    pub const SERVICE_ROLE: ResourceKind = ResourceKind::from_static("rbac", "v1alpha1", "ServiceRole");
    pub const SERVICE_ROLE_BINDING: ResourceKind =
        ResourceKind::from_static("rbac", "v1alpha1", "ServiceRoleBinding");
    pub const RBAC_CONFIG: ResourceKind = ResourceKind::from_static("rbac", "v1alpha1", "RbacConfig");
    pub const CLUSTER_RBAC_CONFIG: ResourceKind =
        ResourceKind::from_static("rbac", "v1alpha1", "ClusterRbacConfig");

    pub const AUTHORIZATION_POLICY: ResourceKind =
        ResourceKind::from_static("security", "v1beta1", "AuthorizationPolicy");
    pub const REQUEST_AUTHENTICATION: ResourceKind =
        ResourceKind::from_static("security", "v1beta1", "RequestAuthentication");
    pub const PEER_AUTHENTICATION: ResourceKind =
        ResourceKind::from_static("security", "v1beta1", "PeerAuthentication");

    /// Every well-known kind, in declaration order.
    pub const ALL: [ResourceKind; 17] = [
        GATEWAY,
        VIRTUAL_SERVICE,
        SERVICE_ENTRY,
        DESTINATION_RULE,
        ENVOY_FILTER,
        SIDECAR,
        QUOTA_SPEC,
        QUOTA_SPEC_BINDING,
        AUTHN_POLICY,
        AUTHN_MESH_POLICY,
        SERVICE_ROLE,
        SERVICE_ROLE_BINDING,
        RBAC_CONFIG,
        CLUSTER_RBAC_CONFIG,
        AUTHORIZATION_POLICY,
        REQUEST_AUTHENTICATION,
        PEER_AUTHENTICATION,
    ];

    /// Kinds that only matter to sidecar proxies' rate limiting.
    pub fn is_quota(kind: &ResourceKind) -> bool {
        *kind == QUOTA_SPEC || *kind == QUOTA_SPEC_BINDING
    }
}
