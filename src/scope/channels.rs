//! Push channel classification.
//!
//! # Responsibilities
//! - Name the four independently resendable configuration channels
//! - Hold one kind → channel-set table per proxy role
//! - Union the channel sets of every changed kind in an event
//!
//! # Design Decisions
//! - Sidecar and gateway tables are separate values so they can be edited
//!   independently; the role stays the first lookup dimension
//! - A kind missing from a role's table resends every channel
//! - A cluster resend always carries endpoints, otherwise warmed clusters
//!   are left without load assignments

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{kinds, ChangeEvent, ProxyRole, ResourceKind};

/// One independently resendable aspect of a proxy's configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PushChannel {
    Cluster,
    Endpoint,
    Listener,
    Route,
}

impl PushChannel {
    pub const ALL: [PushChannel; 4] = [
        PushChannel::Cluster,
        PushChannel::Endpoint,
        PushChannel::Listener,
        PushChannel::Route,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PushChannel::Cluster => "cluster",
            PushChannel::Endpoint => "endpoint",
            PushChannel::Listener => "listener",
            PushChannel::Route => "route",
        }
    }

    /// Discovery service abbreviation (CDS, EDS, LDS, RDS).
    pub fn discovery_service(&self) -> &'static str {
        match self {
            PushChannel::Cluster => "CDS",
            PushChannel::Endpoint => "EDS",
            PushChannel::Listener => "LDS",
            PushChannel::Route => "RDS",
        }
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for PushChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of push channels.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<PushChannel>", into = "Vec<PushChannel>")]
pub struct ChannelSet(u8);

impl ChannelSet {
    pub const EMPTY: ChannelSet = ChannelSet(0);
    pub const ALL: ChannelSet = ChannelSet::of(&PushChannel::ALL);

    pub const fn of(channels: &[PushChannel]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < channels.len() {
            bits |= channels[i].bit();
            i += 1;
        }
        ChannelSet(bits)
    }

    pub fn insert(&mut self, channel: PushChannel) {
        self.0 |= channel.bit();
    }

    pub const fn union(self, other: ChannelSet) -> ChannelSet {
        ChannelSet(self.0 | other.0)
    }

    pub fn contains(&self, channel: PushChannel) -> bool {
        self.0 & channel.bit() != 0
    }

    pub fn is_superset(&self, other: ChannelSet) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_full(&self) -> bool {
        *self == ChannelSet::ALL
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Channels in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = PushChannel> + '_ {
        PushChannel::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

impl fmt::Debug for ChannelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for ChannelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|c| c.discovery_service()).collect();
        write!(f, "[{}]", names.join(","))
    }
}

impl FromIterator<PushChannel> for ChannelSet {
    fn from_iter<I: IntoIterator<Item = PushChannel>>(iter: I) -> Self {
        let mut set = ChannelSet::EMPTY;
        for channel in iter {
            set.insert(channel);
        }
        set
    }
}

impl From<Vec<PushChannel>> for ChannelSet {
    fn from(channels: Vec<PushChannel>) -> Self {
        channels.into_iter().collect()
    }
}

impl From<ChannelSet> for Vec<PushChannel> {
    fn from(set: ChannelSet) -> Self {
        set.iter().collect()
    }
}

const CDS_EDS: ChannelSet = ChannelSet::of(&[PushChannel::Cluster, PushChannel::Endpoint]);
const CDS_EDS_LDS: ChannelSet =
    ChannelSet::of(&[PushChannel::Cluster, PushChannel::Endpoint, PushChannel::Listener]);
const LDS_RDS: ChannelSet = ChannelSet::of(&[PushChannel::Listener, PushChannel::Route]);
const LDS: ChannelSet = ChannelSet::of(&[PushChannel::Listener]);

/// Kind → channel set for a single role.
#[derive(Debug, Clone, Default)]
pub struct ChannelTable {
    entries: HashMap<ResourceKind, ChannelSet>,
}

impl ChannelTable {
    /// Table for sidecar proxies.
    pub fn sidecar() -> Self {
        let mut table = Self::default();
        table.set(kinds::VIRTUAL_SERVICE, LDS_RDS);
        table.set(kinds::GATEWAY, ChannelSet::EMPTY);
        table.set(kinds::SERVICE_ENTRY, ChannelSet::ALL);
        table.set(kinds::DESTINATION_RULE, CDS_EDS);
        table.set(kinds::ENVOY_FILTER, ChannelSet::ALL);
        table.set(kinds::SIDECAR, LDS_RDS);
        // Listeners must go out with routes or route changes are not reloaded.
        table.set(kinds::QUOTA_SPEC, LDS_RDS);
        table.set(kinds::QUOTA_SPEC_BINDING, LDS_RDS);
        table.set(kinds::AUTHN_POLICY, CDS_EDS_LDS);
        table.set(kinds::AUTHN_MESH_POLICY, CDS_EDS_LDS);
        table.set(kinds::SERVICE_ROLE, LDS);
        table.set(kinds::SERVICE_ROLE_BINDING, LDS);
        table.set(kinds::RBAC_CONFIG, LDS);
        table.set(kinds::CLUSTER_RBAC_CONFIG, LDS);
        table.set(kinds::AUTHORIZATION_POLICY, LDS);
        table.set(kinds::REQUEST_AUTHENTICATION, LDS);
        table.set(kinds::PEER_AUTHENTICATION, CDS_EDS_LDS);
        table
    }

    /// Table for gateway proxies.
    pub fn gateway() -> Self {
        let mut table = Self::default();
        table.set(kinds::VIRTUAL_SERVICE, LDS_RDS);
        table.set(kinds::GATEWAY, LDS_RDS);
        table.set(kinds::SERVICE_ENTRY, ChannelSet::ALL);
        table.set(kinds::DESTINATION_RULE, CDS_EDS);
        table.set(kinds::ENVOY_FILTER, ChannelSet::ALL);
        table.set(kinds::SIDECAR, ChannelSet::EMPTY);
        table.set(kinds::QUOTA_SPEC, ChannelSet::EMPTY);
        table.set(kinds::QUOTA_SPEC_BINDING, ChannelSet::EMPTY);
        table.set(kinds::AUTHN_POLICY, CDS_EDS_LDS);
        table.set(kinds::AUTHN_MESH_POLICY, CDS_EDS_LDS);
        table.set(kinds::SERVICE_ROLE, LDS);
        table.set(kinds::SERVICE_ROLE_BINDING, LDS);
        table.set(kinds::RBAC_CONFIG, LDS);
        table.set(kinds::CLUSTER_RBAC_CONFIG, LDS);
        table.set(kinds::AUTHORIZATION_POLICY, LDS);
        table.set(kinds::REQUEST_AUTHENTICATION, LDS);
        table.set(kinds::PEER_AUTHENTICATION, CDS_EDS_LDS);
        table
    }

    /// Set the channels for `kind`, returning the previous entry.
    pub fn set(&mut self, kind: ResourceKind, channels: ChannelSet) -> Option<ChannelSet> {
        self.entries.insert(kind, channels)
    }

    /// Channels to resend when `kind` changes. Unknown kinds resend everything.
    pub fn lookup(&self, kind: &ResourceKind) -> ChannelSet {
        self.entries.get(kind).copied().unwrap_or(ChannelSet::ALL)
    }

    pub fn get(&self, kind: &ResourceKind) -> Option<ChannelSet> {
        self.entries.get(kind).copied()
    }

    /// Entries sorted by kind.
    pub fn entries(&self) -> Vec<(&ResourceKind, ChannelSet)> {
        let mut entries: Vec<_> = self.entries.iter().map(|(k, v)| (k, *v)).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Role → kind → channel set.
#[derive(Debug, Clone)]
pub struct RoleChannelTables {
    pub sidecar: ChannelTable,
    pub gateway: ChannelTable,
}

impl RoleChannelTables {
    pub fn standard() -> Self {
        Self {
            sidecar: ChannelTable::sidecar(),
            gateway: ChannelTable::gateway(),
        }
    }

    pub fn for_role(&self, role: ProxyRole) -> &ChannelTable {
        match role {
            ProxyRole::Sidecar => &self.sidecar,
            ProxyRole::Gateway => &self.gateway,
        }
    }

    pub fn for_role_mut(&mut self, role: ProxyRole) -> &mut ChannelTable {
        match role {
            ProxyRole::Sidecar => &mut self.sidecar,
            ProxyRole::Gateway => &mut self.gateway,
        }
    }
}

impl Default for RoleChannelTables {
    fn default() -> Self {
        Self::standard()
    }
}

/// Channels a proxy of `role` must receive for `event`.
///
/// Unscoped events resend everything. Otherwise the per-kind sets are
/// unioned, stopping early once every channel is selected.
pub fn push_channels_for(tables: &RoleChannelTables, role: ProxyRole, event: &ChangeEvent) -> ChannelSet {
    if event.is_unscoped() {
        return ChannelSet::ALL;
    }

    let table = tables.for_role(role);
    let mut out = ChannelSet::EMPTY;
    for kind in event.changed_kinds() {
        out = out.union(table.lookup(kind));
        if out.is_full() {
            break;
        }
    }
    out
}
