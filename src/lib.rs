//! Selective push scoping for a proxy configuration control plane.
//!
//! When configuration resources change, decide per connected proxy whether
//! it needs a push at all and which of its four configuration channels
//! (cluster, endpoint, listener, route) must be resent.

pub mod config;
pub mod model;
pub mod observability;
pub mod plan;
pub mod scope;

pub use config::ScopeConfig;
pub use model::{ChangeEvent, Proxy, ProxyRole, ResourceKind};
pub use plan::{PushPlan, PushPlanner};
pub use scope::{ChannelSet, PushChannel, PushPolicy};
