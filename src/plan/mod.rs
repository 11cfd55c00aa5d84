//! Push planning for a fleet of proxies.
//!
//! # Data Flow
//! ```text
//! ChangeEvent + [Proxy]
//!     → PushPlanner (active PushPolicy via ArcSwap)
//!     → per proxy: proxy_needs_push → push_channels_for
//!     → PushPlan { pushes, skipped }
//! ```
//!
//! # Design Decisions
//! - Policy reloads swap an `Arc` atomically; a plan in progress keeps the
//!   policy it started with
//! - Metrics and logs are emitted here, keeping `scope` pure

use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;
use serde::Serialize;

use crate::model::{ChangeEvent, DependencyScope, Proxy, ProxyRole};
use crate::observability::metrics;
use crate::scope::{ChannelSet, PushPolicy};

/// A push to send to one proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProxyPush {
    pub proxy_id: String,
    pub role: ProxyRole,
    pub channels: ChannelSet,
}

/// Result of planning one event against a fleet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PushPlan {
    /// Proxies that receive a push, in input order.
    pub pushes: Vec<ProxyPush>,

    /// Proxies the event does not touch.
    pub skipped_unaffected: usize,

    /// Proxies that need a push but have no channel to resend for their role.
    pub skipped_no_channels: usize,
}

impl PushPlan {
    pub fn get(&self, proxy_id: &str) -> Option<&ProxyPush> {
        self.pushes.iter().find(|p| p.proxy_id == proxy_id)
    }

    pub fn total(&self) -> usize {
        self.pushes.len() + self.skipped_unaffected + self.skipped_no_channels
    }
}

/// Plans pushes with a hot-swappable policy.
#[derive(Debug)]
pub struct PushPlanner {
    policy: ArcSwap<PushPolicy>,
}

impl PushPlanner {
    pub fn new(policy: PushPolicy) -> Self {
        Self {
            policy: ArcSwap::from_pointee(policy),
        }
    }

    /// The currently active policy.
    pub fn policy(&self) -> Arc<PushPolicy> {
        self.policy.load_full()
    }

    /// Replace the active policy.
    pub fn swap_policy(&self, policy: PushPolicy) {
        self.policy.store(Arc::new(policy));
        tracing::info!("Push policy swapped");
    }

    /// Evaluate `event` against every proxy.
    pub fn plan<S: DependencyScope>(&self, event: &ChangeEvent, proxies: &[Proxy<S>]) -> PushPlan {
        let start = Instant::now();
        let policy = self.policy.load_full();
        let mut plan = PushPlan::default();

        for proxy in proxies {
            if !policy.proxy_needs_push(event, proxy) {
                metrics::record_decision(proxy.role, "unaffected");
                tracing::trace!(proxy = %proxy.id, role = %proxy.role, "No push needed");
                plan.skipped_unaffected += 1;
                continue;
            }

            let channels = policy.push_channels_for(proxy.role, event);
            if channels.is_empty() {
                metrics::record_decision(proxy.role, "no_channels");
                tracing::debug!(proxy = %proxy.id, role = %proxy.role, "Push needed but no channel applies to role");
                plan.skipped_no_channels += 1;
                continue;
            }

            metrics::record_decision(proxy.role, "push");
            metrics::record_channels(channels);
            tracing::debug!(proxy = %proxy.id, role = %proxy.role, %channels, "Push planned");
            plan.pushes.push(ProxyPush {
                proxy_id: proxy.id.clone(),
                role: proxy.role,
                channels,
            });
        }

        metrics::record_plan_duration(start.elapsed());
        tracing::info!(
            kinds = event.configs_updated().len(),
            namespaces = event.namespaces_updated().len(),
            pushes = plan.pushes.len(),
            skipped_unaffected = plan.skipped_unaffected,
            skipped_no_channels = plan.skipped_no_channels,
            "Push plan computed"
        );
        plan
    }
}

impl Default for PushPlanner {
    fn default() -> Self {
        Self::new(PushPolicy::standard())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ChannelOverrideConfig, ScopingConfig};
    use crate::model::{kinds, SidecarScope};
    use crate::scope::PushChannel;

    fn fleet() -> Vec<Proxy> {
        let mut scope = SidecarScope::new();
        scope.add_config_dependency(&kinds::SERVICE_ENTRY, "svc1.com");
        vec![
            Proxy::new("sidecar-0", ProxyRole::Sidecar, scope),
            Proxy::new("gateway-0", ProxyRole::Gateway, SidecarScope::new()),
        ]
    }

    #[test]
    fn test_global_event_pushes_everyone_everything() {
        let planner = PushPlanner::default();
        let plan = planner.plan(&ChangeEvent::global(), &fleet());
        assert_eq!(plan.pushes.len(), 2);
        assert!(plan.pushes.iter().all(|p| p.channels.is_full()));
    }

    #[test]
    fn test_sidecar_kind_for_gateway_has_no_channels() {
        let planner = PushPlanner::default();
        let event = ChangeEvent::builder().kind_changed(kinds::SIDECAR).build();
        let plan = planner.plan(&event, &fleet());

        assert_eq!(plan.pushes.len(), 1);
        assert_eq!(plan.pushes[0].proxy_id, "sidecar-0");
        assert_eq!(plan.skipped_no_channels, 1);
        assert_eq!(plan.total(), 2);
    }

    #[test]
    fn test_swap_policy_changes_later_plans() {
        let planner = PushPlanner::default();
        let event = ChangeEvent::builder().kind_changed(kinds::ENVOY_FILTER).build();
        assert!(planner.plan(&event, &fleet()).get("gateway-0").unwrap().channels.is_full());

        planner.swap_policy(PushPolicy::from_config(&ScopingConfig {
            gateway_overrides: vec![ChannelOverrideConfig {
                kind: kinds::ENVOY_FILTER,
                channels: vec![PushChannel::Listener],
            }],
            ..Default::default()
        }));

        let plan = planner.plan(&event, &fleet());
        assert_eq!(
            plan.get("gateway-0").unwrap().channels,
            ChannelSet::of(&[PushChannel::Listener])
        );
    }

    #[test]
    fn test_held_policy_survives_swap() {
        let planner = PushPlanner::default();
        let held = planner.policy();
        planner.swap_policy(PushPolicy::standard());

        assert!(!Arc::ptr_eq(&held, &planner.policy()));
        let event = ChangeEvent::builder().kind_changed(kinds::ENVOY_FILTER).build();
        assert!(held.push_channels_for(ProxyRole::Gateway, &event).is_full());
    }

    #[test]
    fn test_plan_serializes() {
        let planner = PushPlanner::default();
        let event = ChangeEvent::builder().resource_changed(kinds::GATEWAY, "gw1").build();
        let json = serde_json::to_value(planner.plan(&event, &fleet())).unwrap();
        assert_eq!(json["pushes"][0]["proxy_id"], "gateway-0");
        assert_eq!(json["pushes"][0]["channels"], serde_json::json!(["listener", "route"]));
        assert_eq!(json["skipped_unaffected"], 1);
    }
}
