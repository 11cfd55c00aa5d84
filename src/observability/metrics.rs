//! Metrics collection and exposition.
//!
//! # Metrics
//! - `push_scope_decisions_total` (counter): needs-push decisions by role, outcome
//! - `push_scope_channels_total` (counter): channels selected for pushed proxies
//! - `push_scope_plan_duration_seconds` (histogram): time to plan one event
//! - `push_scope_policy_reloads_total` (counter): reload attempts by outcome
//!
//! # Design Decisions
//! - Recorded by the planner, never by the pure decision functions
//! - No-ops until a recorder is installed

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::model::ProxyRole;
use crate::scope::ChannelSet;

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_decision(role: ProxyRole, outcome: &'static str) {
    counter!("push_scope_decisions_total", "role" => role.as_str(), "outcome" => outcome).increment(1);
}

pub fn record_channels(channels: ChannelSet) {
    for channel in channels.iter() {
        counter!("push_scope_channels_total", "channel" => channel.as_str()).increment(1);
    }
}

pub fn record_plan_duration(elapsed: Duration) {
    histogram!("push_scope_plan_duration_seconds").record(elapsed.as_secs_f64());
}

pub fn record_policy_reload(outcome: &'static str) {
    counter!("push_scope_policy_reloads_total", "outcome" => outcome).increment(1);
}
