//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use push_scope::model::{kinds, SidecarScope};
use push_scope::{Proxy, ProxyRole};

pub const SVC_NAME: &str = "svc1.com";
pub const VS_NAME: &str = "vs1";
pub const DR_NAME: &str = "dr1";

/// Sidecar whose scope holds one service, one virtual service and one destination rule.
pub fn scoped_sidecar(id: &str) -> Proxy {
    let mut scope = SidecarScope::new();
    scope.add_config_dependency(&kinds::SERVICE_ENTRY, SVC_NAME);
    scope.add_config_dependency(&kinds::VIRTUAL_SERVICE, VS_NAME);
    scope.add_config_dependency(&kinds::DESTINATION_RULE, DR_NAME);
    Proxy::new(id, ProxyRole::Sidecar, scope)
}

pub fn empty_sidecar(id: &str) -> Proxy {
    Proxy::new(id, ProxyRole::Sidecar, SidecarScope::new())
}

pub fn gateway(id: &str) -> Proxy {
    Proxy::new(id, ProxyRole::Gateway, SidecarScope::new())
}

/// A file path unique to this test process.
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("push-scope-{}-{}", std::process::id(), name))
}

/// Path of a file under `demos/`.
pub fn demo_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
}
