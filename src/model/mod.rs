//! Domain types consumed by push scoping.
//!
//! # Data Flow
//! ```text
//! change aggregator
//!     → event.rs (ChangeEvent, frozen once per batch)
//!
//! proxy registry
//!     → proxy.rs (Proxy: role, service bindings, DependencyScope)
//!
//! Both are read-only inputs to the scope subsystem.
//! ```
//!
//! # Design Decisions
//! - `ResourceKind` is an opaque lookup key, not a closed enum, so new
//!   kinds flow through as fail-open unknowns
//! - Ordered collections keep iteration deterministic

pub mod event;
pub mod kind;
pub mod proxy;

pub use event::{ChangeEvent, ChangeEventBuilder, NameSet};
pub use kind::{kinds, KindParseError, ResourceKind};
pub use proxy::{DependencyScope, Proxy, ProxyRole, ScopeDependency, ServiceBinding, SidecarScope};
