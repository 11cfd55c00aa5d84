//! Selective push scoping.
//!
//! # Data Flow
//! ```text
//! ChangeEvent + Proxy
//!     → needs_push.rs (kind × role pre-filter)
//!     → affects.rs (OR over registry.rs predicates, fail-open)
//!     → namespace.rs (namespace narrowing)
//!     → bool: does this proxy need a push?
//!
//! ChangeEvent + ProxyRole
//!     → channels.rs (per-role kind → channel tables, union)
//!     → ChannelSet: which channels to resend
//! ```
//!
//! # Design Decisions
//! - Decision functions are pure and total; no logging, no metrics
//! - Unknown kinds push (and resend everything) rather than risk a stale proxy
//! - Tables live in a `PushPolicy` value, never in global state

pub mod affects;
pub mod channels;
pub mod namespace;
pub mod needs_push;
pub mod policy;
pub mod registry;

pub use channels::{ChannelSet, ChannelTable, PushChannel, RoleChannelTables};
pub use needs_push::Prefilter;
pub use policy::PushPolicy;
pub use registry::ScopePredicateRegistry;
