//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! policy file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ScopeConfig (validated, immutable)
//!     → PushPolicy::from_config (frozen tables)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → new PushPolicy swapped into the planner
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults; an empty file means the built-in policy
//! - A rejected reload keeps the policy that is already active

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{ChannelOverrideConfig, LogFormat, ObservabilityConfig, ScopeConfig, ScopedKindConfig, ScopingConfig};
pub use validation::ValidationError;
pub use watcher::ConfigWatcher;
