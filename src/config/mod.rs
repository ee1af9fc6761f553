//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (YAML)
//!     → loader.rs (read, decode, ${VAR} substitution)
//!     → validation.rs (every rule, every violation)
//!     → Config (validated, immutable)
//!     → shared via Arc with the scrape executor
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no hot reload
//! - Raw schema fields are optional so missing values become violations
//! - A Config is never partially valid

pub mod loader;
pub mod model;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use model::{Config, Network, WatchedAddress};
pub use schema::{RawAddress, RawConfig, RawNetwork, ScrapeSettings};
pub use validation::{validate_config, ValidationError};
