//! Scrape execution subsystem.
//!
//! # Data Flow
//! ```text
//! GET /metrics
//!     → executor.rs (one task per configured address, bounded, deadline)
//!     → resolver.rs (registry lookup, timed eth_getBalance)
//!     → outcome.rs (balance or failure kind, per address)
//!     → observability::metrics (exposition text)
//! ```

pub mod executor;
pub mod outcome;
pub mod resolver;

#[cfg(test)]
pub(crate) mod testing;

pub use executor::{ScrapeExecutor, ScrapeLimits};
pub use outcome::{BalanceOutcome, FailureKind, ResolutionFailure};
pub use resolver::BalanceResolver;
