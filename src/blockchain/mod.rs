//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! validated Config (network key → endpoint)
//!     → registry.rs (one client per network, built at startup)
//!     → client.rs (eth_getBalance over JSON-RPC)
//! ```
//!
//! # Constraints
//! - Endpoint URLs may carry API keys; only hosts are logged
//! - Clients never retry; the scrape path decides what a failure means

pub mod client;
pub mod registry;
pub mod types;

pub use client::{BalanceClient, RpcBalanceClient};
pub use registry::NetworkRegistry;
pub use types::{BlockchainError, BlockchainResult};
