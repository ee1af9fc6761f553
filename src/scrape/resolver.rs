//! Single-address balance resolution.
//!
//! # Design Decisions
//! - Exactly one attempt per scrape; a missed sample is recovered by the
//!   next scrape, and retries belong to the RPC client if anywhere
//! - Every call is bounded by the per-call timeout
//! - Nothing is cached between invocations

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::U256;
use tokio::time::timeout;

use crate::blockchain::{BlockchainError, NetworkRegistry};
use crate::config::WatchedAddress;
use crate::scrape::outcome::ResolutionFailure;

/// Resolves one address's balance through its network's client.
#[derive(Debug, Clone)]
pub struct BalanceResolver {
    registry: Arc<NetworkRegistry>,
    timeout: Duration,
}

impl BalanceResolver {
    pub fn new(registry: Arc<NetworkRegistry>, timeout: Duration) -> Self {
        Self { registry, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Balance of `watched` in wei.
    pub async fn resolve(&self, watched: &WatchedAddress) -> Result<U256, ResolutionFailure> {
        let result = self.query(watched).await;

        match &result {
            Ok(wei) => tracing::debug!(
                address = %watched.configured(),
                name = %watched.display_name(),
                network = %watched.network_key(),
                wei = %wei,
                "Balance resolved"
            ),
            Err(failure @ ResolutionFailure::Internal(_)) => tracing::error!(
                address = %watched.configured(),
                network = %watched.network_key(),
                error = %failure,
                "Network registry out of sync with configuration"
            ),
            Err(failure) => tracing::warn!(
                address = %watched.configured(),
                name = %watched.display_name(),
                network = %watched.network_key(),
                kind = %failure.kind(),
                error = %failure,
                "Failed to resolve balance"
            ),
        }

        result
    }

    async fn query(&self, watched: &WatchedAddress) -> Result<U256, ResolutionFailure> {
        let client = self
            .registry
            .resolve(watched.network_key())
            .map_err(|e| ResolutionFailure::Internal(e.to_string()))?;

        match timeout(self.timeout, client.get_balance(watched.address())).await {
            Ok(Ok(wei)) => Ok(wei),
            Ok(Err(BlockchainError::Connection(msg))) => Err(ResolutionFailure::Connection(msg)),
            Ok(Err(BlockchainError::Malformed(msg))) => Err(ResolutionFailure::Malformed(msg)),
            Ok(Err(e @ BlockchainError::UnknownNetwork(_))) => {
                Err(ResolutionFailure::Internal(e.to_string()))
            }
            Err(_) => Err(ResolutionFailure::Timeout(self.timeout)),
        }
    }
}
