//! Balance query capability and its JSON-RPC implementation.
//!
//! # Responsibilities
//! - Define the `BalanceClient` seam the scrape path depends on
//! - Query `eth_getBalance` through an alloy HTTP provider
//! - Classify transport errors into connection vs. malformed-response failures
//!
//! Timeouts are not applied here; the caller bounds every call.

use alloy::primitives::{Address, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::transports::{RpcError, TransportError};
use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Something that can report the native balance of an account.
#[async_trait]
pub trait BalanceClient: Send + Sync {
    /// Balance of `address` at the latest block, in wei.
    async fn get_balance(&self, address: Address) -> BlockchainResult<U256>;
}

/// JSON-RPC balance client bound to one endpoint.
#[derive(Clone)]
pub struct RpcBalanceClient {
    provider: Arc<dyn Provider + Send + Sync>,
    endpoint: Url,
}

impl RpcBalanceClient {
    /// Create a client for `endpoint`. No request is made until the first query.
    pub fn new(endpoint: Url) -> Self {
        let provider = ProviderBuilder::new().connect_http(endpoint.clone());
        Self {
            provider: Arc::new(provider) as Arc<dyn Provider + Send + Sync>,
            endpoint,
        }
    }

    /// Endpoint host, safe to log (paths often embed API keys).
    pub fn host(&self) -> &str {
        self.endpoint.host_str().unwrap_or("unknown")
    }
}

#[async_trait]
impl BalanceClient for RpcBalanceClient {
    async fn get_balance(&self, address: Address) -> BlockchainResult<U256> {
        self.provider.get_balance(address).await.map_err(classify)
    }
}

impl std::fmt::Debug for RpcBalanceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcBalanceClient")
            .field("host", &self.host())
            .finish()
    }
}

/// Transport-level failures are connection problems; everything else means
/// the endpoint answered but not with a usable balance.
fn classify(err: TransportError) -> BlockchainError {
    match err {
        RpcError::Transport(kind) => BlockchainError::Connection(kind.to_string()),
        other => BlockchainError::Malformed(other.to_string()),
    }
}
