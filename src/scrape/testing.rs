//! Test doubles shared by the scrape and rendering tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, U256};
use async_trait::async_trait;

use crate::blockchain::{BalanceClient, BlockchainError, BlockchainResult};
use crate::config::{validate_config, Config, RawAddress, RawConfig, RawNetwork};

#[derive(Debug, Clone, Copy)]
enum Reply {
    Balance(U256),
    ConnectionRefused,
    Malformed,
    Panic,
}

/// Scripted balance client that tracks its own concurrency.
#[derive(Debug)]
pub struct MockClient {
    reply: Reply,
    delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
}

impl MockClient {
    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            delay: Duration::ZERO,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn returning(wei: U256) -> Self {
        Self::with_reply(Reply::Balance(wei))
    }

    pub fn connection_refused() -> Self {
        Self::with_reply(Reply::ConnectionRefused)
    }

    pub fn malformed() -> Self {
        Self::with_reply(Reply::Malformed)
    }

    /// A client whose query panics, killing the resolution task.
    pub fn panicking() -> Self {
        Self::with_reply(Reply::Panic)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn shared(self) -> Arc<dyn BalanceClient> {
        Arc::new(self)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BalanceClient for MockClient {
    async fn get_balance(&self, _address: Address) -> BlockchainResult<U256> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.reply {
            Reply::Balance(wei) => Ok(wei),
            Reply::ConnectionRefused => {
                Err(BlockchainError::Connection("connection refused".into()))
            }
            Reply::Malformed => Err(BlockchainError::Malformed("null response".into())),
            Reply::Panic => panic!("balance client crashed"),
        }
    }
}

/// Lowercase (checksum-free) address derived from an index.
pub fn test_address(index: usize) -> String {
    format!("0x{:040x}", index + 1)
}

/// Validated config with the given networks and `(name, network)` addresses.
pub fn test_config(networks: &[&str], addresses: &[(&str, &str)]) -> Arc<Config> {
    let raw = RawConfig {
        networks: Some(
            networks
                .iter()
                .map(|name| RawNetwork {
                    name: Some(name.to_string()),
                    rpc_endpoint: Some(format!("http://127.0.0.1:8545/{name}")),
                })
                .collect(),
        ),
        addresses: Some(
            addresses
                .iter()
                .enumerate()
                .map(|(i, (name, network))| RawAddress {
                    address: Some(test_address(i)),
                    name: Some(name.to_string()),
                    network: Some(network.to_string()),
                })
                .collect(),
        ),
        ..RawConfig::default()
    };
    Arc::new(validate_config(&raw).expect("test config must be valid"))
}
