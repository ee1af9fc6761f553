//! Per-network RPC client registry.
//!
//! One client per declared network, built once after validation and shared
//! read-only by every scrape. The network set is fixed for the process
//! lifetime, so no locking is needed.

use std::collections::HashMap;
use std::sync::Arc;

use crate::blockchain::client::{BalanceClient, RpcBalanceClient};
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::config::Config;

/// Maps a network key to its balance client.
#[derive(Clone, Default)]
pub struct NetworkRegistry {
    clients: HashMap<String, Arc<dyn BalanceClient>>,
}

impl NetworkRegistry {
    /// Build one JSON-RPC client per network declared in `config`.
    pub fn connect(config: &Config) -> Self {
        let mut clients: HashMap<String, Arc<dyn BalanceClient>> = HashMap::new();
        for network in config.networks() {
            let client = RpcBalanceClient::new(network.endpoint().clone());
            tracing::info!(
                network = %network.key(),
                host = %client.host(),
                "RPC client registered"
            );
            clients.insert(network.key().to_string(), Arc::new(client));
        }
        Self { clients }
    }

    /// Build a registry from explicit clients.
    pub fn from_clients<I, K>(clients: I) -> Self
    where
        I: IntoIterator<Item = (K, Arc<dyn BalanceClient>)>,
        K: Into<String>,
    {
        Self {
            clients: clients.into_iter().map(|(k, c)| (k.into(), c)).collect(),
        }
    }

    /// Client for `network_key`.
    ///
    /// A miss means the registry and the validated config disagree.
    pub fn resolve(&self, network_key: &str) -> BlockchainResult<Arc<dyn BalanceClient>> {
        self.clients
            .get(network_key)
            .cloned()
            .ok_or_else(|| BlockchainError::UnknownNetwork(network_key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl std::fmt::Debug for NetworkRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&str> = self.clients.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("NetworkRegistry").field("networks", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::parse_config_with;

    #[test]
    fn test_connect_builds_one_client_per_network() {
        let config = parse_config_with(
            r#"
networks:
  - name: mainnet
    rpc-endpoint: https://rpc.example/mainnet
  - name: sepolia
    rpc-endpoint: https://rpc.example/sepolia
addresses:
  - address: "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
    name: alice
    network: mainnet
  - address: "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359"
    name: bob
    network: mainnet
"#,
            |_| None,
        )
        .unwrap();

        let registry = NetworkRegistry::connect(&config);
        assert_eq!(registry.len(), 2);
        assert!(registry.resolve("mainnet").is_ok());
        assert!(registry.resolve("sepolia").is_ok());
    }

    #[test]
    fn test_unknown_network() {
        let registry = NetworkRegistry::default();
        assert!(registry.is_empty());
        assert!(matches!(
            registry.resolve("testnet"),
            Err(BlockchainError::UnknownNetwork(ref key)) if key == "testnet"
        ));
    }
}
