//! Configuration schema definitions.
//!
//! These are the raw, decoded shapes of the configuration document. Every
//! field is optional so that a missing value is reported by validation with
//! its full path instead of aborting the decode on the first gap.

use serde::{Deserialize, Serialize};

/// Root configuration document as decoded from YAML.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RawConfig {
    /// Declared networks, keyed by `name`.
    pub networks: Option<Vec<RawNetwork>>,

    /// Addresses whose balances are exported.
    pub addresses: Option<Vec<RawAddress>>,

    /// Scrape timing and concurrency settings.
    pub scrape: ScrapeSettings,

    /// Optional static bearer token protecting every route.
    pub static_bearer_token: Option<String>,
}

/// A network entry (`{ name, rpc-endpoint }`).
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RawNetwork {
    pub name: Option<String>,

    #[serde(rename = "rpc-endpoint", alias = "rpc_endpoint")]
    pub rpc_endpoint: Option<String>,
}

/// An address entry (`{ address, name, network }`).
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RawAddress {
    pub address: Option<String>,
    pub name: Option<String>,
    pub network: Option<String>,
}

/// Scrape execution settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScrapeSettings {
    /// Timeout for a single `eth_getBalance` call in seconds.
    pub rpc_timeout_secs: u64,

    /// Overall deadline for one scrape in seconds.
    pub deadline_secs: u64,

    /// Maximum in-flight balance queries per scrape (unbounded if unset).
    pub max_concurrency: Option<usize>,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            rpc_timeout_secs: 5,
            deadline_secs: 10,
            max_concurrency: None,
        }
    }
}
