//! Validated, immutable configuration model.
//!
//! Values of these types only come out of [`validate_config`], so holding a
//! [`Config`] means every address parsed, every label is exposition-safe and
//! every address references a declared network.
//!
//! [`validate_config`]: crate::config::validation::validate_config

use alloy::primitives::Address;
use url::Url;

use crate::config::schema::ScrapeSettings;

/// A declared network and its RPC endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    pub(crate) key: String,
    pub(crate) endpoint: Url,
}

impl Network {
    /// Unique network key, used as the `network_name` label.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// JSON-RPC endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// An account whose balance is exported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedAddress {
    pub(crate) address: Address,
    pub(crate) configured: String,
    pub(crate) display_name: String,
    pub(crate) network_key: String,
}

impl WatchedAddress {
    /// Parsed account identifier.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The identifier exactly as written in the configuration (case preserved).
    pub fn configured(&self) -> &str {
        &self.configured
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn network_key(&self) -> &str {
        &self.network_key
    }
}

/// Root of the validated configuration. Immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) networks: Vec<Network>,
    pub(crate) addresses: Vec<WatchedAddress>,
    pub(crate) scrape: ScrapeSettings,
    pub(crate) static_bearer_token: Option<String>,
}

impl Config {
    /// Networks in declaration order.
    pub fn networks(&self) -> &[Network] {
        &self.networks
    }

    /// Addresses in declaration order.
    pub fn addresses(&self) -> &[WatchedAddress] {
        &self.addresses
    }

    pub fn scrape(&self) -> &ScrapeSettings {
        &self.scrape
    }

    pub fn static_bearer_token(&self) -> Option<&str> {
        self.static_bearer_token.as_deref()
    }

    pub fn network(&self, key: &str) -> Option<&Network> {
        self.networks.iter().find(|n| n.key == key)
    }
}
