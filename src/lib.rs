//! Ethereum balance exporter library.
//!
//! Serves the native-currency balance of configured addresses as a
//! Prometheus gauge, resolved from each address's network on every scrape.

pub mod blockchain;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod scrape;

pub use blockchain::NetworkRegistry;
pub use config::{load_config, Config, ConfigError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use scrape::{BalanceOutcome, ScrapeExecutor};
