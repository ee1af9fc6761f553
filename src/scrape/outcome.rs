//! Per-address scrape results.

use std::fmt;
use std::time::Duration;

use alloy::primitives::U256;
use thiserror::Error;

use crate::config::WatchedAddress;

/// Why a balance could not be resolved in a scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Timeout,
    ConnectionFailure,
    MalformedResponse,
    InternalFault,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Timeout => "timeout",
            FailureKind::ConnectionFailure => "connection_failure",
            FailureKind::MalformedResponse => "malformed_response",
            FailureKind::InternalFault => "internal_fault",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed resolution with its detail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionFailure {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection failure: {0}")]
    Connection(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("internal fault: {0}")]
    Internal(String),
}

impl ResolutionFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            ResolutionFailure::Timeout(_) => FailureKind::Timeout,
            ResolutionFailure::Connection(_) => FailureKind::ConnectionFailure,
            ResolutionFailure::Malformed(_) => FailureKind::MalformedResponse,
            ResolutionFailure::Internal(_) => FailureKind::InternalFault,
        }
    }
}

/// The result for one configured address in one scrape.
///
/// Labels are copied from the configuration so the outcome set can be
/// rendered without access to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceOutcome {
    /// Account identifier as configured (case preserved).
    pub address: String,
    pub display_name: String,
    pub network_key: String,
    /// Balance in wei, or why it is missing.
    pub result: Result<U256, FailureKind>,
}

impl BalanceOutcome {
    pub fn new(watched: &WatchedAddress, result: Result<U256, FailureKind>) -> Self {
        Self {
            address: watched.configured().to_string(),
            display_name: watched.display_name().to_string(),
            network_key: watched.network_key().to_string(),
            result,
        }
    }

    pub fn balance_wei(&self) -> Option<U256> {
        self.result.ok()
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.result.err()
    }
}
