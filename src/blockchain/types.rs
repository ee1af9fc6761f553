//! Chain-specific error definitions.

use thiserror::Error;

/// Errors that can occur while querying a chain.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// The endpoint could not be reached or the transport failed.
    #[error("RPC connection error: {0}")]
    Connection(String),

    /// The endpoint answered with an error payload or something undecodable.
    #[error("Malformed RPC response: {0}")]
    Malformed(String),

    /// No client is registered for the network key.
    #[error("No RPC client registered for network '{0}'")]
    UnknownNetwork(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BlockchainError::Connection("connection refused".into());
        assert_eq!(err.to_string(), "RPC connection error: connection refused");

        let err = BlockchainError::UnknownNetwork("testnet".into());
        assert!(err.to_string().contains("'testnet'"));
    }
}
