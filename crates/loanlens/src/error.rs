// Error types for the loan viewing pipeline
// Wallet and authorization variants carry the exact display strings the
// board surfaces to users, so `to_string()` is the rendering contract.

use thiserror::Error;

/// Errors produced while fetching and shaping loan listings
#[derive(Error, Debug, Clone)]
pub enum LensError {
    /// No wallet provider is available in the environment
    #[error("Please install MetaMask or another Ethereum wallet.")]
    WalletMissing,

    /// The wallet exposed no authorized accounts
    #[error("No authorized accounts found")]
    NoAccounts,

    /// Wallet request error
    #[error("Wallet error: {0}")]
    WalletError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Smart contract error
    #[error("Contract error: {0}")]
    ContractError(String),

    /// NFT metadata error
    #[error("Metadata error: {0}")]
    MetadataError(String),

    /// Token amount error
    #[error("Amount error: {0}")]
    AmountError(String),
}

/// Convenient Result type for lens operations
pub type LensResult<T> = Result<T, LensError>;

// Helper methods for creating lens errors
impl LensError {
    /// Create a new wallet error
    pub fn wallet_error(message: impl Into<String>) -> Self {
        LensError::WalletError(message.into())
    }

    /// Create a new configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        LensError::ConfigError(message.into())
    }

    /// Create a new contract error
    pub fn contract_error(message: impl Into<String>) -> Self {
        LensError::ContractError(message.into())
    }

    /// Create a new metadata error
    pub fn metadata_error(message: impl Into<String>) -> Self {
        LensError::MetadataError(message.into())
    }

    /// Create a new amount error
    pub fn amount_error(message: impl Into<String>) -> Self {
        LensError::AmountError(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_missing_display() {
        assert_eq!(
            LensError::WalletMissing.to_string(),
            "Please install MetaMask or another Ethereum wallet."
        );
    }

    #[test]
    fn test_no_accounts_display() {
        assert_eq!(
            LensError::NoAccounts.to_string(),
            "No authorized accounts found"
        );
    }

    #[test]
    fn test_helper_constructors() {
        let err = LensError::contract_error("call reverted");
        assert_eq!(err.to_string(), "Contract error: call reverted");

        let err = LensError::metadata_error("HTTP 404");
        assert_eq!(err.to_string(), "Metadata error: HTTP 404");
    }
}
