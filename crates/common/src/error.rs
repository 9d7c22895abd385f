use thiserror::Error;

use crate::types::Amount;

/// Errors shared by the ledger and faucet crates
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// Scaling a whole-token quantity into base units overflowed
    #[error("Amount overflow: {0} tokens cannot be represented in base units")]
    UnitsOverflow(Amount),

    /// A decimal amount string could not be parsed
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// An address string could not be parsed
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Logging subscriber could not be installed
    #[error("Logging error: {0}")]
    Logging(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, CommonError>;

impl From<config::ConfigError> for CommonError {
    fn from(err: config::ConfigError) -> Self {
        CommonError::Config(err.to_string())
    }
}
