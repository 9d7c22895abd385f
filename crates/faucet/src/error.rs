//! Error types for the faucet

use shangesh_common::{Address, Amount, CommonError, Timestamp};
use shangesh_token::TokenError;
use thiserror::Error;

/// Faucet errors. A rejected call leaves faucet and ledger state unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FaucetError {
    #[error("Only the contract owner can call this")]
    Unauthorized { caller: Address },

    #[error("Please wait before requesting again")]
    CooldownActive {
        account: Address,
        available_at: Timestamp,
    },

    #[error("Faucet has insufficient tokens")]
    InsufficientFaucetFunds { available: Amount, required: Amount },

    #[error("Insufficient native balance: {account} holds {available}, needs {required}")]
    InsufficientNativeBalance {
        account: Address,
        available: Amount,
        required: Amount,
    },

    #[error("Native balance overflow: {account} holds {balance}, cannot receive {amount}")]
    NativeBalanceOverflow {
        account: Address,
        balance: Amount,
        amount: Amount,
    },

    #[error("Lock time overflow: {0} minutes")]
    LockTimeOverflow(u64),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error(transparent)]
    Common(#[from] CommonError),
}

impl FaucetError {
    /// Seconds left before a cooldown-rejected account may request again.
    pub fn retry_after(&self, now: Timestamp) -> Option<u64> {
        match self {
            FaucetError::CooldownActive { available_at, .. } => {
                Some(available_at.saturating_sub(now))
            }
            _ => None,
        }
    }
}

pub type FaucetResult<T> = Result<T, FaucetError>;
