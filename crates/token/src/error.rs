//! Error types for the token ledger

use shangesh_common::{Address, Amount, CommonError};
use thiserror::Error;

/// Ledger errors. A failed call leaves the ledger untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Only owner can call this function")]
    Unauthorized { caller: Address },

    #[error("Insufficient balance: {account} holds {available}, needs {required}")]
    InsufficientBalance {
        account: Address,
        available: Amount,
        required: Amount,
    },

    #[error("Insufficient allowance: {spender} may spend {available} for {owner}, needs {required}")]
    InsufficientAllowance {
        owner: Address,
        spender: Address,
        available: Amount,
        required: Amount,
    },

    #[error("Cap exceeded: minting {amount} on top of {total_supply} would pass cap {cap}")]
    CapExceeded {
        cap: Amount,
        total_supply: Amount,
        amount: Amount,
    },

    #[error("Cap must be greater than zero")]
    InvalidCap,

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(Address),

    #[error(transparent)]
    Common(#[from] CommonError),
}

pub type TokenResult<T> = Result<T, TokenError>;
