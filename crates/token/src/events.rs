use serde::{Deserialize, Serialize};
use shangesh_common::{Address, Amount};

/// Record of an applied ledger transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// Balance movement. Mints come from `Address::ZERO`, burns go to it.
    Transfer {
        from: Address,
        to: Address,
        amount: Amount,
    },
    Approval {
        owner: Address,
        spender: Address,
        amount: Amount,
    },
    BlockRewardChanged {
        previous: Amount,
        current: Amount,
    },
}
