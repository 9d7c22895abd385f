//! Native chain currency, held separately from token balances.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use shangesh_common::{Address, Amount};
use tracing::debug;

use crate::error::{FaucetError, FaucetResult};

pub type SharedNativeBank = Arc<RwLock<NativeBank>>;

/// Per-account native currency balances.
#[derive(Debug, Default)]
pub struct NativeBank {
    balances: HashMap<Address, Amount>,
}

impl NativeBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_shared(self) -> SharedNativeBank {
        Arc::new(RwLock::new(self))
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Credit currency entering from outside the system.
    pub fn deposit(&mut self, account: Address, amount: Amount) -> FaucetResult<()> {
        let balance = self.credited_balance(&account, amount)?;
        self.balances.insert(account, balance);
        debug!("Deposited {} native to {}", amount, account);
        Ok(())
    }

    pub fn transfer(&mut self, from: Address, to: Address, amount: Amount) -> FaucetResult<()> {
        let available = self.balance_of(&from);
        let remaining = available
            .checked_sub(amount)
            .ok_or(FaucetError::InsufficientNativeBalance {
                account: from,
                available,
                required: amount,
            })?;
        if from == to {
            return Ok(());
        }
        let credited = self.credited_balance(&to, amount)?;
        self.balances.insert(from, remaining);
        self.balances.insert(to, credited);
        debug!("Moved {} native from {} to {}", amount, from, to);
        Ok(())
    }

    fn credited_balance(&self, account: &Address, amount: Amount) -> FaucetResult<Amount> {
        let balance = self.balance_of(account);
        balance
            .checked_add(amount)
            .ok_or(FaucetError::NativeBalanceOverflow {
                account: *account,
                balance,
                amount,
            })
    }
}
