//! Faucet core logic

use std::collections::HashMap;
use std::sync::{PoisonError, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use shangesh_common::units;
use shangesh_common::{Address, Amount, CallContext, Timestamp};
use shangesh_token::{Ledger, SharedLedger};
use tracing::{debug, info, warn};

use crate::config::FaucetConfig;
use crate::error::{FaucetError, FaucetResult};
use crate::native::{NativeBank, SharedNativeBank};

/// Record of an applied faucet transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FaucetEvent {
    TokensRequested {
        account: Address,
        amount: Amount,
        at: Timestamp,
    },
    WithdrawalAmountChanged {
        previous: Amount,
        current: Amount,
    },
    LockTimeChanged {
        previous: u64,
        current: u64,
    },
    TokensWithdrawn {
        to: Address,
        amount: Amount,
    },
    NativeWithdrawn {
        to: Address,
        amount: Amount,
    },
}

/// Rate-limited dispenser drawing from its own ledger balance.
pub struct Faucet {
    address: Address,
    owner: Address,
    ledger: SharedLedger,
    native: SharedNativeBank,
    /// Base units paid per successful request
    withdrawal_amount: Amount,
    /// Cooldown in seconds
    lock_time: u64,
    last_request_at: HashMap<Address, Timestamp>,
    events: Vec<FaucetEvent>,
}

impl Faucet {
    /// Create a faucet at `address`, owned by the caller of `ctx` and bound to `ledger`.
    pub fn new(
        ctx: &CallContext,
        address: Address,
        ledger: SharedLedger,
        native: SharedNativeBank,
        config: &FaucetConfig,
    ) -> FaucetResult<Self> {
        let withdrawal_amount = units::to_base_units(Amount::from(config.withdrawal_amount))?;

        let faucet = Self {
            address,
            owner: ctx.caller,
            ledger,
            native,
            withdrawal_amount,
            lock_time: config.lock_time().as_secs(),
            last_request_at: HashMap::new(),
            events: Vec::new(),
        };

        info!(
            "Faucet deployed at {} for token {} (owner {}, {} per request, {}s cooldown)",
            address,
            faucet.token(),
            ctx.caller,
            units::format_units(withdrawal_amount),
            faucet.lock_time
        );
        Ok(faucet)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Address of the ledger this faucet draws from
    pub fn token(&self) -> Address {
        self.read_ledger().address()
    }

    pub fn withdrawal_amount(&self) -> Amount {
        self.withdrawal_amount
    }

    pub fn lock_time(&self) -> u64 {
        self.lock_time
    }

    pub fn last_request_at(&self, account: &Address) -> Option<Timestamp> {
        self.last_request_at.get(account).copied()
    }

    /// Earliest time `account` may request again; `None` if it never has.
    pub fn next_request_at(&self, account: &Address) -> Option<Timestamp> {
        self.last_request_at(account)
            .map(|last| last.saturating_add(self.lock_time))
    }

    /// Tokens currently held by the faucet
    pub fn get_balance(&self) -> Amount {
        self.read_ledger().balance_of(&self.address)
    }

    /// Native currency currently held by the faucet
    pub fn native_balance(&self) -> Amount {
        self.read_native().balance_of(&self.address)
    }

    pub fn events(&self) -> &[FaucetEvent] {
        &self.events
    }

    /// Hand the recorded events to the caller and start a fresh log.
    pub fn take_events(&mut self) -> Vec<FaucetEvent> {
        std::mem::take(&mut self.events)
    }

    /// Pay `withdrawal_amount` to the caller, if its cooldown has elapsed and
    /// the faucet holds enough tokens. Returns the amount paid.
    pub fn request_tokens(&mut self, ctx: &CallContext) -> FaucetResult<Amount> {
        let account = ctx.caller;
        debug!("Token request from {} at {}", account, ctx.timestamp);

        // 1. Cooldown
        if let Some(available_at) = self.next_request_at(&account) {
            if ctx.timestamp < available_at {
                warn!(
                    "Address {} requested too soon. Remaining: {}s",
                    account,
                    available_at - ctx.timestamp
                );
                return Err(FaucetError::CooldownActive {
                    account,
                    available_at,
                });
            }
        }

        // The ledger stays locked until the payout is settled.
        let mut ledger = write_lock(&self.ledger);

        // 2. Funding
        let available = ledger.balance_of(&self.address);
        if available < self.withdrawal_amount {
            warn!(
                "Faucet balance low: {} available, {} required",
                units::format_units(available),
                units::format_units(self.withdrawal_amount)
            );
            return Err(FaucetError::InsufficientFaucetFunds {
                available,
                required: self.withdrawal_amount,
            });
        }

        // 3. Record the request before paying out, undo it if the payout fails
        let previous = self.last_request_at.insert(account, ctx.timestamp);
        let faucet_ctx = ctx.with_caller(self.address);
        if let Err(err) = ledger.transfer(&faucet_ctx, account, self.withdrawal_amount) {
            match previous {
                Some(at) => self.last_request_at.insert(account, at),
                None => self.last_request_at.remove(&account),
            };
            warn!("Payout to {} failed: {}", account, err);
            return Err(err.into());
        }

        self.events.push(FaucetEvent::TokensRequested {
            account,
            amount: self.withdrawal_amount,
            at: ctx.timestamp,
        });
        info!(
            "Dispensed {} to {}",
            units::format_units(self.withdrawal_amount),
            account
        );
        Ok(self.withdrawal_amount)
    }

    /// Set the per-request amount, in whole tokens.
    pub fn set_withdrawal_amount(&mut self, ctx: &CallContext, amount: Amount) -> FaucetResult<()> {
        self.only_owner(ctx)?;
        let amount = units::to_base_units(amount)?;

        let previous = std::mem::replace(&mut self.withdrawal_amount, amount);
        self.events.push(FaucetEvent::WithdrawalAmountChanged {
            previous,
            current: amount,
        });
        info!(
            "Withdrawal amount changed from {} to {}",
            units::format_units(previous),
            units::format_units(amount)
        );
        Ok(())
    }

    /// Set the cooldown, in minutes.
    pub fn set_lock_time(&mut self, ctx: &CallContext, minutes: u64) -> FaucetResult<()> {
        self.only_owner(ctx)?;
        let secs = minutes
            .checked_mul(60)
            .ok_or(FaucetError::LockTimeOverflow(minutes))?;

        let previous = std::mem::replace(&mut self.lock_time, secs);
        self.events.push(FaucetEvent::LockTimeChanged {
            previous,
            current: secs,
        });
        info!("Lock time changed from {}s to {}s", previous, secs);
        Ok(())
    }

    /// Move the faucet's entire token balance to the owner. Returns the amount moved.
    pub fn withdraw(&mut self, ctx: &CallContext) -> FaucetResult<Amount> {
        self.only_owner(ctx)?;

        let mut ledger = write_lock(&self.ledger);
        let amount = ledger.balance_of(&self.address);
        ledger.transfer(&ctx.with_caller(self.address), self.owner, amount)?;

        self.events.push(FaucetEvent::TokensWithdrawn {
            to: self.owner,
            amount,
        });
        info!("Withdrew {} tokens to owner {}", units::format_units(amount), self.owner);
        Ok(amount)
    }

    /// Move the faucet's entire native balance to the owner. Returns the amount moved.
    pub fn withdraw_eth(&mut self, ctx: &CallContext) -> FaucetResult<Amount> {
        self.only_owner(ctx)?;

        let mut native = write_lock(&self.native);
        let amount = native.balance_of(&self.address);
        native.transfer(self.address, self.owner, amount)?;

        self.events.push(FaucetEvent::NativeWithdrawn {
            to: self.owner,
            amount,
        });
        info!("Withdrew {} native to owner {}", amount, self.owner);
        Ok(amount)
    }

    fn only_owner(&self, ctx: &CallContext) -> FaucetResult<()> {
        if ctx.caller != self.owner {
            warn!("Rejected admin call from {}", ctx.caller);
            return Err(FaucetError::Unauthorized { caller: ctx.caller });
        }
        Ok(())
    }

    fn read_ledger(&self) -> RwLockReadGuard<'_, Ledger> {
        self.ledger.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_native(&self) -> RwLockReadGuard<'_, NativeBank> {
        self.native.read().unwrap_or_else(PoisonError::into_inner)
    }
}

fn write_lock<T>(lock: &std::sync::RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
