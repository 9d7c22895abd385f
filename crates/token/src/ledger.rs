//! Balance accounting, supply cap and owner-gated settings.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use shangesh_common::units::{self, DECIMALS};
use shangesh_common::{Address, Amount, CallContext};
use tracing::{debug, info, warn};

use crate::error::{TokenError, TokenResult};
use crate::events::LedgerEvent;

/// Whole tokens credited to the owner at construction.
pub const INITIAL_ALLOCATION: Amount = 2_000_000;

/// Ledger handle shared between direct holders and the faucet.
pub type SharedLedger = Arc<RwLock<Ledger>>;

/// Descriptive token metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl TokenMetadata {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals: DECIMALS,
        }
    }
}

impl Default for TokenMetadata {
    fn default() -> Self {
        Self::new("Shangesh", "SHAN")
    }
}

/// Capped fungible token ledger.
///
/// Invariants:
/// - the sum of all balances equals `total_supply`
/// - `total_supply <= cap`
/// - every operation applies fully or not at all
#[derive(Debug)]
pub struct Ledger {
    address: Address,
    owner: Address,
    metadata: TokenMetadata,
    cap: Amount,
    total_supply: Amount,
    block_reward: Amount,
    balances: HashMap<Address, Amount>,
    allowances: HashMap<(Address, Address), Amount>,
    events: Vec<LedgerEvent>,
}

impl Ledger {
    /// Deploy a ledger at `address`, owned by the caller of `ctx`.
    ///
    /// `cap` and `block_reward` are whole tokens. The owner is credited with
    /// [`INITIAL_ALLOCATION`] tokens, counted against the cap.
    pub fn new(
        ctx: &CallContext,
        address: Address,
        metadata: TokenMetadata,
        cap: Amount,
        block_reward: Amount,
    ) -> TokenResult<Self> {
        let cap = units::to_base_units(cap)?;
        if cap == 0 {
            return Err(TokenError::InvalidCap);
        }
        let block_reward = units::to_base_units(block_reward)?;

        let mut ledger = Self {
            address,
            owner: ctx.caller,
            metadata,
            cap,
            total_supply: 0,
            block_reward,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            events: Vec::new(),
        };
        ledger.mint(ctx.caller, units::to_base_units(INITIAL_ALLOCATION)?)?;

        info!(
            "{} ledger deployed at {} (owner {}, cap {})",
            ledger.metadata.symbol,
            address,
            ctx.caller,
            units::format_units(cap)
        );
        Ok(ledger)
    }

    /// Wrap the ledger for shared use.
    pub fn into_shared(self) -> SharedLedger {
        Arc::new(RwLock::new(self))
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    pub fn cap(&self) -> Amount {
        self.cap
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Reward setting for external block-production logic. Never mints.
    pub fn block_reward(&self) -> Amount {
        self.block_reward
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    /// Accounts with a non-zero balance.
    pub fn holders(&self) -> impl Iterator<Item = (&Address, &Amount)> {
        self.balances.iter().filter(|(_, balance)| **balance > 0)
    }

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Hand the recorded events to the caller and start a fresh log.
    pub fn take_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Move `amount` base units from the caller to `to`.
    pub fn transfer(&mut self, ctx: &CallContext, to: Address, amount: Amount) -> TokenResult<()> {
        self.move_balance(ctx.caller, to, amount)
    }

    /// Let `spender` move up to `amount` of the caller's balance.
    pub fn approve(&mut self, ctx: &CallContext, spender: Address, amount: Amount) -> TokenResult<()> {
        if spender.is_zero() {
            return Err(TokenError::InvalidRecipient(spender));
        }
        self.set_allowance(ctx.caller, spender, amount);
        self.events.push(LedgerEvent::Approval {
            owner: ctx.caller,
            spender,
            amount,
        });
        debug!("{} approved {} to spend {}", ctx.caller, spender, amount);
        Ok(())
    }

    /// Move `amount` from `from` to `to` on the strength of the caller's allowance.
    pub fn transfer_from(
        &mut self,
        ctx: &CallContext,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> TokenResult<()> {
        let remaining = self.check_allowance(&from, &ctx.caller, amount)?;
        self.move_balance(from, to, amount)?;
        self.set_allowance(from, ctx.caller, remaining);
        Ok(())
    }

    /// Destroy `amount` of the caller's balance.
    pub fn burn(&mut self, ctx: &CallContext, amount: Amount) -> TokenResult<()> {
        self.burn_balance(ctx.caller, amount)
    }

    /// Destroy `amount` of `account`'s balance on the strength of the caller's allowance.
    pub fn burn_from(&mut self, ctx: &CallContext, account: Address, amount: Amount) -> TokenResult<()> {
        let remaining = self.check_allowance(&account, &ctx.caller, amount)?;
        self.burn_balance(account, amount)?;
        self.set_allowance(account, ctx.caller, remaining);
        Ok(())
    }

    /// Replace the block reward setting. `reward` is in whole tokens.
    pub fn set_block_reward(&mut self, ctx: &CallContext, reward: Amount) -> TokenResult<()> {
        self.only_owner(ctx)?;
        let reward = units::to_base_units(reward)?;

        let previous = std::mem::replace(&mut self.block_reward, reward);
        self.events.push(LedgerEvent::BlockRewardChanged {
            previous,
            current: reward,
        });
        info!(
            "Block reward changed from {} to {}",
            units::format_units(previous),
            units::format_units(reward)
        );
        Ok(())
    }

    fn only_owner(&self, ctx: &CallContext) -> TokenResult<()> {
        if ctx.caller != self.owner {
            warn!("Rejected owner-only call from {}", ctx.caller);
            return Err(TokenError::Unauthorized { caller: ctx.caller });
        }
        Ok(())
    }

    fn check_allowance(&self, owner: &Address, spender: &Address, amount: Amount) -> TokenResult<Amount> {
        let available = self.allowance(owner, spender);
        available
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientAllowance {
                owner: *owner,
                spender: *spender,
                available,
                required: amount,
            })
    }

    fn debited_balance(&self, account: &Address, amount: Amount) -> TokenResult<Amount> {
        let available = self.balance_of(account);
        available
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientBalance {
                account: *account,
                available,
                required: amount,
            })
    }

    fn set_allowance(&mut self, owner: Address, spender: Address, amount: Amount) {
        if amount == 0 {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
    }

    fn set_balance(&mut self, account: Address, balance: Amount) {
        if balance == 0 {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, balance);
        }
    }

    fn move_balance(&mut self, from: Address, to: Address, amount: Amount) -> TokenResult<()> {
        if to.is_zero() {
            return Err(TokenError::InvalidRecipient(to));
        }
        let from_balance = self.debited_balance(&from, amount)?;
        self.set_balance(from, from_balance);
        // Read after the debit so a self-transfer nets out to no change.
        // Cannot overflow: the sum of all balances is bounded by the cap.
        let to_balance = self.balance_of(&to) + amount;
        self.set_balance(to, to_balance);

        self.events.push(LedgerEvent::Transfer { from, to, amount });
        debug!("Transferred {} from {} to {}", amount, from, to);
        Ok(())
    }

    fn mint(&mut self, to: Address, amount: Amount) -> TokenResult<()> {
        let total_supply = self
            .total_supply
            .checked_add(amount)
            .filter(|supply| *supply <= self.cap)
            .ok_or(TokenError::CapExceeded {
                cap: self.cap,
                total_supply: self.total_supply,
                amount,
            })?;
        self.total_supply = total_supply;
        let balance = self.balance_of(&to) + amount;
        self.set_balance(to, balance);

        self.events.push(LedgerEvent::Transfer {
            from: Address::ZERO,
            to,
            amount,
        });
        debug!("Minted {} to {}", amount, to);
        Ok(())
    }

    fn burn_balance(&mut self, account: Address, amount: Amount) -> TokenResult<()> {
        let balance = self.debited_balance(&account, amount)?;
        self.set_balance(account, balance);
        // Cannot underflow: total supply is at least any single balance.
        self.total_supply -= amount;

        self.events.push(LedgerEvent::Transfer {
            from: account,
            to: Address::ZERO,
            amount,
        });
        info!("{} burned {}", account, units::format_units(amount));
        Ok(())
    }
}
