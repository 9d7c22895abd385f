//! Shangesh token ledger.
//!
//! A fungible token with a fixed supply cap. The owner receives an initial
//! allocation at construction; holders can transfer, delegate allowances and
//! burn. The owner alone can adjust the block reward setting.

pub mod error;
pub mod events;
pub mod ledger;

pub use error::{TokenError, TokenResult};
pub use events::LedgerEvent;
pub use ledger::{Ledger, SharedLedger, TokenMetadata, INITIAL_ALLOCATION};
