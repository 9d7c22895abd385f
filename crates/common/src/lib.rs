//! Shared primitives for the Shangesh token ledger and its faucet.

pub mod context;
pub mod error;
pub mod types;
pub mod units;
pub mod utils;

pub use context::{CallContext, Clock, ManualClock, SystemClock, Timestamp};
pub use error::{CommonError, Result};
pub use types::{Address, Amount, ADDRESS_LENGTH};
