//! Rate-limited token faucet for the Shangesh ledger
//!
//! The faucet holds a pre-funded balance as an ordinary ledger account and
//! gives a fixed amount to each requester, at most once per cooldown period.
//! It never mints. Administrative settings and sweeps are owner-only.

pub mod config;
pub mod deploy;
pub mod error;
pub mod native;
pub mod service;

pub use config::{AppConfig, DeployConfig, FaucetConfig};
pub use deploy::{deploy, Deployment};
pub use error::{FaucetError, FaucetResult};
pub use native::{NativeBank, SharedNativeBank};
pub use service::{Faucet, FaucetEvent};
