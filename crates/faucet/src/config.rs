//! Faucet and deployment configuration

use serde::{Deserialize, Serialize};
use shangesh_common::utils::config::load_config;
use shangesh_common::utils::logging::LoggingConfig;
use shangesh_common::Result;
use std::path::Path;
use std::time::Duration;

/// Faucet settings applied at construction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FaucetConfig {
    /// Whole tokens given out per successful request
    pub withdrawal_amount: u64,

    /// Cooldown between successful requests from one account (seconds)
    pub lock_time_secs: u64,
}

impl Default for FaucetConfig {
    fn default() -> Self {
        Self {
            withdrawal_amount: 50,
            lock_time_secs: 60,
        }
    }
}

impl FaucetConfig {
    /// Overlay environment variables onto this configuration
    pub fn with_env(mut self) -> Self {
        if let Ok(amount) = std::env::var("FAUCET_WITHDRAWAL_AMOUNT") {
            self.withdrawal_amount = amount.parse().unwrap_or(self.withdrawal_amount);
        }

        if let Ok(lock_time) = std::env::var("FAUCET_LOCK_TIME_SECS") {
            self.lock_time_secs = lock_time.parse().unwrap_or(self.lock_time_secs);
        }

        self
    }

    /// Get cooldown duration
    pub fn lock_time(&self) -> Duration {
        Duration::from_secs(self.lock_time_secs)
    }
}

/// Parameters of the deployment sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    pub token_name: String,
    pub token_symbol: String,

    /// Supply cap (whole tokens)
    pub cap: u64,

    /// Block reward setting (whole tokens)
    pub block_reward: u64,

    /// Tokens moved from the deployer to the faucet (whole tokens)
    pub faucet_funding: u64,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            token_name: "Shangesh".to_string(),
            token_symbol: "SHAN".to_string(),
            cap: 10_000_000,
            block_reward: 50,
            faucet_funding: 100_000,
        }
    }
}

impl DeployConfig {
    /// Overlay environment variables onto this configuration
    pub fn with_env(mut self) -> Self {
        if let Ok(cap) = std::env::var("SHANGESH_CAP") {
            self.cap = cap.parse().unwrap_or(self.cap);
        }

        if let Ok(reward) = std::env::var("SHANGESH_BLOCK_REWARD") {
            self.block_reward = reward.parse().unwrap_or(self.block_reward);
        }

        if let Ok(funding) = std::env::var("SHANGESH_FAUCET_FUNDING") {
            self.faucet_funding = funding.parse().unwrap_or(self.faucet_funding);
        }

        self
    }
}

/// Complete configuration of the `faucet` binary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub deploy: DeployConfig,
    pub faucet: FaucetConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load from a config file, then overlay environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config: AppConfig = match path {
            Some(path) => load_config(path)?,
            None => AppConfig::default(),
        };

        Ok(Self {
            deploy: config.deploy.with_env(),
            faucet: config.faucet.with_env(),
            logging: config.logging,
        })
    }
}
