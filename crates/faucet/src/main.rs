//! Deploys the Shangesh ledger and faucet and optionally replays claims

use clap::Parser;
use shangesh_common::units::{format_units, parse_units};
use shangesh_common::utils::logging::init_logging;
use shangesh_common::{Address, Clock, SystemClock};
use shangesh_faucet::{deploy, AppConfig};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Faucet deployment CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Deployer address (defaults to a fixed development identity)
    #[arg(long)]
    deployer: Option<Address>,

    /// Supply cap (whole tokens)
    #[arg(long)]
    cap: Option<u64>,

    /// Block reward setting (whole tokens)
    #[arg(long)]
    block_reward: Option<u64>,

    /// Initial faucet funding (whole tokens)
    #[arg(long)]
    fund: Option<u64>,

    /// Tokens per request (whole tokens)
    #[arg(long)]
    withdrawal_amount: Option<u64>,

    /// Cooldown between requests (minutes)
    #[arg(long)]
    lock_minutes: Option<u64>,

    /// Native currency credited to the faucet after deployment (decimal, e.g. "0.5")
    #[arg(long, value_parser = parse_units)]
    native_funding: Option<u128>,

    /// Request tokens for this address after deployment (repeatable)
    #[arg(long = "claim", value_name = "ADDRESS")]
    claims: Vec<Address>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = AppConfig::load(args.config.as_deref())?;

    // Override with CLI arguments
    if args.debug {
        config.logging.level = "debug".to_string();
    }

    if let Some(cap) = args.cap {
        config.deploy.cap = cap;
    }

    if let Some(reward) = args.block_reward {
        config.deploy.block_reward = reward;
    }

    if let Some(fund) = args.fund {
        config.deploy.faucet_funding = fund;
    }

    if let Some(amount) = args.withdrawal_amount {
        config.faucet.withdrawal_amount = amount;
    }

    if let Some(minutes) = args.lock_minutes {
        config.faucet.lock_time_secs = minutes
            .checked_mul(60)
            .ok_or_else(|| anyhow::anyhow!("lock time of {} minutes is too large", minutes))?;
    }

    init_logging(&config.logging)?;

    info!("Configuration:");
    info!("  Token: {} ({})", config.deploy.token_name, config.deploy.token_symbol);
    info!("  Cap: {} tokens", config.deploy.cap);
    info!("  Block reward: {} tokens", config.deploy.block_reward);
    info!("  Faucet funding: {} tokens", config.deploy.faucet_funding);
    info!("  Withdrawal amount: {} tokens", config.faucet.withdrawal_amount);
    info!("  Cooldown: {}s", config.faucet.lock_time_secs);

    let clock = SystemClock;
    let deployer = args
        .deployer
        .unwrap_or_else(|| Address::from_label("shangesh-deployer"));
    let mut deployment = deploy(&clock.context(deployer), &config.deploy, &config.faucet)?;

    if let Some(amount) = args.native_funding {
        deployment
            .native
            .write()
            .map_err(|_| anyhow::anyhow!("native bank lock poisoned"))?
            .deposit(deployment.faucet.address(), amount)?;
        info!("Credited {} native to the faucet", format_units(amount));
    }

    for account in &args.claims {
        match deployment.faucet.request_tokens(&clock.context(*account)) {
            Ok(amount) => info!("Claimed {} for {}", format_units(amount), account),
            Err(e) => warn!("Claim for {} rejected: {}", account, e),
        }
    }

    for event in deployment.faucet.take_events() {
        debug!("Faucet event: {:?}", event);
    }

    let token = deployment.faucet.token();
    let faucet_balance = deployment.faucet.get_balance();
    let deployer_balance = deployment
        .ledger
        .read()
        .map_err(|_| anyhow::anyhow!("ledger lock poisoned"))?
        .balance_of(&deployment.deployer);

    info!("Deployment Summary:");
    info!("-------------------");
    info!("{} Token: {}", config.deploy.token_name, token);
    info!("Faucet: {}", deployment.faucet.address());
    info!("Owner: {}", deployment.deployer);
    info!("Owner balance: {}", format_units(deployer_balance));
    info!("Faucet balance: {}", format_units(faucet_balance));
    info!(
        "Faucet native balance: {}",
        format_units(deployment.faucet.native_balance())
    );

    Ok(())
}
