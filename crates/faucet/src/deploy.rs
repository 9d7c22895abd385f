//! Deployment sequence: ledger, faucet, initial funding.

use shangesh_common::units;
use shangesh_common::{Address, Amount, CallContext};
use shangesh_token::{Ledger, SharedLedger, TokenMetadata};
use tracing::info;

use crate::config::{DeployConfig, FaucetConfig};
use crate::error::FaucetResult;
use crate::native::{NativeBank, SharedNativeBank};
use crate::service::Faucet;

/// Components created by [`deploy`].
pub struct Deployment {
    pub deployer: Address,
    pub ledger: SharedLedger,
    pub native: SharedNativeBank,
    pub faucet: Faucet,
}

/// Deploy the ledger and the faucet from `ctx.caller`, then move
/// `faucet_funding` tokens from the deployer to the faucet.
pub fn deploy(
    ctx: &CallContext,
    deploy_config: &DeployConfig,
    faucet_config: &FaucetConfig,
) -> FaucetResult<Deployment> {
    let deployer = ctx.caller;

    info!("Deploying {} token contract...", deploy_config.token_name);
    let ledger = Ledger::new(
        ctx,
        Address::contract_address(&deployer, 0),
        TokenMetadata::new(&deploy_config.token_name, &deploy_config.token_symbol),
        Amount::from(deploy_config.cap),
        Amount::from(deploy_config.block_reward),
    )?
    .into_shared();

    info!("Deploying faucet contract...");
    let native = NativeBank::new().into_shared();
    let faucet = Faucet::new(
        ctx,
        Address::contract_address(&deployer, 1),
        ledger.clone(),
        native.clone(),
        faucet_config,
    )?;

    let funding = units::to_base_units(Amount::from(deploy_config.faucet_funding))?;
    ledger
        .write()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .transfer(ctx, faucet.address(), funding)?;
    info!(
        "Sent {} {} tokens to the faucet",
        units::format_units(funding),
        deploy_config.token_symbol
    );

    Ok(Deployment {
        deployer,
        ledger,
        native,
        faucet,
    })
}
