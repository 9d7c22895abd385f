//! End-to-end faucet scenarios against a shared ledger.
//! Run with: cargo test -p shangesh-faucet --test faucet_scenarios

use shangesh_common::units::{format_units, to_base_units, SCALE};
use shangesh_common::utils::logging::init_test_logging;
use shangesh_common::{Address, Amount, Clock, ManualClock};
use shangesh_faucet::{deploy, DeployConfig, Deployment, FaucetConfig, FaucetError};
use shangesh_token::TokenError;

const START: u64 = 1_700_000_000;

fn owner() -> Address {
    Address::from_label("owner")
}

fn user(n: u8) -> Address {
    Address::from_label(&format!("user{}", n))
}

/// Ledger with cap 100,000,000 and reward 50; faucet funded with 10,000 tokens.
fn setup(clock: &ManualClock) -> Deployment {
    init_test_logging();
    let config = DeployConfig {
        cap: 100_000_000,
        block_reward: 50,
        faucet_funding: 10_000,
        ..Default::default()
    };
    deploy(&clock.context(owner()), &config, &FaucetConfig::default()).unwrap()
}

fn token_balance(deployment: &Deployment, account: &Address) -> Amount {
    deployment.ledger.read().unwrap().balance_of(account)
}

#[test]
fn test_claim_cooldown_and_reclaim() {
    let clock = ManualClock::new(START);
    let mut d = setup(&clock);

    {
        let ledger = d.ledger.read().unwrap();
        assert_eq!(ledger.balance_of(&owner()), (2_000_000 - 10_000) * SCALE);
        assert_eq!(ledger.total_supply(), 2_000_000 * SCALE);
        assert_eq!(format_units(ledger.cap()), "100000000.0");
    }
    assert_eq!(format_units(d.faucet.withdrawal_amount()), "50.0");
    assert_eq!(d.faucet.lock_time(), 60);

    let paid = d.faucet.request_tokens(&clock.context(user(1))).unwrap();
    assert_eq!(paid, 50 * SCALE);
    assert_eq!(token_balance(&d, &user(1)), 50 * SCALE);
    assert_eq!(d.faucet.get_balance(), 9_950 * SCALE);

    let err = d.faucet.request_tokens(&clock.context(user(1))).unwrap_err();
    assert!(matches!(err, FaucetError::CooldownActive { .. }));
    assert_eq!(d.faucet.get_balance(), 9_950 * SCALE);

    clock.advance(60);
    d.faucet.request_tokens(&clock.context(user(1))).unwrap();
    assert_eq!(token_balance(&d, &user(1)), 100 * SCALE);
    assert_eq!(d.faucet.get_balance(), 9_900 * SCALE);
}

#[test]
fn test_cooldown_window_is_half_open() {
    let clock = ManualClock::new(START);
    let mut d = setup(&clock);
    d.faucet.request_tokens(&clock.context(user(1))).unwrap();

    for offset in 0..60 {
        clock.set(START + offset);
        let err = d.faucet.request_tokens(&clock.context(user(1))).unwrap_err();
        assert!(matches!(err, FaucetError::CooldownActive { .. }));
        assert_eq!(d.faucet.last_request_at(&user(1)), Some(START));
    }

    clock.set(START + 60);
    assert!(d.faucet.request_tokens(&clock.context(user(1))).is_ok());
}

#[test]
fn test_cooldown_is_per_account() {
    let clock = ManualClock::new(START);
    let mut d = setup(&clock);

    d.faucet.request_tokens(&clock.context(user(1))).unwrap();
    d.faucet.request_tokens(&clock.context(user(2))).unwrap();
    assert_eq!(token_balance(&d, &user(2)), 50 * SCALE);
    assert_eq!(d.faucet.last_request_at(&user(3)), None);
}

#[test]
fn test_insufficient_funds_regardless_of_cooldown() {
    let clock = ManualClock::new(START);
    let mut d = setup(&clock);
    let owner_ctx = clock.context(owner());

    // User 1 is cooling down, user 2 has never claimed.
    d.faucet.request_tokens(&clock.context(user(1))).unwrap();
    let balance = d.faucet.get_balance();
    d.faucet
        .set_withdrawal_amount(&owner_ctx, balance / SCALE * 2)
        .unwrap();

    let err = d.faucet.request_tokens(&clock.context(user(2))).unwrap_err();
    assert_eq!(
        err,
        FaucetError::InsufficientFaucetFunds {
            available: balance,
            required: balance * 2,
        }
    );
    assert_eq!(err.to_string(), "Faucet has insufficient tokens");
    assert_eq!(d.faucet.last_request_at(&user(2)), None);

    clock.advance(60);
    let err = d.faucet.request_tokens(&clock.context(user(1))).unwrap_err();
    assert!(matches!(err, FaucetError::InsufficientFaucetFunds { .. }));
    assert_eq!(d.faucet.last_request_at(&user(1)), Some(START));
}

#[test]
fn test_failed_requests_leave_timestamps_untouched() {
    let clock = ManualClock::new(START);
    let mut d = setup(&clock);

    d.faucet.request_tokens(&clock.context(user(1))).unwrap();
    clock.advance(30);
    let _ = d.faucet.request_tokens(&clock.context(user(1)));
    assert_eq!(d.faucet.last_request_at(&user(1)), Some(START));

    let err = d.faucet.request_tokens(&clock.context(Address::ZERO)).unwrap_err();
    assert_eq!(
        err,
        FaucetError::Token(TokenError::InvalidRecipient(Address::ZERO))
    );
    assert_eq!(d.faucet.last_request_at(&Address::ZERO), None);
}

#[test]
fn test_admin_settings() {
    let clock = ManualClock::new(START);
    let mut d = setup(&clock);
    let owner_ctx = clock.context(owner());

    d.faucet.set_withdrawal_amount(&owner_ctx, 100).unwrap();
    assert_eq!(format_units(d.faucet.withdrawal_amount()), "100.0");

    d.faucet.set_lock_time(&owner_ctx, 5).unwrap();
    assert_eq!(d.faucet.lock_time(), 300);

    d.faucet.request_tokens(&clock.context(user(1))).unwrap();
    assert_eq!(token_balance(&d, &user(1)), to_base_units(100).unwrap());
}

#[test]
fn test_owner_exclusivity() {
    let clock = ManualClock::new(START);
    let mut d = setup(&clock);
    d.native.write().unwrap().deposit(d.faucet.address(), SCALE).unwrap();

    let strangers = [user(1), user(2), Address::ZERO, d.faucet.address(), d.faucet.token()];
    for stranger in strangers {
        let ctx = clock.context(stranger);
        let unauthorized = |result: Result<(), FaucetError>| {
            let err = result.unwrap_err();
            assert_eq!(err, FaucetError::Unauthorized { caller: stranger });
            assert_eq!(err.to_string(), "Only the contract owner can call this");
        };
        unauthorized(d.faucet.set_withdrawal_amount(&ctx, 100));
        unauthorized(d.faucet.set_lock_time(&ctx, 5));
        unauthorized(d.faucet.withdraw(&ctx).map(|_| ()));
        unauthorized(d.faucet.withdraw_eth(&ctx).map(|_| ()));

        let ledger_err = d
            .ledger
            .write()
            .unwrap()
            .set_block_reward(&ctx, 100)
            .unwrap_err();
        assert_eq!(ledger_err, TokenError::Unauthorized { caller: stranger });
    }

    assert_eq!(d.faucet.withdrawal_amount(), 50 * SCALE);
    assert_eq!(d.faucet.lock_time(), 60);
    assert_eq!(d.faucet.get_balance(), 10_000 * SCALE);
    assert_eq!(d.faucet.native_balance(), SCALE);
    assert_eq!(d.ledger.read().unwrap().block_reward(), 50 * SCALE);
}

#[test]
fn test_withdraw_drains_tokens_to_owner() {
    let clock = ManualClock::new(START);
    let mut d = setup(&clock);
    d.faucet.request_tokens(&clock.context(user(1))).unwrap();

    let owner_before = token_balance(&d, &owner());
    let faucet_before = d.faucet.get_balance();

    let moved = d.faucet.withdraw(&clock.context(owner())).unwrap();
    assert_eq!(moved, faucet_before);
    assert_eq!(d.faucet.get_balance(), 0);
    assert_eq!(token_balance(&d, &owner()), owner_before + faucet_before);

    // Empty faucet: nothing left to dispense, second sweep is a no-op.
    let err = d.faucet.request_tokens(&clock.context(user(2))).unwrap_err();
    assert!(matches!(err, FaucetError::InsufficientFaucetFunds { .. }));
    assert_eq!(d.faucet.withdraw(&clock.context(owner())).unwrap(), 0);
}

#[test]
fn test_withdraw_eth_is_separate_from_tokens() {
    let clock = ManualClock::new(START);
    let mut d = setup(&clock);
    let one_eth = SCALE;

    {
        let mut native = d.native.write().unwrap();
        native.deposit(owner(), 5 * one_eth).unwrap();
        native.transfer(owner(), d.faucet.address(), one_eth).unwrap();
    }
    assert_eq!(d.faucet.native_balance(), one_eth);
    let tokens_before = d.faucet.get_balance();

    let moved = d.faucet.withdraw_eth(&clock.context(owner())).unwrap();
    assert_eq!(moved, one_eth);
    assert_eq!(d.faucet.native_balance(), 0);
    assert_eq!(d.native.read().unwrap().balance_of(&owner()), 5 * one_eth);
    assert_eq!(d.faucet.get_balance(), tokens_before);
}

#[test]
fn test_withdraw_eth_refuses_to_overflow_owner_balance() {
    let clock = ManualClock::new(START);
    let mut d = setup(&clock);

    {
        let mut native = d.native.write().unwrap();
        native.deposit(owner(), u128::MAX - 10).unwrap();
        native.deposit(d.faucet.address(), 100).unwrap();
    }

    let err = d.faucet.withdraw_eth(&clock.context(owner())).unwrap_err();
    assert!(matches!(err, FaucetError::NativeBalanceOverflow { .. }));
    assert_eq!(d.faucet.native_balance(), 100);
    assert_eq!(d.native.read().unwrap().balance_of(&owner()), u128::MAX - 10);
    assert!(d.faucet.events().is_empty());
}

#[test]
fn test_supply_is_conserved_across_claims_and_transfers() {
    let clock = ManualClock::new(START);
    let mut d = setup(&clock);

    for round in 0..5u8 {
        for n in 0..4u8 {
            d.faucet.request_tokens(&clock.context(user(n))).unwrap();
        }
        let from = user(round % 4);
        d.ledger
            .write()
            .unwrap()
            .transfer(&clock.context(from), user((round + 1) % 4), 25 * SCALE)
            .unwrap();
        clock.advance(60);

        let ledger = d.ledger.read().unwrap();
        let sum: Amount = ledger.holders().map(|(_, balance)| *balance).sum();
        assert_eq!(sum, ledger.total_supply());
        assert_eq!(ledger.total_supply(), 2_000_000 * SCALE);
        assert!(ledger.total_supply() <= ledger.cap());
    }
    assert_eq!(d.faucet.get_balance(), (10_000 - 5 * 4 * 50) * SCALE);
}
