//! Integration test: fee-adjusted transfers.
//!
//! With a 1/10 fee, the sender is debited the full amount, the recipient
//! credited the amount less the fee and the reward address the fee. The
//! fee rides on the same fragment ratio, so it keeps working across
//! rebases.

use gold_integration_tests::{deploy, rate, DAY, OWNER, T0};
use gold_ledger::LedgerError;
use gold_types::{Address, ErrorKind, Event, INITIAL_SUPPLY, UNIT};

const ALICE: Address = Address::repeat_byte(0x0a);
const BOB: Address = Address::repeat_byte(0x0b);
const REWARD: Address = Address::repeat_byte(0x05);

#[test]
fn twelve_token_transfer_with_tenth_fee() {
    let mut d = deploy();
    assert_eq!(d.ledger().balance_of(&OWNER), INITIAL_SUPPLY);
    d.ledger_mut()
        .set_reward_params(&OWNER, REWARD, 1, 10)
        .expect("fee");
    d.ledger_mut().take_events();

    d.ledger_mut()
        .transfer(&OWNER, ALICE, 12 * UNIT)
        .expect("transfer");
    assert_eq!(d.ledger().balance_of(&OWNER), INITIAL_SUPPLY - 12 * UNIT);
    assert_eq!(d.ledger().balance_of(&ALICE), 10_800_000_000);
    assert_eq!(d.ledger().balance_of(&REWARD), 1_200_000_000);
    assert_eq!(
        d.ledger_mut().take_events(),
        vec![
            Event::Transfer {
                from: OWNER,
                to: ALICE,
                value: 10_800_000_000,
            },
            Event::Transfer {
                from: OWNER,
                to: REWARD,
                value: 1_200_000_000,
            },
        ]
    );
}

#[test]
fn fee_applies_to_transfer_from() {
    let mut d = deploy();
    d.ledger_mut()
        .set_reward_params(&OWNER, REWARD, 1, 10)
        .expect("fee");
    d.ledger_mut().approve(&OWNER, BOB, 20 * UNIT).expect("approve");
    d.ledger_mut()
        .transfer_from(&BOB, OWNER, ALICE, 20 * UNIT)
        .expect("transfer_from");
    assert_eq!(d.ledger().balance_of(&ALICE), 18 * UNIT);
    assert_eq!(d.ledger().balance_of(&REWARD), 2 * UNIT);
    assert_eq!(d.ledger().allowance(&OWNER, &BOB), 0);
}

#[test]
fn fee_preserves_supply_across_rebase() {
    let mut d = deploy();
    d.ledger_mut()
        .set_reward_params(&OWNER, REWARD, 3, 100)
        .expect("fee");
    d.ledger_mut()
        .transfer(&OWNER, ALICE, 1_000 * UNIT)
        .expect("transfer");
    d.rebase_at(T0, rate(1_500)).expect("rebase");
    d.ledger_mut()
        .transfer(&ALICE, BOB, 100 * UNIT)
        .expect("transfer after rebase");
    d.rebase_at(T0 + DAY, rate(700)).expect("rebase");

    let held: u128 = [OWNER, ALICE, BOB, REWARD]
        .iter()
        .map(|a| d.ledger().balance_of(a))
        .sum();
    assert!(held <= d.ledger().total_supply());
    assert!(d.ledger().total_supply() - held <= 4);
}

#[test]
fn invalid_fee_rejected() {
    let mut d = deploy();
    let err = d
        .ledger_mut()
        .set_reward_params(&OWNER, REWARD, 11, 10)
        .expect_err("fee above 100%");
    assert!(matches!(err, LedgerError::InvalidFee { .. }));
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert!(d.ledger().reward_params().is_none());

    assert!(d
        .ledger_mut()
        .set_reward_params(&OWNER, REWARD, 0, 0)
        .is_err());
}
