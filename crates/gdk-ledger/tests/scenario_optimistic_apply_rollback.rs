//! Scenario: the optimistic apply → commit/rollback state machine.
//!
//! # Invariants under test
//!
//! 1. `apply(amt)` then `rollback()` restores the exact pre-apply balance.
//! 2. `commit` always takes the server-reported balance, even when a
//!    concurrent external adjustment makes it differ from local arithmetic.
//! 3. Only one adjustment may be in flight per (owner, balance kind);
//!    other owners and the other kind stay independent.
//! 4. Gold receipts scale weight by the fineness factor and round to whole
//!    milligrams; purity 1 means 100%.
//!
//! All tests are pure; no IO.

use gdk_ledger::{BalanceKind, BalanceLedger, LedgerError, Micros};

fn units(v: i64) -> Micros {
    Micros::from_units(v)
}

// ---------------------------------------------------------------------------
// 1. Rollback restores the pre-apply balance exactly
// ---------------------------------------------------------------------------

#[test]
fn rollback_after_apply_is_identity() {
    let mut ledger = BalanceLedger::new();
    ledger.load("u1", units(1000), Micros::new(3_500_000));
    let before = ledger.balance("u1");

    ledger.apply("u1", BalanceKind::Cash, units(500)).unwrap();
    assert_ne!(ledger.balance("u1"), before);

    ledger.rollback("u1", BalanceKind::Cash).unwrap();
    assert_eq!(ledger.balance("u1"), before);
    assert!(ledger.pending_txn("u1", BalanceKind::Cash).is_none());
}

#[test]
fn rollback_identity_holds_for_awkward_amounts() {
    // amounts that would lose bits through f64 round trips stay exact here
    let mut ledger = BalanceLedger::new();
    ledger.load("u1", Micros::new(123_456_789), Micros::ZERO);
    let before = ledger.balance("u1").cash;

    ledger
        .apply("u1", BalanceKind::Cash, Micros::new(987_654_321))
        .unwrap();
    let reverted = ledger.rollback("u1", BalanceKind::Cash).unwrap();

    assert_eq!(reverted, before);
}

// ---------------------------------------------------------------------------
// 2. Commit takes the server value
// ---------------------------------------------------------------------------

#[test]
fn commit_prefers_server_balance_over_local_sum() {
    let mut ledger = BalanceLedger::new();
    ledger.load("u1", units(1000), Micros::ZERO);

    let applied = ledger.apply("u1", BalanceKind::Cash, units(500)).unwrap();
    assert_eq!(applied.optimistic_balance, units(1500));

    // another channel debited 100 while our request was in flight
    let confirmed = ledger.commit("u1", BalanceKind::Cash, units(1400)).unwrap();
    assert_eq!(confirmed, units(1400));
    assert_eq!(ledger.balance("u1").cash, units(1400));
}

// ---------------------------------------------------------------------------
// 3. Serialization per slot
// ---------------------------------------------------------------------------

#[test]
fn overlapping_applies_are_refused_until_settled() {
    let mut ledger = BalanceLedger::new();
    ledger.apply("u1", BalanceKind::Cash, units(100)).unwrap();

    assert!(matches!(
        ledger.apply("u1", BalanceKind::Cash, units(1)),
        Err(LedgerError::LedgerBusy { .. })
    ));

    // the other balance kind and other owners proceed independently
    ledger.apply("u1", BalanceKind::Gold, units(1)).unwrap();
    ledger.apply("u2", BalanceKind::Cash, units(1)).unwrap();

    // settling frees the slot
    ledger.commit("u1", BalanceKind::Cash, units(100)).unwrap();
    ledger.apply("u1", BalanceKind::Cash, units(2)).unwrap();
}

// ---------------------------------------------------------------------------
// 4. Gold receipts
// ---------------------------------------------------------------------------

#[test]
fn gold_receipt_rounds_to_whole_milligrams() {
    let mut ledger = BalanceLedger::new();
    // 7 g at 916 fineness → 6.412 g exactly
    let applied = ledger.apply_gold_receipt("u1", 7.0, 916).unwrap();
    assert_eq!(applied.optimistic_balance, Micros::new(6_412_000));
}

#[test]
fn purity_one_keeps_full_weight() {
    let mut ledger = BalanceLedger::new();
    let applied = ledger.apply_gold_receipt("u1", 5.0, 1).unwrap();
    // 5.000 g, not 0.500 g
    assert_eq!(applied.optimistic_balance, units(5));
    assert_eq!(applied.pending.amount, units(5));
}

#[test]
fn gold_receipt_then_rollback_restores_balance() {
    let mut ledger = BalanceLedger::new();
    ledger.load("u1", Micros::ZERO, Micros::new(2_000_000));

    ledger.apply_gold_receipt("u1", 10.0, 9999).unwrap();
    assert_eq!(ledger.balance("u1").gold_grams, Micros::new(11_999_000));

    let reverted = ledger.rollback("u1", BalanceKind::Gold).unwrap();
    assert_eq!(reverted, Micros::new(2_000_000));
}

// ---------------------------------------------------------------------------
// 5. Negative balances stay unclamped
// ---------------------------------------------------------------------------

#[test]
fn debits_may_push_balances_negative() {
    let mut ledger = BalanceLedger::new();
    ledger.load("u1", units(100), units(1));

    ledger.apply("u1", BalanceKind::Cash, units(-500)).unwrap();
    ledger.commit("u1", BalanceKind::Cash, units(-400)).unwrap();
    assert_eq!(ledger.balance("u1").cash, units(-400));

    ledger.apply("u1", BalanceKind::Gold, units(-3)).unwrap();
    ledger.commit("u1", BalanceKind::Gold, units(-2)).unwrap();
    assert_eq!(ledger.balance("u1").gold_grams, units(-2));
}
