//! Optimistic balance ledger — the client-side state machine.
//!
//! # State machine
//! For each (owner, balance kind) the ledger is either **settled** or has
//! exactly one **in-flight** adjustment:
//!
//! - `apply` mutates the balance immediately (optimistic) and synthesizes a
//!   pending transaction for display.
//! - `commit` replaces the optimistic balance with the server's authoritative
//!   value — never the local arithmetic — and clears the slot.
//! - `rollback` subtracts the exact applied amount, restoring the pre-apply
//!   balance bit-for-bit, and discards the pending transaction.
//!
//! A second `apply` while a slot is occupied is refused with `LedgerBusy`;
//! overlapping optimistic states cannot be rolled back unambiguously.
//!
//! The ledger never performs IO and never notifies anyone; callers own the
//! network round trip and any user-facing side effects.

use std::collections::BTreeMap;
use std::fmt;

use chrono::Utc;
use uuid::Uuid;

use gdk_pricing::purity_factor;

use crate::micros::Micros;
use crate::types::{Balance, BalanceKind, Transaction, TxnType};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// All refusals the ledger can surface. The ledger is never mutated on error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The adjustment amount is zero or not a usable number.
    InvalidAmount,
    /// An adjustment is already in flight for this owner and balance kind.
    LedgerBusy { owner_id: String, kind: BalanceKind },
    /// `commit`/`rollback` was called with nothing in flight — a sequencing
    /// bug in the caller, not a no-op.
    NoPendingAdjustment { owner_id: String, kind: BalanceKind },
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::InvalidAmount => {
                write!(f, "adjustment amount must be a non-zero number")
            }
            LedgerError::LedgerBusy { owner_id, kind } => write!(
                f,
                "an adjustment is already in flight for {owner_id}/{}",
                kind.as_str()
            ),
            LedgerError::NoPendingAdjustment { owner_id, kind } => write!(
                f,
                "no adjustment in flight for {owner_id}/{}",
                kind.as_str()
            ),
        }
    }
}

impl std::error::Error for LedgerError {}

// ---------------------------------------------------------------------------
// Apply result
// ---------------------------------------------------------------------------

/// What `apply` hands back for immediate UI reflection.
#[derive(Clone, Debug, PartialEq)]
pub struct AppliedAdjustment {
    /// Balance after the optimistic mutation.
    pub optimistic_balance: Micros,
    /// The client-synthesized pending transaction (temp id).
    pub pending: Transaction,
}

#[derive(Clone, Debug)]
struct PendingSlot {
    amount: Micros,
    txn: Transaction,
}

// ---------------------------------------------------------------------------
// BalanceLedger
// ---------------------------------------------------------------------------

/// In-memory balances for any number of owners, plus one pending slot per
/// (owner, balance kind).
#[derive(Clone, Debug, Default)]
pub struct BalanceLedger {
    balances: BTreeMap<String, Balance>,
    pending: BTreeMap<(String, BalanceKind), PendingSlot>,
}

impl BalanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Loading / reading
    // -----------------------------------------------------------------------

    /// Seed an owner's balances from a fetched profile. Replaces any prior
    /// snapshot; pending slots are untouched.
    pub fn load(&mut self, owner_id: impl Into<String>, cash: Micros, gold_grams: Micros) {
        self.balances
            .insert(owner_id.into(), Balance { cash, gold_grams });
    }

    /// Current balance snapshot; zero balances for unknown owners.
    pub fn balance(&self, owner_id: &str) -> Balance {
        self.balances.get(owner_id).copied().unwrap_or_default()
    }

    /// The pending transaction for a slot, if an adjustment is in flight.
    pub fn pending_txn(&self, owner_id: &str, kind: BalanceKind) -> Option<&Transaction> {
        self.pending
            .get(&(owner_id.to_string(), kind))
            .map(|slot| &slot.txn)
    }

    pub fn has_pending(&self, owner_id: &str, kind: BalanceKind) -> bool {
        self.pending.contains_key(&(owner_id.to_string(), kind))
    }

    // -----------------------------------------------------------------------
    // State transitions
    // -----------------------------------------------------------------------

    /// Optimistically apply a signed adjustment.
    ///
    /// # Errors
    /// `InvalidAmount` for a zero amount; `LedgerBusy` when an adjustment is
    /// already in flight for this owner and kind. The balance is untouched
    /// on error.
    pub fn apply(
        &mut self,
        owner_id: &str,
        kind: BalanceKind,
        amount: Micros,
    ) -> Result<AppliedAdjustment, LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::InvalidAmount);
        }
        let slot_key = (owner_id.to_string(), kind);
        if self.pending.contains_key(&slot_key) {
            return Err(LedgerError::LedgerBusy {
                owner_id: owner_id.to_string(),
                kind,
            });
        }

        let entry = self.balances.entry(owner_id.to_string()).or_default();
        let new_balance = entry.get(kind).saturating_add(amount);
        entry.set(kind, new_balance);

        let txn = Transaction {
            id: format!("temp-{}", Uuid::new_v4()),
            transaction_id: format!("TXN-{}", Uuid::new_v4()),
            owner_id: owner_id.to_string(),
            txn_type: TxnType::from_signed(amount),
            method: "RECEIVED".to_string(),
            amount: amount.abs(),
            balance_type: kind,
            balance_after: new_balance,
            created_at: Utc::now(),
            order_ref: None,
        };

        self.pending.insert(
            slot_key,
            PendingSlot {
                amount,
                txn: txn.clone(),
            },
        );

        Ok(AppliedAdjustment {
            optimistic_balance: new_balance,
            pending: txn,
        })
    }

    /// Apply a gold receipt expressed as weight + fineness code.
    ///
    /// The pure gold content is `purity_factor(purity) × weight`, rounded to
    /// whole milligrams before it enters the ledger. Purity 1 means 100%.
    pub fn apply_gold_receipt(
        &mut self,
        owner_id: &str,
        weight_grams: f64,
        purity: u32,
    ) -> Result<AppliedAdjustment, LedgerError> {
        if !weight_grams.is_finite() || weight_grams == 0.0 || purity == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        let pure = purity_factor(purity) * weight_grams;
        let amount = Micros::from_grams_rounded(pure).ok_or(LedgerError::InvalidAmount)?;
        self.apply(owner_id, BalanceKind::Gold, amount)
    }

    /// Confirm the in-flight adjustment with the server's authoritative
    /// balance. The server value always wins, even when it differs from the
    /// local arithmetic (concurrent adjustments may have landed server-side).
    pub fn commit(
        &mut self,
        owner_id: &str,
        kind: BalanceKind,
        server_balance: Micros,
    ) -> Result<Micros, LedgerError> {
        let slot_key = (owner_id.to_string(), kind);
        if self.pending.remove(&slot_key).is_none() {
            return Err(LedgerError::NoPendingAdjustment {
                owner_id: owner_id.to_string(),
                kind,
            });
        }
        let entry = self.balances.entry(owner_id.to_string()).or_default();
        entry.set(kind, server_balance);
        Ok(server_balance)
    }

    /// Undo the in-flight adjustment by subtracting the exact applied amount.
    /// Returns the reverted balance.
    pub fn rollback(&mut self, owner_id: &str, kind: BalanceKind) -> Result<Micros, LedgerError> {
        let slot_key = (owner_id.to_string(), kind);
        let slot = self
            .pending
            .remove(&slot_key)
            .ok_or_else(|| LedgerError::NoPendingAdjustment {
                owner_id: owner_id.to_string(),
                kind,
            })?;
        let entry = self.balances.entry(owner_id.to_string()).or_default();
        let reverted = entry.get(kind).saturating_sub(slot.amount);
        entry.set(kind, reverted);
        Ok(reverted)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
