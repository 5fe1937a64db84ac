//! Authority book — the server-side, append-only side of the ledger.
//!
//! Where [`BalanceLedger`](crate::ledger::BalanceLedger) models the client's
//! optimistic view, `AuthorityBook` models the system of record: every posted
//! adjustment appends an authoritative transaction in serialization order,
//! `balance_after` is computed at post time, and the whole state can be
//! recomputed from the log for integrity checks.

use std::collections::BTreeMap;

use chrono::Utc;
use uuid::Uuid;

use crate::ledger::LedgerError;
use crate::micros::Micros;
use crate::types::{Balance, BalanceKind, Transaction, TxnType};

/// One page of an owner's history, oldest first.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    pub current_page: u32,
    pub total_pages: u32,
    pub items_per_page: u32,
    pub total_items: u64,
}

/// Append-only transaction log with derived balances.
#[derive(Clone, Debug, Default)]
pub struct AuthorityBook {
    balances: BTreeMap<String, Balance>,
    log: Vec<Transaction>,
}

impl AuthorityBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Post a signed adjustment, appending an authoritative transaction.
    ///
    /// # Errors
    /// `InvalidAmount` for a zero amount; the book is not mutated on error.
    pub fn post(
        &mut self,
        owner_id: &str,
        kind: BalanceKind,
        amount: Micros,
        method: &str,
        order_ref: Option<String>,
    ) -> Result<Transaction, LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::InvalidAmount);
        }

        let entry = self.balances.entry(owner_id.to_string()).or_default();
        let new_balance = entry.get(kind).saturating_add(amount);
        entry.set(kind, new_balance);

        let txn = Transaction {
            id: Uuid::new_v4().to_string(),
            transaction_id: format!("TXN-{}", Uuid::new_v4()),
            owner_id: owner_id.to_string(),
            txn_type: TxnType::from_signed(amount),
            method: method.to_string(),
            amount: amount.abs(),
            balance_type: kind,
            balance_after: new_balance,
            created_at: Utc::now(),
            order_ref,
        };
        self.log.push(txn.clone());
        Ok(txn)
    }

    /// Current balance snapshot; zero balances for unknown owners.
    pub fn balance(&self, owner_id: &str) -> Balance {
        self.balances.get(owner_id).copied().unwrap_or_default()
    }

    /// All of an owner's transactions in serialization order (oldest first).
    pub fn transactions(&self, owner_id: &str) -> Vec<Transaction> {
        self.log
            .iter()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect()
    }

    /// A 1-based page of the owner's history. An out-of-range page is empty
    /// but still reports the real totals.
    pub fn page(&self, owner_id: &str, page: u32, per_page: u32) -> TransactionPage {
        let all = self.transactions(owner_id);
        let total_items = all.len() as u64;
        let per_page = per_page.max(1);
        let total_pages = (total_items.div_ceil(per_page as u64) as u32).max(1);
        let page = page.max(1);

        let start = (page as usize - 1) * per_page as usize;
        let transactions = all
            .into_iter()
            .skip(start)
            .take(per_page as usize)
            .collect();

        TransactionPage {
            transactions,
            current_page: page,
            total_pages,
            items_per_page: per_page,
            total_items,
        }
    }

    /// Total number of posted transactions across all owners.
    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Recompute every balance from the log and compare with the running
    /// state. O(n) replay — for tests, startup verification, or audits.
    pub fn verify_integrity(&self) -> bool {
        let mut replayed: BTreeMap<String, Balance> = BTreeMap::new();
        for txn in &self.log {
            let entry = replayed.entry(txn.owner_id.clone()).or_default();
            let next = entry.get(txn.balance_type).saturating_add(txn.signed_amount());
            if next != txn.balance_after {
                return false;
            }
            entry.set(txn.balance_type, next);
        }
        replayed == self.balances
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
