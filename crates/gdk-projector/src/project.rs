//! The projection itself.
//!
//! `project` is a total function over its inputs: re-running it with the same
//! transaction slice and pending record always yields the same result, and
//! duplicate transaction ids are counted once. "Un-folding" a rolled-back
//! pending transaction is simply projecting again without it — there is no
//! incremental state to repair.

use std::collections::BTreeSet;

use gdk_ledger::{BalanceKind, Transaction};

use crate::types::{BalanceInfo, Projection, Summary};

/// Project a transaction stream into per-balance-type summaries.
///
/// `transactions` is expected in server serialization order (oldest first);
/// `balance_info` reflects the newest authoritative record per balance type.
/// A `pending` transaction is folded into the flow summary for optimistic
/// display, unless an authoritative record with the same id is already
/// present (the authoritative record wins).
pub fn project(transactions: &[Transaction], pending: Option<&Transaction>) -> Projection {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut summary = Summary::default();
    let mut balance_info = BalanceInfo::default();

    for txn in transactions {
        if !seen.insert(txn.id.as_str()) {
            continue; // duplicate fetch; already counted
        }
        flow_for(&mut summary, txn.balance_type).fold(txn);
        if !txn.is_pending() {
            match txn.balance_type {
                BalanceKind::Cash => balance_info.cash_balance = txn.balance_after,
                BalanceKind::Gold => balance_info.total_gold_balance = txn.balance_after,
            }
        }
    }

    if let Some(p) = pending {
        if !seen.contains(p.id.as_str()) {
            flow_for(&mut summary, p.balance_type).fold(p);
        }
    }

    Projection {
        summary,
        balance_info,
    }
}

fn flow_for(summary: &mut Summary, kind: BalanceKind) -> &mut crate::types::FlowSummary {
    match kind {
        BalanceKind::Cash => &mut summary.cash,
        BalanceKind::Gold => &mut summary.gold,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
