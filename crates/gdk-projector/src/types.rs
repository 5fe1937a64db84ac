use gdk_ledger::{Micros, Transaction, TxnType};

/// Credit/debit totals for one balance type.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FlowSummary {
    pub total_credits: Micros,
    pub total_debits: Micros,
}

impl FlowSummary {
    /// `totalCredits − totalDebits`.
    pub fn net_flow(&self) -> Micros {
        self.total_credits.saturating_sub(self.total_debits)
    }

    pub(crate) fn fold(&mut self, txn: &Transaction) {
        match txn.txn_type {
            TxnType::Credit => {
                self.total_credits = self.total_credits.saturating_add(txn.amount)
            }
            TxnType::Debit => self.total_debits = self.total_debits.saturating_add(txn.amount),
        }
    }
}

/// Per-balance-type flow summaries.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub cash: FlowSummary,
    pub gold: FlowSummary,
}

/// Latest authoritative balances observed in the projected stream.
///
/// Taken from the newest authoritative record per balance type; a pending
/// transaction never contributes here.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BalanceInfo {
    pub cash_balance: Micros,
    pub total_gold_balance: Micros,
}

/// The full projection result.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Projection {
    pub summary: Summary,
    pub balance_info: BalanceInfo,
}
