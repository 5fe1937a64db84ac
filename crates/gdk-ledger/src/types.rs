use std::fmt;

use chrono::{DateTime, Utc};

use crate::micros::Micros;

/// Which of the two balances a transaction touches.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BalanceKind {
    Cash,
    Gold,
}

impl BalanceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BalanceKind::Cash => "CASH",
            BalanceKind::Gold => "GOLD",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ParseKindError> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CASH" => Ok(BalanceKind::Cash),
            "GOLD" => Ok(BalanceKind::Gold),
            other => Err(ParseKindError {
                raw: other.to_string(),
            }),
        }
    }
}

/// The supplied balance-type string matched neither `CASH` nor `GOLD`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKindError {
    pub raw: String,
}

impl fmt::Display for ParseKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid balance type '{}': expected CASH | GOLD", self.raw)
    }
}

impl std::error::Error for ParseKindError {}

/// CREDIT or DEBIT.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TxnType {
    Credit,
    Debit,
}

impl TxnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxnType::Credit => "CREDIT",
            TxnType::Debit => "DEBIT",
        }
    }

    /// Positive adjustments are credits, negative ones debits.
    pub fn from_signed(amount: Micros) -> Self {
        if amount.is_negative() {
            TxnType::Debit
        } else {
            TxnType::Credit
        }
    }
}

/// One ledger transaction.
///
/// Authoritative records come from the server with a permanent id; the
/// client synthesizes a pending record with a `temp-` id while an adjustment
/// is in flight. `amount` is always the absolute value; `txn_type` carries
/// the direction.
#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub transaction_id: String,
    pub owner_id: String,
    pub txn_type: TxnType,
    pub method: String,
    pub amount: Micros,
    pub balance_type: BalanceKind,
    pub balance_after: Micros,
    pub created_at: DateTime<Utc>,
    pub order_ref: Option<String>,
}

impl Transaction {
    /// Client-synthesized records carry a `temp-` id until replaced by the
    /// server's authoritative transaction.
    pub fn is_pending(&self) -> bool {
        self.id.starts_with("temp-")
    }

    /// Signed flow contribution: positive for credits, negative for debits.
    pub fn signed_amount(&self) -> Micros {
        match self.txn_type {
            TxnType::Credit => self.amount,
            TxnType::Debit => -self.amount,
        }
    }
}

/// The two balances held for one owner. Both signed; negative values are
/// valid (debt for cash, deficit for gold).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Balance {
    pub cash: Micros,
    pub gold_grams: Micros,
}

impl Balance {
    pub fn get(&self, kind: BalanceKind) -> Micros {
        match kind {
            BalanceKind::Cash => self.cash,
            BalanceKind::Gold => self.gold_grams,
        }
    }

    pub fn set(&mut self, kind: BalanceKind, value: Micros) {
        match kind {
            BalanceKind::Cash => self.cash = value,
            BalanceKind::Gold => self.gold_grams = value,
        }
    }
}

/// Render a balance in the ledger's CR/DR convention: absolute value with a
/// `CR` suffix for non-negative, `DR` for negative; gold with three decimals
/// and a `gm` unit.
pub fn format_cr_dr(amount: Micros, kind: BalanceKind) -> String {
    let suffix = if amount.is_negative() { "DR" } else { "CR" };
    match kind {
        BalanceKind::Cash => format!("{} {}", amount.abs().to_decimal_string(), suffix),
        BalanceKind::Gold => format!("{} gm {}", amount.abs().to_fixed3_string(), suffix),
    }
}
