//! gdk-ledger
//!
//! Dual-currency account ledger (cash + gold weight):
//! - `Micros` fixed-point amounts with deterministic decimal-string parsing
//! - `BalanceLedger`: the client-side optimistic state machine
//!   (apply / commit / rollback, one in-flight slot per owner+balance kind)
//! - `AuthorityBook`: the server-side append-only transaction log with
//!   derived balances and a replay integrity check
//!
//! The ledger is the sole mutator of balance state; everything else reads
//! snapshots. No IO anywhere in this crate.

mod book;
mod ledger;
mod micros;
mod types;

pub use book::{AuthorityBook, TransactionPage};
pub use ledger::{AppliedAdjustment, BalanceLedger, LedgerError};
pub use micros::{Micros, ParseAmountError};
pub use types::{format_cr_dr, Balance, BalanceKind, ParseKindError, Transaction, TxnType};

/// Amount scale: micros (1e-6). Cash micros are micro-currency-units; gold
/// micros are micrograms.
pub const MICROS_SCALE: i64 = 1_000_000;
