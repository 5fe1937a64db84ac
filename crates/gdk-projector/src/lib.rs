//! gdk-projector
//!
//! Derives running summary aggregates (total credits/debits/net flow per
//! balance type) from a transaction stream, with optional optimistic folding
//! of one pending transaction.
//!
//! Pure deterministic logic — no IO, no time. Aggregates are display state;
//! ledger correctness never depends on them.

mod project;
mod types;

pub use project::project;
pub use types::{BalanceInfo, FlowSummary, Projection, Summary};
