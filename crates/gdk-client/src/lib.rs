//! gdk-client
//!
//! The consumer side of the remote collaborators:
//! - [`LedgerAuthority`] / [`QuoteSource`] traits with reqwest-backed HTTP
//!   implementations
//! - sequence-keyed stale-quote discarding ([`QuoteGuard`])
//! - transient-failure retry with exponential backoff ([`RetryPolicy`])
//! - the optimistic apply → authority call → commit/rollback round trip
//!   ([`submit_adjustment`] / [`submit_gold_receipt`])
//!
//! All wire decimals are normalized to `Micros` at this boundary; nothing
//! beyond this crate sees a decimal string.

mod authority;
mod convert;
mod flow;
mod quotes;
mod retry;

pub use authority::{AdjustmentAck, AuthorityError, HttpLedgerAuthority, LedgerAuthority};
pub use convert::{
    override_from_dto, override_to_dto, product_from_dto, quote_from_dto, spread_config_from_dto,
    transaction_from_dto,
};
pub use flow::{submit_adjustment, submit_gold_receipt, SettledAdjustment, SubmitError};
pub use quotes::{HttpQuoteSource, QuoteGuard, QuoteSource, StaleQuote};
pub use retry::RetryPolicy;
