//! gdk-pricing
//!
//! The displayed-price engine for gold products:
//! - Purity-factor decoding (digit-count fineness codes)
//! - Spread + override arithmetic in a fixed step order
//! - Spot-board derivations (bidding/asking price, low/high margins)
//! - In-memory spread and override stores with scope precedence
//!
//! Pure deterministic logic — no IO, no time, no randomness. Two calls with
//! identical inputs always produce identical outputs.

mod engine;
mod purity;
mod stores;
mod types;

pub use engine::{compute_price, price_breakdown, spot_board, PriceBreakdown, SpotBoard};
pub use purity::purity_factor;
pub use stores::{OverrideStore, SpreadStore};
pub use types::{
    AdjustmentKind, OverrideScope, ParseScopeError, PriceOverride, ProductSpec, Quote,
    SpreadConfig,
};

/// Grams per troy ounce, as used by the quote-to-gram conversion.
pub const TROY_OUNCE_GRAMS: f64 = 31.103;

/// Fixed USD→AED conversion factor applied after weight/purity scaling.
pub const USD_TO_AED: f64 = 3.674;

/// Flat markup baked into the asking-price derivation.
pub const ASK_MARKUP: f64 = 0.5;
