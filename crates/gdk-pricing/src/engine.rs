//! The displayed-price computation.
//!
//! # Step order
//! The formula is a fixed pipeline; every stage feeds the next and the order
//! is part of the contract (reordering changes rounding behavior):
//!
//! 1. bidding price = bid + bid spread + ask spread + 0.5
//! 2. premium/discount adjustment on the bidding price
//! 3. per-gram conversion (÷ 31.103)
//! 4. weight × purity factor scaling
//! 5. currency conversion (× 3.674)
//! 6. flat making charge
//! 7. round to whole currency units for display
//!
//! Incomplete inputs (no usable bid, zero weight, zero purity) resolve to a
//! price of 0 — a designed "not yet computable" sentinel, never an error.

use crate::purity::purity_factor;
use crate::types::{PriceOverride, ProductSpec, Quote, SpreadConfig};
use crate::{ASK_MARKUP, TROY_OUNCE_GRAMS, USD_TO_AED};

// ---------------------------------------------------------------------------
// Breakdown
// ---------------------------------------------------------------------------

/// Every intermediate of the price pipeline, exposed for testing and for the
/// admin detail views. `display_price` is the only value shown to customers.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceBreakdown {
    /// Bid + both spreads + the fixed asking markup.
    pub bidding_price: f64,
    /// Bidding price after the premium/discount adjustment (if any).
    pub adjusted_bid: f64,
    /// Adjusted bid per gram (USD).
    pub price_per_gram: f64,
    /// Decoded fineness factor.
    pub purity_factor: f64,
    /// Per-gram price × weight × purity × currency conversion.
    pub base_price: f64,
    /// Base price + flat making charge; unrounded.
    pub final_price: f64,
    /// `final_price` rounded to whole currency units, floored at zero.
    pub display_price: i64,
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Compute the full price breakdown, or `None` when inputs are incomplete.
///
/// A `None` quote, an unusable bid, weight <= 0, or purity 0 all make the
/// price non-computable. A missing override leaves the bid unadjusted and
/// the making charge at zero.
pub fn price_breakdown(
    quote: Option<&Quote>,
    config: &SpreadConfig,
    ovr: Option<&PriceOverride>,
    product: &ProductSpec,
) -> Option<PriceBreakdown> {
    let quote = quote?;
    if !quote.has_bid() || product.purity == 0 || product.weight_grams <= 0.0 {
        return None;
    }

    let bidding_price = quote.bid + config.bid_spread + config.ask_spread + ASK_MARKUP;

    let adjusted_bid = match ovr {
        Some(o) => o.adjustment.apply(bidding_price, o.adjustment_value),
        None => bidding_price,
    };

    let price_per_gram = adjusted_bid / TROY_OUNCE_GRAMS;
    let factor = purity_factor(product.purity);
    let base_price = price_per_gram * product.weight_grams * factor * USD_TO_AED;
    let final_price = base_price + ovr.map(|o| o.making_charge).unwrap_or(0.0);

    Some(PriceBreakdown {
        bidding_price,
        adjusted_bid,
        price_per_gram,
        purity_factor: factor,
        base_price,
        final_price,
        display_price: (final_price.round() as i64).max(0),
    })
}

/// The displayed unit price in whole currency units; 0 when not computable.
pub fn compute_price(
    quote: Option<&Quote>,
    config: &SpreadConfig,
    ovr: Option<&PriceOverride>,
    product: &ProductSpec,
) -> i64 {
    price_breakdown(quote, config, ovr, product)
        .map(|b| b.display_price)
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Spot board
// ---------------------------------------------------------------------------

/// Display values for the admin spot-rate panel, recomputed on every tick.
#[derive(Clone, Debug, PartialEq)]
pub struct SpotBoard {
    /// bid + bid spread.
    pub bidding_price: f64,
    /// bidding price + ask spread + the fixed asking markup.
    pub asking_price: f64,
    /// session low + low margin.
    pub adjusted_low: f64,
    /// session high + high margin.
    pub adjusted_high: f64,
}

/// Derive the spot-board values from a quote and the owner's spreads.
pub fn spot_board(quote: &Quote, config: &SpreadConfig) -> SpotBoard {
    let bidding_price = quote.bid + config.bid_spread;
    SpotBoard {
        bidding_price,
        asking_price: bidding_price + config.ask_spread + ASK_MARKUP,
        adjusted_low: quote.low + config.low_margin,
        adjusted_high: quote.high + config.high_margin,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AdjustmentKind;

    fn quote(bid: f64) -> Quote {
        Quote {
            instrument: "GOLD".to_string(),
            bid,
            ask: bid + 1.0,
            low: bid - 20.0,
            high: bid + 20.0,
            timestamp: 1_700_000_000,
        }
    }

    fn config(bid_spread: f64, ask_spread: f64) -> SpreadConfig {
        SpreadConfig {
            owner_id: "admin-1".to_string(),
            bid_spread,
            ask_spread,
            low_margin: 0.0,
            high_margin: 0.0,
        }
    }

    fn product(weight: f64, purity: u32) -> ProductSpec {
        ProductSpec {
            id: "p1".to_string(),
            weight_grams: weight,
            purity,
            category_id: None,
        }
    }

    fn discount(value: f64) -> PriceOverride {
        PriceOverride {
            scope: crate::OverrideScope::User,
            scope_id: "u1".to_string(),
            product_id: "p1".to_string(),
            making_charge: 0.0,
            adjustment: AdjustmentKind::Discount,
            adjustment_value: value,
        }
    }

    // --- Incomplete-input sentinel ---

    #[test]
    fn missing_quote_prices_to_zero() {
        let p = product(10.0, 9999);
        assert_eq!(compute_price(None, &config(1.0, 1.0), None, &p), 0);
    }

    #[test]
    fn zero_bid_prices_to_zero() {
        let q = quote(0.0);
        let p = product(10.0, 9999);
        assert_eq!(compute_price(Some(&q), &config(1.0, 1.0), None, &p), 0);
    }

    #[test]
    fn zero_weight_prices_to_zero() {
        let q = quote(2000.0);
        let p = product(0.0, 9999);
        assert_eq!(compute_price(Some(&q), &config(1.0, 1.0), None, &p), 0);
    }

    #[test]
    fn zero_purity_prices_to_zero() {
        let q = quote(2000.0);
        let p = product(10.0, 0);
        assert_eq!(compute_price(Some(&q), &config(1.0, 1.0), None, &p), 0);
    }

    // --- Fixed-point scenarios ---

    #[test]
    fn ten_gram_9999_bar_at_2000_bid() {
        // bid=2000, spreads 1+1, no override, weight 10, purity 9999:
        // bidding = 2002.5; per-gram = 2002.5/31.103 ≈ 64.3829;
        // final ≈ 64.3829 × 10 × 0.9999 × 3.674 ≈ 2365.19 → 2365.
        let q = quote(2000.0);
        let p = product(10.0, 9999);
        let b = price_breakdown(Some(&q), &config(1.0, 1.0), None, &p).unwrap();

        assert_eq!(b.bidding_price, 2002.5);
        assert_eq!(b.adjusted_bid, 2002.5);
        assert!((b.price_per_gram - 2002.5 / 31.103).abs() < 1e-12);
        assert_eq!(b.purity_factor, 0.9999);
        assert!((b.final_price - 2365.19).abs() < 0.01);
        assert_eq!(b.display_price, 2365);
    }

    #[test]
    fn discount_lowers_the_price() {
        let q = quote(2000.0);
        let p = product(10.0, 9999);
        let cfg = config(1.0, 1.0);

        let plain = price_breakdown(Some(&q), &cfg, None, &p).unwrap();
        let cut = price_breakdown(Some(&q), &cfg, Some(&discount(5.0)), &p).unwrap();

        assert_eq!(cut.adjusted_bid, 1997.5);
        assert!(cut.final_price < plain.final_price);
        assert!(cut.display_price < plain.display_price);
    }

    #[test]
    fn premium_raises_the_price() {
        let q = quote(2000.0);
        let p = product(10.0, 9999);
        let cfg = config(1.0, 1.0);
        let ovr = PriceOverride {
            adjustment: AdjustmentKind::Premium,
            adjustment_value: 5.0,
            ..discount(0.0)
        };

        let plain = price_breakdown(Some(&q), &cfg, None, &p).unwrap();
        let up = price_breakdown(Some(&q), &cfg, Some(&ovr), &p).unwrap();

        assert_eq!(up.adjusted_bid, 2007.5);
        assert!(up.final_price > plain.final_price);
    }

    #[test]
    fn making_charge_is_flat_after_conversion() {
        let q = quote(2000.0);
        let p = product(10.0, 9999);
        let cfg = config(1.0, 1.0);
        let ovr = PriceOverride {
            making_charge: 25.0,
            adjustment: AdjustmentKind::Premium,
            adjustment_value: 0.0,
            ..discount(0.0)
        };

        let plain = price_breakdown(Some(&q), &cfg, None, &p).unwrap();
        let charged = price_breakdown(Some(&q), &cfg, Some(&ovr), &p).unwrap();

        assert!((charged.final_price - plain.final_price - 25.0).abs() < 1e-9);
    }

    #[test]
    fn identical_inputs_identical_output() {
        let q = quote(2314.77);
        let p = product(8.5, 916);
        let cfg = config(0.75, 1.25);
        let ovr = discount(2.5);

        let a = price_breakdown(Some(&q), &cfg, Some(&ovr), &p).unwrap();
        let b = price_breakdown(Some(&q), &cfg, Some(&ovr), &p).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn runaway_discount_clamps_display_to_zero() {
        let q = quote(10.0);
        let p = product(1.0, 999);
        let b = price_breakdown(Some(&q), &config(0.0, 0.0), Some(&discount(1_000.0)), &p)
            .unwrap();
        assert!(b.final_price < 0.0);
        assert_eq!(b.display_price, 0);
    }

    // --- Spot board ---

    #[test]
    fn spot_board_derivations() {
        let q = quote(2000.0);
        let cfg = SpreadConfig {
            owner_id: "admin-1".to_string(),
            bid_spread: 2.0,
            ask_spread: 3.0,
            low_margin: -1.0,
            high_margin: 1.5,
        };
        let board = spot_board(&q, &cfg);
        assert_eq!(board.bidding_price, 2002.0);
        assert_eq!(board.asking_price, 2005.5);
        assert_eq!(board.adjusted_low, 1979.0);
        assert_eq!(board.adjusted_high, 2021.5);
    }
}
