//! Scenario: reference points of the displayed-price formula.
//!
//! # Invariants under test
//!
//! 1. Determinism: identical inputs always produce identical outputs.
//! 2. The fineness decoding follows the digit-count rule for every code
//!    except 1, which means 100%.
//! 3. The 10 g / 9999 reference bar prices to 2365 whole units at bid 2000
//!    with 1+1 spreads (2002.5/31.103 × 10 × 0.9999 × 3.674 ≈ 2365.19).
//! 4. A discount strictly lowers the output relative to the same inputs
//!    without one.
//! 5. Missing inputs resolve to the 0 sentinel, never an error.
//!
//! All tests are pure; no IO, no time.

use gdk_pricing::{
    compute_price, price_breakdown, purity_factor, spot_board, AdjustmentKind, OverrideScope,
    PriceOverride, ProductSpec, Quote, SpreadConfig,
};

fn gold_quote(bid: f64) -> Quote {
    Quote {
        instrument: "GOLD".to_string(),
        bid,
        ask: bid + 1.0,
        low: bid - 25.0,
        high: bid + 25.0,
        timestamp: 1_750_000_000,
    }
}

fn spreads(bid_spread: f64, ask_spread: f64) -> SpreadConfig {
    SpreadConfig {
        owner_id: "admin-1".to_string(),
        bid_spread,
        ask_spread,
        low_margin: 0.0,
        high_margin: 0.0,
    }
}

fn bar(weight: f64, purity: u32) -> ProductSpec {
    ProductSpec {
        id: "bar-1".to_string(),
        weight_grams: weight,
        purity,
        category_id: None,
    }
}

// ---------------------------------------------------------------------------
// 1. Determinism
// ---------------------------------------------------------------------------

#[test]
fn repeated_evaluation_is_bit_identical() {
    let q = gold_quote(2314.77);
    let cfg = spreads(0.75, 1.25);
    let p = bar(8.5, 916);
    let ovr = PriceOverride {
        scope: OverrideScope::Category,
        scope_id: "bars".to_string(),
        product_id: "bar-1".to_string(),
        making_charge: 12.5,
        adjustment: AdjustmentKind::Premium,
        adjustment_value: 2.0,
    };

    let first = price_breakdown(Some(&q), &cfg, Some(&ovr), &p).unwrap();
    for _ in 0..100 {
        let again = price_breakdown(Some(&q), &cfg, Some(&ovr), &p).unwrap();
        assert_eq!(first, again);
    }
}

// ---------------------------------------------------------------------------
// 2. Fineness decoding
// ---------------------------------------------------------------------------

#[test]
fn digit_count_rule_for_known_codes() {
    for (code, expected) in [
        (9999u32, 0.9999f64),
        (999, 0.999),
        (995, 0.995),
        (916, 0.916),
        (920, 0.920),
        (875, 0.875),
        (750, 0.750),
        (99999, 0.99999),
    ] {
        assert_eq!(purity_factor(code), expected, "code {code}");
    }
}

#[test]
fn code_one_is_the_full_purity_special_case() {
    assert_eq!(purity_factor(1), 1.0);
    // and NOT the general rule's 0.1
    assert_ne!(purity_factor(1), 0.1);
}

// ---------------------------------------------------------------------------
// 3. Reference bar
// ---------------------------------------------------------------------------

#[test]
fn reference_bar_prices_to_2365() {
    let b = price_breakdown(
        Some(&gold_quote(2000.0)),
        &spreads(1.0, 1.0),
        None,
        &bar(10.0, 9999),
    )
    .unwrap();

    assert_eq!(b.bidding_price, 2002.5);
    assert!((b.price_per_gram - 2002.5 / 31.103).abs() < 1e-12);
    assert!((b.final_price - 2365.19).abs() < 0.01);
    assert_eq!(b.display_price, 2365);
}

// ---------------------------------------------------------------------------
// 4. Discount ordering
// ---------------------------------------------------------------------------

#[test]
fn discount_output_is_strictly_lower() {
    let q = gold_quote(2000.0);
    let cfg = spreads(1.0, 1.0);
    let p = bar(10.0, 9999);
    let ovr = PriceOverride {
        scope: OverrideScope::User,
        scope_id: "u1".to_string(),
        product_id: "bar-1".to_string(),
        making_charge: 0.0,
        adjustment: AdjustmentKind::Discount,
        adjustment_value: 5.0,
    };

    let plain = price_breakdown(Some(&q), &cfg, None, &p).unwrap();
    let cut = price_breakdown(Some(&q), &cfg, Some(&ovr), &p).unwrap();

    assert_eq!(cut.adjusted_bid, 1997.5);
    assert!(cut.final_price < plain.final_price);
}

// ---------------------------------------------------------------------------
// 5. Incomplete inputs
// ---------------------------------------------------------------------------

#[test]
fn incomplete_inputs_price_to_zero_sentinel() {
    let cfg = spreads(1.0, 1.0);
    assert_eq!(compute_price(None, &cfg, None, &bar(10.0, 9999)), 0);
    assert_eq!(
        compute_price(Some(&gold_quote(0.0)), &cfg, None, &bar(10.0, 9999)),
        0
    );
    assert_eq!(
        compute_price(Some(&gold_quote(2000.0)), &cfg, None, &bar(0.0, 9999)),
        0
    );
    assert_eq!(
        compute_price(Some(&gold_quote(2000.0)), &cfg, None, &bar(10.0, 0)),
        0
    );
}

// ---------------------------------------------------------------------------
// 6. Spot board stays in sync with the same config
// ---------------------------------------------------------------------------

#[test]
fn spot_board_tracks_quote_ticks() {
    let cfg = SpreadConfig {
        owner_id: "admin-1".to_string(),
        bid_spread: 2.0,
        ask_spread: 3.0,
        low_margin: -1.0,
        high_margin: 1.0,
    };

    let b1 = spot_board(&gold_quote(2000.0), &cfg);
    let b2 = spot_board(&gold_quote(2010.0), &cfg);

    assert_eq!(b1.bidding_price, 2002.0);
    assert_eq!(b1.asking_price, 2005.5);
    assert_eq!(b2.bidding_price, 2012.0);
    assert_eq!(b2.asking_price, 2015.5);
    assert_eq!(b2.adjusted_low, 2010.0 - 25.0 - 1.0);
    assert_eq!(b2.adjusted_high, 2010.0 + 25.0 + 1.0);
}
