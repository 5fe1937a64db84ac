//! Fineness-code decoding.
//!
//! Purity is carried as a positive integer whose decimal digit count implies
//! its scale: 9999 → 0.9999, 999 → 0.999, 750 → 0.750. The code `1` is a
//! special case meaning 100% purity (factor 1.0), NOT 0.1 — it predates the
//! digit-count encoding and must be handled before the general rule.

/// Decode a fineness code into a fractional purity factor.
///
/// Returns 1.0 for code 0 (unknown) so a missing purity degrades to "no
/// scaling" in contexts where the caller has already decided to proceed;
/// price computation separately rejects purity 0 as incomplete input.
pub fn purity_factor(purity: u32) -> f64 {
    if purity == 0 {
        return 1.0;
    }
    if purity == 1 {
        // 1 means 100% purity.
        return 1.0;
    }
    purity as f64 / 10f64.powi(digit_count(purity))
}

fn digit_count(mut v: u32) -> i32 {
    let mut digits = 0;
    while v > 0 {
        v /= 10;
        digits += 1;
    }
    digits
}
