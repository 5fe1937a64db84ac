//! Fixed-point amount type.
//!
//! All ledger amounts are 1e-6 fixed-point `i64` values behind the `Micros`
//! newtype. There is intentionally no `From<i64>` impl: a raw integer becomes
//! an amount only through [`Micros::new`], [`Micros::from_units`], or one of
//! the deterministic parsers, so quantities, ids, and amounts cannot be mixed
//! silently.
//!
//! Wire values arrive as decimal strings and are converted digit-by-digit —
//! never through `f64` — so the same string always produces the same micros.

use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use crate::MICROS_SCALE;

// ---------------------------------------------------------------------------
// Micros newtype
// ---------------------------------------------------------------------------

/// A fixed-point amount at 1e-6 scale.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Micros(i64);

impl Micros {
    pub const ZERO: Micros = Micros(0);
    pub const MAX: Micros = Micros(i64::MAX);
    pub const MIN: Micros = Micros(i64::MIN);

    /// Construct from a raw micros value.
    #[inline]
    pub const fn new(raw: i64) -> Self {
        Micros(raw)
    }

    /// Construct from whole units (currency units or grams).
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Micros(units * MICROS_SCALE)
    }

    /// Extract the raw micros value.
    #[inline]
    pub const fn raw(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub fn signum(self) -> i64 {
        self.0.signum()
    }

    /// Absolute value; `Micros::MIN.abs()` saturates to `Micros::MAX`.
    #[inline]
    pub fn abs(self) -> Micros {
        Micros(self.0.saturating_abs())
    }

    /// Saturating addition — clamps at the `i64` extremes.
    #[inline]
    pub fn saturating_add(self, rhs: Micros) -> Micros {
        Micros(self.0.saturating_add(rhs.0))
    }

    /// Saturating subtraction — clamps at the `i64` extremes.
    #[inline]
    pub fn saturating_sub(self, rhs: Micros) -> Micros {
        Micros(self.0.saturating_sub(rhs.0))
    }

    /// Convert a gram value to micros (micrograms), rounding to whole
    /// milligrams first — the ledger's resolution for gold weights.
    ///
    /// Returns `None` for non-finite input or values outside the `i64`
    /// milligram range.
    pub fn from_grams_rounded(grams: f64) -> Option<Micros> {
        if !grams.is_finite() {
            return None;
        }
        let millis = (grams * 1_000.0).round();
        if millis.abs() >= 9.0e15 {
            return None;
        }
        Some(Micros(millis as i64 * 1_000))
    }

    /// Parse a decimal string into micros, deterministically.
    ///
    /// Accepts an optional leading sign and at most 6 fractional digits;
    /// longer fractions are rejected rather than rounded.
    pub fn parse_decimal(s: &str) -> Result<Micros, ParseAmountError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseAmountError::Empty);
        }

        let (negative, digits) = if let Some(rest) = s.strip_prefix('-') {
            (true, rest)
        } else if let Some(rest) = s.strip_prefix('+') {
            (false, rest)
        } else {
            (false, s)
        };

        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, f),
            None => (digits, ""),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(ParseAmountError::Invalid(s.to_string()));
        }
        let is_digits = |p: &str| p.chars().all(|c| c.is_ascii_digit());
        if !is_digits(int_part) || !is_digits(frac_part) {
            return Err(ParseAmountError::Invalid(s.to_string()));
        }
        if frac_part.len() > 6 {
            return Err(ParseAmountError::TooManyDecimalPlaces(s.to_string()));
        }

        let int_val: i64 = if int_part.is_empty() {
            0
        } else {
            int_part
                .parse::<i64>()
                .map_err(|_| ParseAmountError::Invalid(s.to_string()))?
        };

        let mut frac_padded = frac_part.to_string();
        while frac_padded.len() < 6 {
            frac_padded.push('0');
        }
        let frac_val: i64 = frac_padded
            .parse::<i64>()
            .map_err(|_| ParseAmountError::Invalid(s.to_string()))?;

        let micros = int_val
            .checked_mul(MICROS_SCALE)
            .and_then(|v| v.checked_add(frac_val))
            .ok_or_else(|| ParseAmountError::Invalid(s.to_string()))?;

        Ok(Micros(if negative { -micros } else { micros }))
    }

    /// Render as a decimal string with trailing fractional zeros trimmed
    /// (`1.5`, `-0.25`, `0`). This is the wire representation.
    pub fn to_decimal_string(self) -> String {
        let units = self.0 / MICROS_SCALE;
        let frac = (self.0 % MICROS_SCALE).abs();
        let sign = if self.0 < 0 && units == 0 { "-" } else { "" };
        if frac == 0 {
            return format!("{sign}{units}");
        }
        let frac_str = format!("{frac:06}");
        let trimmed = frac_str.trim_end_matches('0');
        format!("{sign}{units}.{trimmed}")
    }

    /// Render with exactly three decimal places (the gold-weight display
    /// resolution): `5.000`, `-0.250`.
    ///
    /// Sub-milligram residue is truncated toward zero; ledger gold amounts
    /// are already whole milligrams.
    pub fn to_fixed3_string(self) -> String {
        let units = self.0 / MICROS_SCALE;
        let millis = ((self.0 % MICROS_SCALE) / 1_000).abs();
        let sign = if self.0 < 0 && units == 0 { "-" } else { "" };
        format!("{sign}{units}.{millis:03}")
    }
}

// ---------------------------------------------------------------------------
// Arithmetic operators (closed over Micros)
// ---------------------------------------------------------------------------

impl Add for Micros {
    type Output = Micros;
    #[inline]
    fn add(self, rhs: Micros) -> Micros {
        Micros(self.0 + rhs.0)
    }
}

impl Sub for Micros {
    type Output = Micros;
    #[inline]
    fn sub(self, rhs: Micros) -> Micros {
        Micros(self.0 - rhs.0)
    }
}

impl Neg for Micros {
    type Output = Micros;
    #[inline]
    fn neg(self) -> Micros {
        Micros(-self.0)
    }
}

impl AddAssign for Micros {
    #[inline]
    fn add_assign(&mut self, rhs: Micros) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Micros {
    #[inline]
    fn sub_assign(&mut self, rhs: Micros) {
        self.0 -= rhs.0;
    }
}

impl fmt::Display for Micros {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal_string())
    }
}

// ---------------------------------------------------------------------------
// Parse error
// ---------------------------------------------------------------------------

/// Errors from [`Micros::parse_decimal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    Empty,
    Invalid(String),
    /// More than 6 decimal places — conversion would require rounding.
    TooManyDecimalPlaces(String),
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::Empty => write!(f, "amount string is empty"),
            ParseAmountError::Invalid(raw) => {
                write!(f, "amount could not be parsed: '{raw}'")
            }
            ParseAmountError::TooManyDecimalPlaces(raw) => {
                write!(
                    f,
                    "amount has more than 6 decimal places (would require rounding): '{raw}'"
                )
            }
        }
    }
}

impl std::error::Error for ParseAmountError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
