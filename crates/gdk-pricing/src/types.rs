use std::fmt;

/// Latest market snapshot for one instrument.
///
/// Immutable once constructed; the engine always receives the freshest
/// snapshot the caller holds at call time.
#[derive(Clone, Debug, PartialEq)]
pub struct Quote {
    pub instrument: String,
    pub bid: f64,
    pub ask: f64,
    pub low: f64,
    pub high: f64,
    /// Snapshot timestamp as UTC epoch seconds.
    pub timestamp: i64,
}

impl Quote {
    /// A bid is usable when it is a finite non-zero number.  Zero means the
    /// feed has not delivered a real value yet.
    pub fn has_bid(&self) -> bool {
        self.bid.is_finite() && self.bid != 0.0
    }
}

/// Per-owner spread configuration. Versionless; last write wins.
#[derive(Clone, Debug, PartialEq)]
pub struct SpreadConfig {
    pub owner_id: String,
    pub bid_spread: f64,
    pub ask_spread: f64,
    pub low_margin: f64,
    pub high_margin: f64,
}

impl SpreadConfig {
    /// All-zero config used for owners with no saved record.
    pub fn neutral(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            bid_spread: 0.0,
            ask_spread: 0.0,
            low_margin: 0.0,
            high_margin: 0.0,
        }
    }
}

/// Whether an override is scoped to a single user or a product category.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum OverrideScope {
    User,
    Category,
}

impl OverrideScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverrideScope::User => "user",
            OverrideScope::Category => "category",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ParseScopeError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(OverrideScope::User),
            "category" => Ok(OverrideScope::Category),
            other => Err(ParseScopeError {
                raw: other.to_string(),
            }),
        }
    }
}

/// The supplied scope string matched neither `user` nor `category`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseScopeError {
    pub raw: String,
}

impl fmt::Display for ParseScopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid override scope '{}': expected user | category", self.raw)
    }
}

impl std::error::Error for ParseScopeError {}

/// Signed adjustment applied to the spread-adjusted bid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AdjustmentKind {
    Premium,
    Discount,
}

impl AdjustmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentKind::Premium => "Premium",
            AdjustmentKind::Discount => "Discount",
        }
    }

    /// Apply this adjustment to a bid: premiums add, discounts subtract the
    /// absolute value (a discount stored with a stray negative sign still
    /// lowers the price).
    pub fn apply(&self, bid: f64, value: f64) -> f64 {
        match self {
            AdjustmentKind::Premium => bid + value,
            AdjustmentKind::Discount => bid - value.abs(),
        }
    }
}

/// A per-category or per-user pricing override.
///
/// At most one active override exists per (scope, scope_id, product_id); the
/// store enforces replacement on save. The flat making charge and the
/// premium/discount always travel together on one record.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceOverride {
    pub scope: OverrideScope,
    pub scope_id: String,
    pub product_id: String,
    /// Flat fee added after weight/purity conversion (>= 0).
    pub making_charge: f64,
    pub adjustment: AdjustmentKind,
    /// Magnitude of the premium/discount (>= 0).
    pub adjustment_value: f64,
}

/// Immutable product reference data for pricing.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductSpec {
    pub id: String,
    /// Weight in grams; must be > 0 for the price to be computable.
    pub weight_grams: f64,
    /// Fineness code; 0 means unknown.
    pub purity: u32,
    pub category_id: Option<String>,
}
