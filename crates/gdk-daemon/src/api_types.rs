//! Response types and domain ↔ DTO mapping for the daemon's HTTP surface.
//!
//! Wire DTOs live in `gdk-schemas`; this module adds the daemon-only
//! responses and the outbound conversions. No business logic lives here.

use serde::{Deserialize, Serialize};

use gdk_ledger::{Transaction, TransactionPage};
use gdk_pricing::{PriceBreakdown, PriceOverride, ProductSpec, Quote, SpreadConfig};
use gdk_projector::Projection;
use gdk_schemas::{
    BalanceInfoDto, FlowSummaryDto, PaginationDto, PriceOverrideDto, ProductDto, QuoteDto,
    SpreadConfigDto, SummaryDto, TransactionDto, TransactionPageDto,
};

// ---------------------------------------------------------------------------
// Daemon-only responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: &'static str,
    pub version: &'static str,
}

/// Uniform error body for 4xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Computed display price for one product and owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceResponse {
    pub owner_id: String,
    pub product_id: String,
    /// Whole currency units; 0 while the price is not yet computable.
    pub price: i64,
    pub computable: bool,
}

impl PriceResponse {
    pub fn from_breakdown(
        owner_id: &str,
        product_id: &str,
        breakdown: Option<&PriceBreakdown>,
    ) -> Self {
        Self {
            owner_id: owner_id.to_string(),
            product_id: product_id.to_string(),
            price: breakdown.map(|b| b.display_price).unwrap_or(0),
            computable: breakdown.is_some(),
        }
    }
}

// ---------------------------------------------------------------------------
// Outbound conversions (domain → DTO)
// ---------------------------------------------------------------------------

pub fn quote_to_dto(q: &Quote) -> QuoteDto {
    QuoteDto {
        instrument: q.instrument.clone(),
        bid: q.bid,
        ask: q.ask,
        low: q.low,
        high: q.high,
        timestamp: q.timestamp,
    }
}

pub fn spread_config_to_dto(c: &SpreadConfig) -> SpreadConfigDto {
    SpreadConfigDto {
        owner_id: c.owner_id.clone(),
        bid_spread: c.bid_spread,
        ask_spread: c.ask_spread,
        low_margin: c.low_margin,
        high_margin: c.high_margin,
    }
}

pub fn override_to_dto(o: &PriceOverride) -> PriceOverrideDto {
    let signed_value = match o.adjustment {
        gdk_pricing::AdjustmentKind::Premium => o.adjustment_value,
        gdk_pricing::AdjustmentKind::Discount => -o.adjustment_value.abs(),
    };
    PriceOverrideDto {
        scope: o.scope.as_str().to_string(),
        scope_id: o.scope_id.clone(),
        product_id: o.product_id.clone(),
        making_charge: o.making_charge,
        pricing_type: o.adjustment.as_str().to_string(),
        value: signed_value,
        is_active: true,
    }
}

/// The daemon stores full `ProductDto` records (title included); pricing
/// only needs this projection.
pub fn product_spec_from_dto(dto: &ProductDto) -> ProductSpec {
    ProductSpec {
        id: dto.id.clone(),
        weight_grams: dto.weight,
        purity: dto.purity,
        category_id: dto.category_id.clone(),
    }
}

pub fn transaction_to_dto(t: &Transaction) -> TransactionDto {
    TransactionDto {
        id: t.id.clone(),
        transaction_id: t.transaction_id.clone(),
        owner_id: t.owner_id.clone(),
        r#type: t.txn_type.as_str().to_string(),
        method: t.method.clone(),
        amount: t.amount.to_decimal_string(),
        balance_type: t.balance_type.as_str().to_string(),
        balance_after: t.balance_after.to_decimal_string(),
        created_at: t.created_at,
        order_ref: t.order_ref.clone(),
    }
}

pub fn transaction_page_to_dto(page: &TransactionPage, projection: &Projection) -> TransactionPageDto {
    TransactionPageDto {
        transactions: page.transactions.iter().map(transaction_to_dto).collect(),
        summary: SummaryDto {
            cash: FlowSummaryDto {
                total_credits: projection.summary.cash.total_credits.to_decimal_string(),
                total_debits: projection.summary.cash.total_debits.to_decimal_string(),
                net_flow: projection.summary.cash.net_flow().to_decimal_string(),
            },
            gold: FlowSummaryDto {
                total_credits: projection.summary.gold.total_credits.to_decimal_string(),
                total_debits: projection.summary.gold.total_debits.to_decimal_string(),
                net_flow: projection.summary.gold.net_flow().to_decimal_string(),
            },
        },
        balance_info: BalanceInfoDto {
            cash_balance: projection.balance_info.cash_balance.to_decimal_string(),
            total_gold_balance: projection
                .balance_info
                .total_gold_balance
                .to_decimal_string(),
        },
        pagination: PaginationDto {
            current_page: page.current_page,
            total_pages: page.total_pages,
            items_per_page: page.items_per_page,
            total_items: page.total_items,
        },
    }
}
