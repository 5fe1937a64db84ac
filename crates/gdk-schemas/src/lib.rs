//! gdk-schemas
//!
//! Wire DTOs shared by the client boundary and the daemon.
//!
//! Field names follow the upstream REST contract (camelCase). Monetary and
//! weight amounts cross the wire as decimal **strings** so every boundary can
//! normalize to integer micros deterministically; quote prices, spreads, and
//! margins are plain JSON numbers (display-math inputs, not ledger amounts).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Latest market snapshot for one instrument.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDto {
    pub instrument: String,
    pub bid: f64,
    pub ask: f64,
    pub low: f64,
    pub high: f64,
    /// Snapshot timestamp as UTC epoch seconds.
    pub timestamp: i64,
}

/// Per-owner spread configuration. One record per admin/tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadConfigDto {
    pub owner_id: String,
    pub bid_spread: f64,
    pub ask_spread: f64,
    pub low_margin: f64,
    pub high_margin: f64,
}

/// A per-category or per-user pricing override.
///
/// `value` is signed on the wire: negative for a discount, positive for a
/// premium. `pricing_type` names the adjustment kind explicitly; readers take
/// the absolute value and trust the type field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceOverrideDto {
    pub scope: String,
    pub scope_id: String,
    pub product_id: String,
    pub making_charge: f64,
    /// `"Premium"` or `"Discount"`.
    pub pricing_type: String,
    pub value: f64,
    pub is_active: bool,
}

/// Immutable product reference data used for pricing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub title: String,
    /// Weight in grams.
    pub weight: f64,
    /// Fineness code; digit count implies the decimal scale (9999 → 0.9999).
    pub purity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}

/// A ledger transaction. Authoritative records come from the server; a
/// pending record is client-synthesized with a `temp-` id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    pub id: String,
    pub transaction_id: String,
    pub owner_id: String,
    /// `"CREDIT"` or `"DEBIT"`.
    pub r#type: String,
    pub method: String,
    /// Absolute amount as a decimal string.
    pub amount: String,
    /// `"CASH"` or `"GOLD"`.
    pub balance_type: String,
    /// Balance immediately after this transaction, as a decimal string.
    pub balance_after: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_ref: Option<String>,
}

/// Body for `PATCH /v1/balance/:owner_id/:balance_type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentRequestDto {
    /// Signed decimal string; the sign decides CREDIT vs DEBIT.
    pub amount: String,
}

/// Acknowledgment of an authoritative balance adjustment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentAckDto {
    pub success: bool,
    /// Authoritative balance after the server applied the adjustment.
    pub new_balance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Credit/debit/net-flow totals for one balance type, as decimal strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowSummaryDto {
    pub total_credits: String,
    pub total_debits: String,
    pub net_flow: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDto {
    pub cash: FlowSummaryDto,
    pub gold: FlowSummaryDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceInfoDto {
    pub cash_balance: String,
    pub total_gold_balance: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationDto {
    pub current_page: u32,
    pub total_pages: u32,
    pub items_per_page: u32,
    pub total_items: u64,
}

/// One page of transaction history plus derived aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPageDto {
    pub transactions: Vec<TransactionDto>,
    pub summary: SummaryDto,
    pub balance_info: BalanceInfoDto,
    pub pagination: PaginationDto,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_round_trips_camel_case() {
        let dto = TransactionDto {
            id: "t1".into(),
            transaction_id: "TXN-1".into(),
            owner_id: "u1".into(),
            r#type: "CREDIT".into(),
            method: "RECEIVED".into(),
            amount: "500".into(),
            balance_type: "CASH".into(),
            balance_after: "1500".into(),
            created_at: Utc::now(),
            order_ref: None,
        };
        let json = serde_json::to_string(&dto).unwrap();
        assert!(json.contains("\"balanceType\":\"CASH\""));
        assert!(json.contains("\"balanceAfter\":\"1500\""));
        assert!(!json.contains("orderRef"));
        let back: TransactionDto = serde_json::from_str(&json).unwrap();
        assert_eq!(back.transaction_id, "TXN-1");
    }

    #[test]
    fn override_value_keeps_sign_on_wire() {
        let dto = PriceOverrideDto {
            scope: "user".into(),
            scope_id: "u1".into(),
            product_id: "p1".into(),
            making_charge: 25.0,
            pricing_type: "Discount".into(),
            value: -5.0,
            is_active: true,
        };
        let json = serde_json::to_string(&dto).unwrap();
        assert!(json.contains("\"value\":-5.0"));
        assert!(json.contains("\"makingCharge\":25.0"));
    }

    #[test]
    fn adjustment_ack_shape() {
        let json = r#"{"success":true,"newBalance":"1400.5"}"#;
        let ack: AdjustmentAckDto = serde_json::from_str(json).unwrap();
        assert!(ack.success);
        assert_eq!(ack.new_balance, "1400.5");
        assert!(ack.message.is_none());
    }
}
