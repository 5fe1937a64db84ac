//! Wire DTO → domain conversions.
//!
//! All decimal strings become `Micros` here; malformed payloads surface as
//! [`AuthorityError::Decode`] with the offending field named.

use gdk_ledger::{BalanceKind, Micros, Transaction, TxnType};
use gdk_pricing::{
    AdjustmentKind, OverrideScope, PriceOverride, ProductSpec, Quote, SpreadConfig,
};
use gdk_schemas::{PriceOverrideDto, ProductDto, QuoteDto, SpreadConfigDto, TransactionDto};

use crate::authority::AuthorityError;

pub fn spread_config_from_dto(dto: &SpreadConfigDto) -> SpreadConfig {
    SpreadConfig {
        owner_id: dto.owner_id.clone(),
        bid_spread: dto.bid_spread,
        ask_spread: dto.ask_spread,
        low_margin: dto.low_margin,
        high_margin: dto.high_margin,
    }
}

pub fn quote_from_dto(dto: &QuoteDto) -> Quote {
    Quote {
        instrument: dto.instrument.clone(),
        bid: dto.bid,
        ask: dto.ask,
        low: dto.low,
        high: dto.high,
        timestamp: dto.timestamp,
    }
}

pub fn product_from_dto(dto: &ProductDto) -> ProductSpec {
    ProductSpec {
        id: dto.id.clone(),
        weight_grams: dto.weight,
        purity: dto.purity,
        category_id: dto.category_id.clone(),
    }
}

/// The wire carries a signed `value` plus an explicit `pricingType`; the
/// domain stores the kind and the magnitude.
pub fn override_from_dto(dto: &PriceOverrideDto) -> Result<PriceOverride, AuthorityError> {
    let scope = OverrideScope::parse(&dto.scope)
        .map_err(|e| AuthorityError::Decode(e.to_string()))?;
    let adjustment = match dto.pricing_type.trim().to_ascii_lowercase().as_str() {
        "premium" => AdjustmentKind::Premium,
        "discount" => AdjustmentKind::Discount,
        other => {
            return Err(AuthorityError::Decode(format!(
                "invalid pricing type '{other}': expected Premium | Discount"
            )))
        }
    };
    Ok(PriceOverride {
        scope,
        scope_id: dto.scope_id.clone(),
        product_id: dto.product_id.clone(),
        making_charge: dto.making_charge,
        adjustment,
        adjustment_value: dto.value.abs(),
    })
}

pub fn override_to_dto(ovr: &PriceOverride) -> PriceOverrideDto {
    let signed_value = match ovr.adjustment {
        AdjustmentKind::Premium => ovr.adjustment_value,
        AdjustmentKind::Discount => -ovr.adjustment_value.abs(),
    };
    PriceOverrideDto {
        scope: ovr.scope.as_str().to_string(),
        scope_id: ovr.scope_id.clone(),
        product_id: ovr.product_id.clone(),
        making_charge: ovr.making_charge,
        pricing_type: ovr.adjustment.as_str().to_string(),
        value: signed_value,
        is_active: true,
    }
}

pub fn transaction_from_dto(dto: &TransactionDto) -> Result<Transaction, AuthorityError> {
    let txn_type = match dto.r#type.trim().to_ascii_uppercase().as_str() {
        "CREDIT" => TxnType::Credit,
        "DEBIT" => TxnType::Debit,
        other => {
            return Err(AuthorityError::Decode(format!(
                "invalid transaction type '{other}': expected CREDIT | DEBIT"
            )))
        }
    };
    let balance_type = BalanceKind::parse(&dto.balance_type)
        .map_err(|e| AuthorityError::Decode(e.to_string()))?;
    let amount = Micros::parse_decimal(&dto.amount)
        .map_err(|e| AuthorityError::Decode(format!("amount: {e}")))?;
    let balance_after = Micros::parse_decimal(&dto.balance_after)
        .map_err(|e| AuthorityError::Decode(format!("balanceAfter: {e}")))?;

    Ok(Transaction {
        id: dto.id.clone(),
        transaction_id: dto.transaction_id.clone(),
        owner_id: dto.owner_id.clone(),
        txn_type,
        method: dto.method.clone(),
        amount,
        balance_type,
        balance_after,
        created_at: dto.created_at,
        order_ref: dto.order_ref.clone(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn discount_round_trips_with_signed_wire_value() {
        let ovr = PriceOverride {
            scope: OverrideScope::Category,
            scope_id: "rings".into(),
            product_id: "p1".into(),
            making_charge: 25.0,
            adjustment: AdjustmentKind::Discount,
            adjustment_value: 5.0,
        };
        let dto = override_to_dto(&ovr);
        assert_eq!(dto.value, -5.0);
        assert_eq!(dto.pricing_type, "Discount");

        let back = override_from_dto(&dto).unwrap();
        assert_eq!(back, ovr);
    }

    #[test]
    fn override_rejects_unknown_pricing_type() {
        let dto = PriceOverrideDto {
            scope: "user".into(),
            scope_id: "u1".into(),
            product_id: "p1".into(),
            making_charge: 0.0,
            pricing_type: "markup".into(),
            value: 1.0,
            is_active: true,
        };
        assert!(matches!(
            override_from_dto(&dto),
            Err(AuthorityError::Decode(_))
        ));
    }

    #[test]
    fn transaction_decimals_become_micros() {
        let dto = TransactionDto {
            id: "t1".into(),
            transaction_id: "TXN-1".into(),
            owner_id: "u1".into(),
            r#type: "DEBIT".into(),
            method: "RECEIVED".into(),
            amount: "2.5".into(),
            balance_type: "GOLD".into(),
            balance_after: "-0.5".into(),
            created_at: Utc::now(),
            order_ref: None,
        };
        let txn = transaction_from_dto(&dto).unwrap();
        assert_eq!(txn.txn_type, TxnType::Debit);
        assert_eq!(txn.amount, Micros::new(2_500_000));
        assert_eq!(txn.balance_after, Micros::new(-500_000));
        assert_eq!(txn.balance_type, BalanceKind::Gold);
    }

    #[test]
    fn transaction_rejects_bad_amount() {
        let dto = TransactionDto {
            id: "t1".into(),
            transaction_id: "TXN-1".into(),
            owner_id: "u1".into(),
            r#type: "CREDIT".into(),
            method: "RECEIVED".into(),
            amount: "2,5".into(),
            balance_type: "CASH".into(),
            balance_after: "0".into(),
            created_at: Utc::now(),
            order_ref: None,
        };
        assert!(matches!(
            transaction_from_dto(&dto),
            Err(AuthorityError::Decode(_))
        ));
    }
}
