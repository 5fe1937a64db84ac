//! Axum router and all HTTP handlers for gdk-daemon.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers. All handlers are `pub(crate)` so the scenario tests in
//! `tests/` can compose the router directly.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use gdk_ledger::{BalanceKind, Micros};
use gdk_pricing::{price_breakdown, OverrideScope};
use gdk_projector::project;
use gdk_schemas::{
    AdjustmentAckDto, AdjustmentRequestDto, PriceOverrideDto, ProductDto, QuoteDto,
    SpreadConfigDto,
};

use crate::api_types::{
    override_to_dto, product_spec_from_dto, quote_to_dto, spread_config_to_dto,
    transaction_page_to_dto, ErrorResponse, HealthResponse, PriceResponse,
};
use crate::state::AppState;

/// History page size, matching the upstream contract.
const TRANSACTIONS_PER_PAGE: u32 = 10;

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the complete application router wired to the given shared state.
///
/// Middleware layers (CORS, tracing) are **not** applied here; `main.rs`
/// attaches them after this call so tests can use the bare router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/health", get(health))
        .route("/v1/quote/:instrument", get(get_quote).put(put_quote))
        .route(
            "/v1/spread-config/:owner_id",
            get(get_spread_config).put(put_spread_config),
        )
        .route(
            "/v1/price-override/:scope/:scope_id/:product_id",
            get(get_price_override)
                .patch(patch_price_override)
                .delete(delete_price_override),
        )
        .route("/v1/product/:id", get(get_product).put(put_product))
        .route("/v1/price/:owner_id/:product_id", get(get_price))
        .route("/v1/balance/:owner_id/:balance_type", patch(patch_balance))
        .route("/v1/transactions/:owner_id", get(get_transactions))
        .with_state(state)
}

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

fn not_found(message: impl Into<String>) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// GET /v1/health
// ---------------------------------------------------------------------------

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: true,
            service: st.build.service,
            version: st.build.version,
        }),
    )
}

// ---------------------------------------------------------------------------
// /v1/quote/:instrument
// ---------------------------------------------------------------------------

pub(crate) async fn get_quote(
    State(st): State<Arc<AppState>>,
    Path(instrument): Path<String>,
) -> Response {
    let quotes = st.quotes.read().await;
    match quotes.get(&instrument) {
        Some(q) => (StatusCode::OK, Json(quote_to_dto(q))).into_response(),
        None => not_found(format!("no quote for instrument '{instrument}'")),
    }
}

/// Feed ingestion point: replaces the instrument's snapshot (last write wins).
pub(crate) async fn put_quote(
    State(st): State<Arc<AppState>>,
    Path(instrument): Path<String>,
    Json(dto): Json<QuoteDto>,
) -> Response {
    let quote = gdk_pricing::Quote {
        instrument: instrument.clone(),
        bid: dto.bid,
        ask: dto.ask,
        low: dto.low,
        high: dto.high,
        timestamp: dto.timestamp,
    };
    st.quotes.write().await.insert(instrument.clone(), quote);
    info!(%instrument, bid = dto.bid, "quote tick");
    StatusCode::NO_CONTENT.into_response()
}

// ---------------------------------------------------------------------------
// /v1/spread-config/:owner_id
// ---------------------------------------------------------------------------

pub(crate) async fn get_spread_config(
    State(st): State<Arc<AppState>>,
    Path(owner_id): Path<String>,
) -> impl IntoResponse {
    let config = st.spreads.read().await.get(&owner_id);
    (StatusCode::OK, Json(spread_config_to_dto(&config)))
}

pub(crate) async fn put_spread_config(
    State(st): State<Arc<AppState>>,
    Path(owner_id): Path<String>,
    Json(dto): Json<SpreadConfigDto>,
) -> impl IntoResponse {
    // The path owns the key; the body's ownerId is ignored.
    let config = gdk_pricing::SpreadConfig {
        owner_id: owner_id.clone(),
        bid_spread: dto.bid_spread,
        ask_spread: dto.ask_spread,
        low_margin: dto.low_margin,
        high_margin: dto.high_margin,
    };
    st.spreads.write().await.put(config.clone());
    info!(%owner_id, "spread config saved");
    (StatusCode::OK, Json(spread_config_to_dto(&config)))
}

// ---------------------------------------------------------------------------
// /v1/price-override/:scope/:scope_id/:product_id
// ---------------------------------------------------------------------------

pub(crate) async fn get_price_override(
    State(st): State<Arc<AppState>>,
    Path((scope, scope_id, product_id)): Path<(String, String, String)>,
) -> Response {
    let scope = match OverrideScope::parse(&scope) {
        Ok(s) => s,
        Err(e) => return bad_request(e.to_string()),
    };
    let overrides = st.overrides.read().await;
    match overrides.get(scope, &scope_id, &product_id) {
        Some(o) => (StatusCode::OK, Json(override_to_dto(o))).into_response(),
        None => not_found(format!(
            "no override for {}/{scope_id}/{product_id}",
            scope.as_str()
        )),
    }
}

pub(crate) async fn patch_price_override(
    State(st): State<Arc<AppState>>,
    Path((scope, scope_id, product_id)): Path<(String, String, String)>,
    Json(dto): Json<PriceOverrideDto>,
) -> Response {
    let scope = match OverrideScope::parse(&scope) {
        Ok(s) => s,
        Err(e) => return bad_request(e.to_string()),
    };
    let adjustment = match dto.pricing_type.trim().to_ascii_lowercase().as_str() {
        "premium" => gdk_pricing::AdjustmentKind::Premium,
        "discount" => gdk_pricing::AdjustmentKind::Discount,
        other => {
            return bad_request(format!(
                "invalid pricing type '{other}': expected Premium | Discount"
            ))
        }
    };
    if dto.making_charge < 0.0 || !dto.making_charge.is_finite() {
        return bad_request("making charge must be a non-negative number");
    }

    let ovr = gdk_pricing::PriceOverride {
        scope,
        scope_id: scope_id.clone(),
        product_id: product_id.clone(),
        making_charge: dto.making_charge,
        adjustment,
        adjustment_value: dto.value.abs(),
    };
    st.overrides.write().await.put(ovr.clone());
    info!(
        scope = scope.as_str(),
        %scope_id,
        %product_id,
        "price override saved"
    );
    (StatusCode::OK, Json(override_to_dto(&ovr))).into_response()
}

pub(crate) async fn delete_price_override(
    State(st): State<Arc<AppState>>,
    Path((scope, scope_id, product_id)): Path<(String, String, String)>,
) -> Response {
    let scope = match OverrideScope::parse(&scope) {
        Ok(s) => s,
        Err(e) => return bad_request(e.to_string()),
    };
    match st
        .overrides
        .write()
        .await
        .remove(scope, &scope_id, &product_id)
    {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found(format!(
            "no override for {}/{scope_id}/{product_id}",
            scope.as_str()
        )),
    }
}

// ---------------------------------------------------------------------------
// /v1/product/:id
// ---------------------------------------------------------------------------

pub(crate) async fn get_product(
    State(st): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let products = st.products.read().await;
    match products.get(&id) {
        Some(p) => (StatusCode::OK, Json(p.clone())).into_response(),
        None => not_found(format!("no product '{id}'")),
    }
}

pub(crate) async fn put_product(
    State(st): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(mut dto): Json<ProductDto>,
) -> Response {
    if dto.weight <= 0.0 || !dto.weight.is_finite() {
        return bad_request("product weight must be > 0");
    }
    dto.id = id.clone();
    st.products.write().await.insert(id, dto.clone());
    (StatusCode::OK, Json(dto)).into_response()
}

// ---------------------------------------------------------------------------
// GET /v1/price/:owner_id/:product_id
// ---------------------------------------------------------------------------

/// The read path: recomputed from the latest quote on every call. An
/// incomplete input set yields `price: 0, computable: false`, never an error.
pub(crate) async fn get_price(
    State(st): State<Arc<AppState>>,
    Path((owner_id, product_id)): Path<(String, String)>,
) -> Response {
    let product = match st.products.read().await.get(&product_id) {
        Some(dto) => product_spec_from_dto(dto),
        None => return not_found(format!("no product '{product_id}'")),
    };

    let quotes = st.quotes.read().await;
    let quote = quotes.get("GOLD");
    let config = st.spreads.read().await.get(&owner_id);
    let overrides = st.overrides.read().await;
    let ovr = overrides.resolve(&owner_id, product.category_id.as_deref(), &product_id);

    let breakdown = price_breakdown(quote, &config, ovr, &product);
    (
        StatusCode::OK,
        Json(PriceResponse::from_breakdown(
            &owner_id,
            &product_id,
            breakdown.as_ref(),
        )),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// PATCH /v1/balance/:owner_id/:balance_type
// ---------------------------------------------------------------------------

/// The authoritative adjustment: posts to the book and reports the resulting
/// balance. The amount is a signed decimal string; zero is refused.
pub(crate) async fn patch_balance(
    State(st): State<Arc<AppState>>,
    Path((owner_id, balance_type)): Path<(String, String)>,
    Json(body): Json<AdjustmentRequestDto>,
) -> Response {
    let kind = match BalanceKind::parse(&balance_type) {
        Ok(k) => k,
        Err(e) => return bad_request(e.to_string()),
    };
    let amount = match Micros::parse_decimal(&body.amount) {
        Ok(a) => a,
        Err(e) => return bad_request(e.to_string()),
    };

    let mut book = st.book.write().await;
    match book.post(&owner_id, kind, amount, "RECEIVED", None) {
        Ok(txn) => {
            info!(
                %owner_id,
                kind = kind.as_str(),
                amount = %amount,
                balance_after = %txn.balance_after,
                "balance adjustment posted"
            );
            (
                StatusCode::OK,
                Json(AdjustmentAckDto {
                    success: true,
                    new_balance: txn.balance_after.to_decimal_string(),
                    message: None,
                }),
            )
                .into_response()
        }
        Err(e) => bad_request(e.to_string()),
    }
}

// ---------------------------------------------------------------------------
// GET /v1/transactions/:owner_id?page=N
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryParams {
    #[serde(default)]
    page: Option<u32>,
}

/// One page of history plus summary aggregates over the owner's full stream.
pub(crate) async fn get_transactions(
    State(st): State<Arc<AppState>>,
    Path(owner_id): Path<String>,
    Query(params): Query<HistoryParams>,
) -> impl IntoResponse {
    let book = st.book.read().await;
    let page = book.page(&owner_id, params.page.unwrap_or(1), TRANSACTIONS_PER_PAGE);
    // summary covers the whole stream, not just the requested page
    let all = book.transactions(&owner_id);
    let projection = project(&all, None);
    (
        StatusCode::OK,
        Json(transaction_page_to_dto(&page, &projection)),
    )
}
