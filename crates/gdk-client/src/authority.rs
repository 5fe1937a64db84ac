//! The remote ledger-authority contract and its HTTP implementation.

use std::fmt;

use gdk_ledger::{BalanceKind, Micros, TransactionPage};
use gdk_pricing::{OverrideScope, PriceOverride, ProductSpec, SpreadConfig};
use gdk_schemas::{
    AdjustmentAckDto, AdjustmentRequestDto, PriceOverrideDto, ProductDto, SpreadConfigDto,
    TransactionPageDto,
};

use crate::convert;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors a collaborator implementation may return.
#[derive(Debug)]
pub enum AuthorityError {
    /// Network or transport failure.
    Transport(String),
    /// The upstream returned an application-level error.
    Api { code: Option<i64>, message: String },
    /// A response payload could not be decoded into domain values.
    Decode(String),
}

impl fmt::Display for AuthorityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthorityError::Transport(msg) => write!(f, "transport error: {msg}"),
            AuthorityError::Api {
                code: Some(c),
                message,
            } => write!(f, "authority api error code={c}: {message}"),
            AuthorityError::Api {
                code: None,
                message,
            } => write!(f, "authority api error: {message}"),
            AuthorityError::Decode(msg) => write!(f, "decode error: {msg}"),
        }
    }
}

impl std::error::Error for AuthorityError {}

// ---------------------------------------------------------------------------
// Ack
// ---------------------------------------------------------------------------

/// The authority's answer to a balance adjustment.
#[derive(Clone, Debug, PartialEq)]
pub struct AdjustmentAck {
    pub success: bool,
    /// Authoritative balance after the server applied the adjustment.
    pub new_balance: Micros,
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// The remote system of record, abstracted from its transport.
///
/// Implementations must be `Send + Sync` so they can be shared across async
/// task boundaries, and object-safe so callers can hold a
/// `Box<dyn LedgerAuthority>`.
#[async_trait::async_trait]
pub trait LedgerAuthority: Send + Sync {
    /// The authoritative commit call behind `PATCH applyBalanceAdjustment`.
    async fn apply_adjustment(
        &self,
        owner_id: &str,
        kind: BalanceKind,
        amount: Micros,
    ) -> Result<AdjustmentAck, AuthorityError>;

    async fn fetch_spread_config(&self, owner_id: &str)
        -> Result<SpreadConfig, AuthorityError>;

    /// `Ok(None)` when no override exists for the key.
    async fn fetch_price_override(
        &self,
        scope: OverrideScope,
        scope_id: &str,
        product_id: &str,
    ) -> Result<Option<PriceOverride>, AuthorityError>;

    async fn save_price_override(&self, ovr: &PriceOverride) -> Result<(), AuthorityError>;

    async fn fetch_product(&self, product_id: &str) -> Result<ProductSpec, AuthorityError>;

    async fn fetch_transactions(
        &self,
        owner_id: &str,
        page: u32,
    ) -> Result<TransactionPage, AuthorityError>;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// reqwest-backed [`LedgerAuthority`] speaking the `/v1` JSON surface.
#[derive(Debug, Clone)]
pub struct HttpLedgerAuthority {
    http: reqwest::Client,
    base_url: String,
}

impl HttpLedgerAuthority {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<T, AuthorityError> {
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(AuthorityError::Api {
                code: Some(status.as_u16() as i64),
                message,
            });
        }
        resp.json::<T>()
            .await
            .map_err(|e| AuthorityError::Decode(e.to_string()))
    }
}

#[async_trait::async_trait]
impl LedgerAuthority for HttpLedgerAuthority {
    async fn apply_adjustment(
        &self,
        owner_id: &str,
        kind: BalanceKind,
        amount: Micros,
    ) -> Result<AdjustmentAck, AuthorityError> {
        let body = AdjustmentRequestDto {
            amount: amount.to_decimal_string(),
        };
        let resp = self
            .http
            .patch(self.url(&format!("/v1/balance/{owner_id}/{}", kind.as_str())))
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthorityError::Transport(e.to_string()))?;

        let dto: AdjustmentAckDto = Self::decode(resp).await?;
        let new_balance = Micros::parse_decimal(&dto.new_balance)
            .map_err(|e| AuthorityError::Decode(e.to_string()))?;
        Ok(AdjustmentAck {
            success: dto.success,
            new_balance,
            message: dto.message,
        })
    }

    async fn fetch_spread_config(
        &self,
        owner_id: &str,
    ) -> Result<SpreadConfig, AuthorityError> {
        let resp = self
            .http
            .get(self.url(&format!("/v1/spread-config/{owner_id}")))
            .send()
            .await
            .map_err(|e| AuthorityError::Transport(e.to_string()))?;
        let dto: SpreadConfigDto = Self::decode(resp).await?;
        Ok(convert::spread_config_from_dto(&dto))
    }

    async fn fetch_price_override(
        &self,
        scope: OverrideScope,
        scope_id: &str,
        product_id: &str,
    ) -> Result<Option<PriceOverride>, AuthorityError> {
        let resp = self
            .http
            .get(self.url(&format!(
                "/v1/price-override/{}/{scope_id}/{product_id}",
                scope.as_str()
            )))
            .send()
            .await
            .map_err(|e| AuthorityError::Transport(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let dto: PriceOverrideDto = Self::decode(resp).await?;
        convert::override_from_dto(&dto).map(Some)
    }

    async fn save_price_override(&self, ovr: &PriceOverride) -> Result<(), AuthorityError> {
        let dto = convert::override_to_dto(ovr);
        let resp = self
            .http
            .patch(self.url(&format!(
                "/v1/price-override/{}/{}/{}",
                ovr.scope.as_str(),
                ovr.scope_id,
                ovr.product_id
            )))
            .json(&dto)
            .send()
            .await
            .map_err(|e| AuthorityError::Transport(e.to_string()))?;
        let _: PriceOverrideDto = Self::decode(resp).await?;
        Ok(())
    }

    async fn fetch_product(&self, product_id: &str) -> Result<ProductSpec, AuthorityError> {
        let resp = self
            .http
            .get(self.url(&format!("/v1/product/{product_id}")))
            .send()
            .await
            .map_err(|e| AuthorityError::Transport(e.to_string()))?;
        let dto: ProductDto = Self::decode(resp).await?;
        Ok(convert::product_from_dto(&dto))
    }

    async fn fetch_transactions(
        &self,
        owner_id: &str,
        page: u32,
    ) -> Result<TransactionPage, AuthorityError> {
        let resp = self
            .http
            .get(self.url(&format!("/v1/transactions/{owner_id}")))
            .query(&[("page", page.to_string())])
            .send()
            .await
            .map_err(|e| AuthorityError::Transport(e.to_string()))?;
        let dto: TransactionPageDto = Self::decode(resp).await?;

        let transactions = dto
            .transactions
            .iter()
            .map(convert::transaction_from_dto)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TransactionPage {
            transactions,
            current_page: dto.pagination.current_page,
            total_pages: dto.pagination.total_pages,
            items_per_page: dto.pagination.items_per_page,
            total_items: dto.pagination.total_items,
        })
    }
}
