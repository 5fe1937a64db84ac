//! Market quote source and the stale-response guard.
//!
//! Quote fetches are fired on a poll cadence and may resolve out of order.
//! [`QuoteGuard`] hands out a sequence number per request and accepts a
//! response only if no newer request has already landed; a superseded
//! response is discarded, never applied.

use std::fmt;

use gdk_pricing::Quote;
use gdk_schemas::QuoteDto;

use crate::authority::AuthorityError;
use crate::convert;

// ---------------------------------------------------------------------------
// Source trait
// ---------------------------------------------------------------------------

/// External market-data feed, polled for the latest snapshot.
#[async_trait::async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch_quote(&self, instrument: &str) -> Result<Quote, AuthorityError>;
}

/// reqwest-backed [`QuoteSource`].
#[derive(Debug, Clone)]
pub struct HttpQuoteSource {
    http: reqwest::Client,
    base_url: String,
}

impl HttpQuoteSource {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }
}

#[async_trait::async_trait]
impl QuoteSource for HttpQuoteSource {
    async fn fetch_quote(&self, instrument: &str) -> Result<Quote, AuthorityError> {
        let url = format!(
            "{}/v1/quote/{instrument}",
            self.base_url.trim_end_matches('/')
        );
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AuthorityError::Transport(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(AuthorityError::Api {
                code: Some(status.as_u16() as i64),
                message,
            });
        }
        let dto: QuoteDto = resp
            .json()
            .await
            .map_err(|e| AuthorityError::Decode(e.to_string()))?;
        Ok(convert::quote_from_dto(&dto))
    }
}

// ---------------------------------------------------------------------------
// Stale-response guard
// ---------------------------------------------------------------------------

/// A response arrived for a request that has been superseded. Not
/// user-visible; callers drop it silently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleQuote {
    pub seq: u64,
    pub latest_seq: u64,
}

impl fmt::Display for StaleQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "quote response seq={} superseded by seq={}",
            self.seq, self.latest_seq
        )
    }
}

impl std::error::Error for StaleQuote {}

/// Holds the latest accepted quote, keyed by request sequence number.
#[derive(Debug, Clone, Default)]
pub struct QuoteGuard {
    next_seq: u64,
    accepted_seq: u64,
    latest: Option<Quote>,
}

impl QuoteGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the sequence number for a fetch about to start. Sequence
    /// numbers start at 1; 0 means "nothing accepted yet".
    pub fn begin_fetch(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Accept a fetched quote unless a same-or-newer response already landed.
    pub fn accept(&mut self, seq: u64, quote: Quote) -> Result<&Quote, StaleQuote> {
        if seq <= self.accepted_seq {
            return Err(StaleQuote {
                seq,
                latest_seq: self.accepted_seq,
            });
        }
        self.accepted_seq = seq;
        self.latest = Some(quote);
        Ok(self.latest.as_ref().expect("just set"))
    }

    /// The freshest accepted snapshot, if any.
    pub fn latest(&self) -> Option<&Quote> {
        self.latest.as_ref()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
