//! Shared runtime state for gdk-daemon.
//!
//! The daemon is the in-process mirror of the system of record: spread
//! configs, overrides, products, the authoritative transaction book, and the
//! latest quote per instrument. Handlers receive `State<Arc<AppState>>` from
//! Axum; every mutable piece sits behind its own `RwLock` so the book — the
//! only writer-heavy state — never serializes reads of pricing data.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use gdk_ledger::AuthorityBook;
use gdk_pricing::{OverrideStore, Quote, SpreadStore};
use gdk_schemas::ProductDto;

/// Static build metadata included in the health response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

/// Cloneable (Arc) handle shared across all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub build: BuildInfo,
    /// Per-owner spread configs; last write wins.
    pub spreads: Arc<RwLock<SpreadStore>>,
    /// Active price overrides keyed by (scope, scope id, product id).
    pub overrides: Arc<RwLock<OverrideStore>>,
    /// Product reference data keyed by product id.
    pub products: Arc<RwLock<BTreeMap<String, ProductDto>>>,
    /// The authoritative balance book — sole mutator of balance state.
    pub book: Arc<RwLock<AuthorityBook>>,
    /// Latest quote per instrument, replaced on every feed tick.
    pub quotes: Arc<RwLock<BTreeMap<String, Quote>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            build: BuildInfo {
                service: "gdk-daemon",
                version: env!("CARGO_PKG_VERSION"),
            },
            spreads: Arc::new(RwLock::new(SpreadStore::new())),
            overrides: Arc::new(RwLock::new(OverrideStore::new())),
            products: Arc::new(RwLock::new(BTreeMap::new())),
            book: Arc::new(RwLock::new(AuthorityBook::new())),
            quotes: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }
}
