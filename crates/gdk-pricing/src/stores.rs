//! In-memory spread and override stores.
//!
//! Both stores mirror the remote system of record: loaded on view entry,
//! mutated by explicit admin saves, versionless (last write wins). `BTreeMap`
//! keys keep iteration deterministic.

use std::collections::BTreeMap;

use crate::types::{OverrideScope, PriceOverride, SpreadConfig};

// ---------------------------------------------------------------------------
// SpreadStore
// ---------------------------------------------------------------------------

/// One `SpreadConfig` per owner (admin/tenant).
#[derive(Clone, Debug, Default)]
pub struct SpreadStore {
    inner: BTreeMap<String, SpreadConfig>,
}

impl SpreadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The owner's config, or the neutral all-zero config when none is saved.
    pub fn get(&self, owner_id: &str) -> SpreadConfig {
        self.inner
            .get(owner_id)
            .cloned()
            .unwrap_or_else(|| SpreadConfig::neutral(owner_id))
    }

    /// Save a config; replaces any existing record for the same owner.
    pub fn put(&mut self, config: SpreadConfig) {
        self.inner.insert(config.owner_id.clone(), config);
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ---------------------------------------------------------------------------
// OverrideStore
// ---------------------------------------------------------------------------

type OverrideKey = (OverrideScope, String, String);

/// At most one active override per (scope, scope_id, product_id).
#[derive(Clone, Debug, Default)]
pub struct OverrideStore {
    inner: BTreeMap<OverrideKey, PriceOverride>,
}

impl OverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(o: &PriceOverride) -> OverrideKey {
        (o.scope, o.scope_id.clone(), o.product_id.clone())
    }

    /// Save an override, replacing any active record for the same key.
    /// Returns the replaced record if one existed.
    pub fn put(&mut self, ovr: PriceOverride) -> Option<PriceOverride> {
        self.inner.insert(Self::key(&ovr), ovr)
    }

    pub fn get(
        &self,
        scope: OverrideScope,
        scope_id: &str,
        product_id: &str,
    ) -> Option<&PriceOverride> {
        self.inner
            .get(&(scope, scope_id.to_string(), product_id.to_string()))
    }

    /// Delete an override; returns the removed record if one existed.
    pub fn remove(
        &mut self,
        scope: OverrideScope,
        scope_id: &str,
        product_id: &str,
    ) -> Option<PriceOverride> {
        self.inner
            .remove(&(scope, scope_id.to_string(), product_id.to_string()))
    }

    /// Resolve the override to apply when pricing a product for a user.
    ///
    /// User scope wins over category scope; the flat charge and the
    /// adjustment always come from the same record.
    pub fn resolve(
        &self,
        user_id: &str,
        category_id: Option<&str>,
        product_id: &str,
    ) -> Option<&PriceOverride> {
        if let Some(o) = self.get(OverrideScope::User, user_id, product_id) {
            return Some(o);
        }
        category_id.and_then(|c| self.get(OverrideScope::Category, c, product_id))
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AdjustmentKind;

    fn ovr(scope: OverrideScope, scope_id: &str, product_id: &str, charge: f64) -> PriceOverride {
        PriceOverride {
            scope,
            scope_id: scope_id.to_string(),
            product_id: product_id.to_string(),
            making_charge: charge,
            adjustment: AdjustmentKind::Premium,
            adjustment_value: 1.0,
        }
    }

    #[test]
    fn unknown_owner_gets_neutral_config() {
        let store = SpreadStore::new();
        let cfg = store.get("nobody");
        assert_eq!(cfg, SpreadConfig::neutral("nobody"));
    }

    #[test]
    fn spread_put_is_last_write_wins() {
        let mut store = SpreadStore::new();
        let mut cfg = SpreadConfig::neutral("admin-1");
        cfg.bid_spread = 1.0;
        store.put(cfg);

        let mut cfg2 = SpreadConfig::neutral("admin-1");
        cfg2.bid_spread = 2.5;
        store.put(cfg2);

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("admin-1").bid_spread, 2.5);
    }

    #[test]
    fn override_put_replaces_same_key() {
        let mut store = OverrideStore::new();
        assert!(store.put(ovr(OverrideScope::User, "u1", "p1", 10.0)).is_none());
        let replaced = store.put(ovr(OverrideScope::User, "u1", "p1", 20.0));
        assert_eq!(replaced.unwrap().making_charge, 10.0);
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get(OverrideScope::User, "u1", "p1").unwrap().making_charge,
            20.0
        );
    }

    #[test]
    fn user_scope_wins_over_category() {
        let mut store = OverrideStore::new();
        store.put(ovr(OverrideScope::Category, "rings", "p1", 5.0));
        store.put(ovr(OverrideScope::User, "u1", "p1", 9.0));

        let resolved = store.resolve("u1", Some("rings"), "p1").unwrap();
        assert_eq!(resolved.scope, OverrideScope::User);
        assert_eq!(resolved.making_charge, 9.0);
    }

    #[test]
    fn category_fallback_when_no_user_override() {
        let mut store = OverrideStore::new();
        store.put(ovr(OverrideScope::Category, "rings", "p1", 5.0));

        let resolved = store.resolve("u1", Some("rings"), "p1").unwrap();
        assert_eq!(resolved.scope, OverrideScope::Category);
        assert!(store.resolve("u1", None, "p1").is_none());
    }

    #[test]
    fn remove_clears_the_record() {
        let mut store = OverrideStore::new();
        store.put(ovr(OverrideScope::User, "u1", "p1", 10.0));
        assert!(store.remove(OverrideScope::User, "u1", "p1").is_some());
        assert!(store.is_empty());
        assert!(store.remove(OverrideScope::User, "u1", "p1").is_none());
    }
}
