//! Exchange-rate abstractions and the persisted last-known rates.

use crate::core::currency::Currency;
use crate::core::error::ConversionError;
use crate::store::DocumentStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Currency code -> units of that currency per one unit of the base.
pub type Rates = HashMap<String, f64>;

/// The full set of rates from one provider response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    pub rates: Rates,
    #[serde(default, with = "crate::core::timestamp::option")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl RateSnapshot {
    pub fn captured_now(rates: Rates) -> Self {
        Self {
            rates,
            timestamp: Some(Utc::now()),
        }
    }

    /// Rate for `to`, ignoring missing, zero, negative or non-finite entries.
    pub fn rate_for(&self, to: Currency) -> Option<f64> {
        self.rates
            .get(to.code())
            .copied()
            .filter(|rate| rate.is_finite() && *rate > 0.0)
    }
}

/// Source of live exchange rates.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches every rate quoted against `base`.
    async fn latest_rates(&self, base: Currency) -> Result<Rates, ConversionError>;
}

/// Last successfully fetched rates, kept for when the provider is unavailable.
#[derive(Clone)]
pub struct RateCache {
    store: Arc<dyn DocumentStore<RateSnapshot>>,
}

impl RateCache {
    pub fn new(store: Arc<dyn DocumentStore<RateSnapshot>>) -> Self {
        Self { store }
    }

    pub async fn snapshot(&self) -> RateSnapshot {
        self.store.load().await.into_value()
    }

    /// Cached rates; empty when nothing usable is stored.
    pub async fn load(&self) -> Rates {
        self.snapshot().await.rates
    }

    /// Replaces the cached rates. Failures are logged, never returned.
    pub async fn save(&self, rates: Rates) {
        let snapshot = RateSnapshot::captured_now(rates);
        match self.store.save(&snapshot).await {
            Ok(()) => debug!("Cached {} rates", snapshot.rates.len()),
            Err(error) => warn!(%error, "Failed to cache exchange rates"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DocumentStore, JsonFileStore, MemoryStore};

    fn rates(entries: &[(&str, f64)]) -> Rates {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_rate_for_skips_unusable_entries() {
        let snapshot = RateSnapshot::captured_now(rates(&[
            ("EUR", 0.92),
            ("GBP", 0.0),
            ("JPY", f64::NAN),
        ]));
        let currency = |c| Currency::parse(c).unwrap();

        assert_eq!(snapshot.rate_for(currency("EUR")), Some(0.92));
        assert_eq!(snapshot.rate_for(currency("GBP")), None);
        assert_eq!(snapshot.rate_for(currency("JPY")), None);
        assert_eq!(snapshot.rate_for(currency("INR")), None);
    }

    #[tokio::test]
    async fn test_cache_save_replaces_wholesale() {
        let store = MemoryStore::<RateSnapshot>::new();
        let cache = RateCache::new(Arc::new(store.clone()));

        cache.save(rates(&[("EUR", 0.9), ("GBP", 0.8)])).await;
        cache.save(rates(&[("INR", 83.1)])).await;

        assert_eq!(cache.load().await, rates(&[("INR", 83.1)]));
        assert!(cache.snapshot().await.timestamp.is_some());
    }

    #[tokio::test]
    async fn test_cache_save_failure_is_absorbed() {
        let store = MemoryStore::<RateSnapshot>::new();
        store.set_fail_writes(true);
        let cache = RateCache::new(Arc::new(store));

        cache.save(rates(&[("EUR", 0.9)])).await;
        assert!(cache.load().await.is_empty());
    }

    #[test]
    fn test_snapshot_document_format() {
        let doc = r#"{"rates": {"EUR": 0.92}, "timestamp": "2024-05-01T10:00:00Z"}"#;
        let snapshot: RateSnapshot = serde_json::from_str(doc).unwrap();
        assert_eq!(snapshot.rates.get("EUR"), Some(&0.92));
        assert!(snapshot.timestamp.is_some());

        let without_timestamp: RateSnapshot = serde_json::from_str(r#"{"rates": {}}"#).unwrap();
        assert!(without_timestamp.timestamp.is_none());
    }

    #[tokio::test]
    async fn test_legacy_cache_file_still_serves_rates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exchange_rates_cache.json");
        std::fs::write(
            &path,
            r#"{"rates": {"EUR": 0.92}, "timestamp": "2024-05-01T10:00:00.123456"}"#,
        )
        .unwrap();
        let store = JsonFileStore::<RateSnapshot>::new(&path);
        assert!(!store.load().await.is_degraded());

        let cache = RateCache::new(Arc::new(store));
        let snapshot = cache.snapshot().await;
        assert_eq!(snapshot.rate_for(Currency::parse("EUR").unwrap()), Some(0.92));
        assert!(snapshot.timestamp.is_some());
    }
}
