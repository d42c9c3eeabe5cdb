//! Asks the rate provider for live rates and remembers the last good answer.

use crate::core::currency::Currency;
use crate::core::error::ConversionError;
use crate::core::rates::{RateCache, RateProvider, RateSnapshot};
use std::sync::Arc;
use tracing::{debug, warn};

/// Fetches live rates for a base currency.
///
/// Every successful response replaces the cached snapshot. Falling back to
/// that snapshot is left to the caller.
#[derive(Clone)]
pub struct RateResolver {
    provider: Arc<dyn RateProvider>,
    cache: RateCache,
}

impl RateResolver {
    pub fn new(provider: Arc<dyn RateProvider>, cache: RateCache) -> Self {
        Self { provider, cache }
    }

    pub async fn resolve(&self, base: Currency) -> Result<RateSnapshot, ConversionError> {
        debug!("Resolving live rates for {base}");
        match self.provider.latest_rates(base).await {
            Ok(rates) => {
                self.cache.save(rates.clone()).await;
                Ok(RateSnapshot::captured_now(rates))
            }
            Err(e) => {
                warn!(error = %e, "Live rates unavailable for {base}");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rates::Rates;
    use crate::store::MemoryStore;
    use async_trait::async_trait;

    struct FixedProvider(Result<Rates, ConversionError>);

    #[async_trait]
    impl RateProvider for FixedProvider {
        async fn latest_rates(&self, _base: Currency) -> Result<Rates, ConversionError> {
            self.0.clone()
        }
    }

    fn usd() -> Currency {
        Currency::parse("USD").unwrap()
    }

    #[tokio::test]
    async fn test_success_refreshes_cache() {
        let cache = RateCache::new(Arc::new(MemoryStore::<RateSnapshot>::new()));
        let rates: Rates = [("EUR".to_string(), 0.85), ("GBP".to_string(), 0.79)].into();
        let resolver = RateResolver::new(Arc::new(FixedProvider(Ok(rates.clone()))), cache.clone());

        let snapshot = resolver.resolve(usd()).await.unwrap();
        assert_eq!(snapshot.rates, rates);
        assert_eq!(cache.load().await, rates);
    }

    #[tokio::test]
    async fn test_failure_leaves_cache_untouched() {
        let cache = RateCache::new(Arc::new(MemoryStore::<RateSnapshot>::new()));
        cache.save([("EUR".to_string(), 0.92)].into()).await;
        let resolver = RateResolver::new(
            Arc::new(FixedProvider(Err(ConversionError::Timeout))),
            cache.clone(),
        );

        assert_eq!(resolver.resolve(usd()).await, Err(ConversionError::Timeout));
        assert_eq!(cache.load().await.get("EUR"), Some(&0.92));
    }

    #[tokio::test]
    async fn test_cache_write_failure_does_not_fail_resolution() {
        let store = MemoryStore::<RateSnapshot>::new();
        store.set_fail_writes(true);
        let cache = RateCache::new(Arc::new(store));
        let rates: Rates = [("EUR".to_string(), 0.85)].into();
        let resolver = RateResolver::new(Arc::new(FixedProvider(Ok(rates.clone()))), cache);

        assert_eq!(resolver.resolve(usd()).await.unwrap().rates, rates);
    }
}
