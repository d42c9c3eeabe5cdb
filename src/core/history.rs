//! Conversion records and the bounded, newest-first history log.

use crate::core::error::StorageError;
use crate::store::DocumentStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Where the rate used for a conversion came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateSource {
    /// Fetched from the provider for this conversion.
    Live,
    /// Provider failed; last cached rate was used.
    Cached,
    /// Source and target currencies are identical.
    Same,
}

impl Display for RateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            RateSource::Live => "live",
            RateSource::Cached => "cached",
            RateSource::Same => "same",
        })
    }
}

/// One successful conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRecord {
    pub amount: f64,
    pub from_currency: String,
    pub to_currency: String,
    pub converted_amount: f64,
    pub exchange_rate: f64,
    pub source: RateSource,
    #[serde(with = "crate::core::timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// Newest-first log of conversions, capped at `limit` entries.
///
/// Updates load the whole log, prepend, truncate and write it back. The
/// sequence is serialised within this process only; separate processes
/// sharing the file overwrite each other.
#[derive(Clone)]
pub struct ConversionHistory {
    store: Arc<dyn DocumentStore<Vec<ConversionRecord>>>,
    limit: usize,
    write_lock: Arc<Mutex<()>>,
}

impl ConversionHistory {
    pub fn new(store: Arc<dyn DocumentStore<Vec<ConversionRecord>>>, limit: usize) -> Self {
        Self {
            store,
            limit,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn load(&self) -> Vec<ConversionRecord> {
        let mut records = self.store.load().await.into_value();
        records.truncate(self.limit);
        records
    }

    /// Prepends `record` and persists. Storage failures are logged only.
    pub async fn record(&self, record: ConversionRecord) {
        let _guard = self.write_lock.lock().await;

        let mut records = self.store.load().await.into_value();
        records.insert(0, record);
        records.truncate(self.limit);

        match self.store.save(&records).await {
            Ok(()) => debug!("History now holds {} records", records.len()),
            Err(error) => warn!(%error, "Failed to save conversion history"),
        }
    }

    pub async fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        self.store.save(&Vec::new()).await
    }
}
