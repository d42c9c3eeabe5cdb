use super::{DocumentStore, LoadOutcome};
use crate::core::error::StorageError;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory document store. Clones share the same document.
#[derive(Clone)]
pub struct MemoryStore<T> {
    inner: Arc<Mutex<T>>,
    fail_writes: Arc<AtomicBool>,
}

impl<T: Default> MemoryStore<T> {
    pub fn new() -> Self {
        Self::with_value(T::default())
    }
}

impl<T> MemoryStore<T> {
    pub fn with_value(value: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(value)),
            fail_writes: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Makes every subsequent `save` fail, simulating an unwritable disk.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl<T: Default> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> DocumentStore<T> for MemoryStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn load(&self) -> LoadOutcome<T> {
        LoadOutcome::Loaded(self.inner.lock().await.clone())
    }

    async fn save(&self, value: &T) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Io {
                path: "<memory>".to_string(),
                source: std::io::Error::other("writes disabled"),
            });
        }
        *self.inner.lock().await = value.clone();
        debug!("Memory document replaced");
        Ok(())
    }
}
