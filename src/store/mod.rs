//! Whole-document persistence for the rate cache and the conversion history.

pub mod disk;
pub mod memory;

use crate::core::error::StorageError;
use async_trait::async_trait;

pub use disk::JsonFileStore;
pub use memory::MemoryStore;

/// Result of reading a persisted document.
///
/// Reads never fail outright: on error the caller receives an empty value
/// together with the reason, and decides whether to report it.
#[derive(Debug)]
pub enum LoadOutcome<T> {
    Loaded(T),
    Degraded { value: T, error: StorageError },
}

impl<T> LoadOutcome<T> {
    pub fn into_value(self) -> T {
        match self {
            LoadOutcome::Loaded(value) | LoadOutcome::Degraded { value, .. } => value,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, LoadOutcome::Degraded { .. })
    }
}

/// A single document that is always read and written in full.
#[async_trait]
pub trait DocumentStore<T: Send + Sync>: Send + Sync {
    /// Reads the document; missing or unreadable content yields a default value.
    async fn load(&self) -> LoadOutcome<T>;

    /// Replaces the stored document.
    async fn save(&self, value: &T) -> Result<(), StorageError>;
}
