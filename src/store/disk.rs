use super::{DocumentStore, LoadOutcome};
use crate::core::error::StorageError;
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Stores a document as pretty-printed JSON in a single file.
pub struct JsonFileStore<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn serde_error(&self, source: serde_json::Error) -> StorageError {
        StorageError::Serialization {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl<T: DeserializeOwned> JsonFileStore<T> {
    async fn read_document(&self) -> Result<T, StorageError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;
        serde_json::from_slice(&bytes).map_err(|e| self.serde_error(e))
    }
}

#[async_trait]
impl<T> DocumentStore<T> for JsonFileStore<T>
where
    T: Serialize + DeserializeOwned + Default + Send + Sync + 'static,
{
    async fn load(&self) -> LoadOutcome<T> {
        match self.read_document().await {
            Ok(value) => {
                debug!("Loaded {}", self.path.display());
                LoadOutcome::Loaded(value)
            }
            Err(StorageError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                debug!("No document at {}, starting empty", self.path.display());
                LoadOutcome::Loaded(T::default())
            }
            Err(error) => {
                warn!(%error, "Falling back to empty document");
                LoadOutcome::Degraded {
                    value: T::default(),
                    error,
                }
            }
        }
    }

    async fn save(&self, value: &T) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }
        let bytes = serde_json::to_vec_pretty(value).map_err(|e| self.serde_error(e))?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|e| self.io_error(e))?;
        debug!("Wrote {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::<Vec<String>>::new(dir.path().join("absent.json"));

        let outcome = store.load().await;
        assert!(!outcome.is_degraded());
        assert!(outcome.into_value().is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::<HashMap<String, f64>>::new(dir.path().join("doc.json"));

        let mut doc = HashMap::new();
        doc.insert("EUR".to_string(), 0.92);
        store.save(&doc).await.unwrap();

        assert_eq!(store.load().await.into_value(), doc);
    }

    #[tokio::test]
    async fn test_save_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("doc.json");
        let store = JsonFileStore::<Vec<u32>>::new(&path);

        store.save(&vec![1, 2, 3]).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_malformed_content_degrades() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = JsonFileStore::<Vec<u32>>::new(&path);

        let outcome = store.load().await;
        assert!(outcome.is_degraded());
        assert!(outcome.into_value().is_empty());
    }

    #[tokio::test]
    async fn test_unwritable_path_reports_error() {
        let dir = tempdir().unwrap();
        // A directory where the file should be makes both read and write fail.
        let store = JsonFileStore::<Vec<u32>>::new(dir.path());

        assert!(store.save(&vec![1]).await.is_err());
        assert!(store.load().await.is_degraded());
    }
}
