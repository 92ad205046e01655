//! Primary store: whole-document persistence for the item catalog.
//!
//! The primary store is authoritative and synchronous on the request path.
//! It reads and writes the full `{"items": [...]}` document; per-item access
//! is the service's job.

use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use shelf_core::Catalog;

use crate::error::StoreError;

/// Whole-document read/write over durable storage.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    async fn read(&self) -> Result<Catalog, StoreError>;
    async fn write(&self, catalog: &Catalog) -> Result<(), StoreError>;
}

/// JSON file on disk, one document per catalog.
///
/// A missing file is not an error: the first read materializes an empty
/// catalog on disk and returns it.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Put an empty document on disk after a NotFound read.
    ///
    /// Uses create-new rather than the rename in `write`: if another writer
    /// created the file between the failed read and this call, its document
    /// is authoritative and is returned untouched.
    async fn materialize_empty(&self) -> Result<Catalog, StoreError> {
        let catalog = Catalog::default();
        let bytes = serde_json::to_vec_pretty(&catalog)?;
        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .await
        {
            Ok(mut file) => {
                file.write_all(&bytes).await?;
                Ok(catalog)
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                let bytes = tokio::fs::read(&self.path).await?;
                Ok(serde_json::from_slice(&bytes)?)
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl CollectionStore for JsonFileStore {
    async fn read(&self) -> Result<Catalog, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => self.materialize_empty().await,
            Err(err) => Err(err.into()),
        }
    }

    async fn write(&self, catalog: &Catalog) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(catalog)?;
        // Write-then-rename: a failed write leaves the previous document
        // intact, so the caller either sees the full update or the prior
        // state.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// In-memory primary store for tests and dev wiring.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: Mutex<Catalog>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CollectionStore for InMemoryStore {
    async fn read(&self) -> Result<Catalog, StoreError> {
        Ok(self.inner.lock().expect("primary store lock").clone())
    }

    async fn write(&self, catalog: &Catalog) -> Result<(), StoreError> {
        *self.inner.lock().expect("primary store lock") = catalog.clone();
        Ok(())
    }
}
