//! Secondary store: a best-effort, eventually-consistent mirror of items.
//!
//! The mirror is reconciled from the primary on every write/delete and is
//! never read to serve requests; it holds no lifecycle authority. Failures
//! here must never block or fail a catalog operation.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use shelf_core::{Item, ItemId};

use crate::error::StoreError;

/// Upsert-by-key / delete-by-key over a document store.
#[async_trait]
pub trait SecondaryStore: Send + Sync {
    async fn upsert(&self, item: Item) -> Result<(), StoreError>;
    async fn delete(&self, id: ItemId) -> Result<(), StoreError>;
}

/// In-memory mirror for tests and dev wiring.
///
/// `set_failing(true)` simulates an outage: every call fails until it is
/// switched back, which is how the dual-write policy is exercised in tests.
#[derive(Debug, Default)]
pub struct InMemorySecondaryStore {
    inner: Mutex<HashMap<ItemId, Item>>,
    failing: AtomicBool,
}

impl InMemorySecondaryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn get(&self, id: ItemId) -> Option<Item> {
        self.inner.lock().expect("secondary store lock").get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("secondary store lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_outage(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::backend("simulated secondary outage"));
        }
        Ok(())
    }
}

#[async_trait]
impl SecondaryStore for InMemorySecondaryStore {
    async fn upsert(&self, item: Item) -> Result<(), StoreError> {
        self.check_outage()?;
        self.inner
            .lock()
            .expect("secondary store lock")
            .insert(item.id, item);
        Ok(())
    }

    async fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        self.check_outage()?;
        self.inner.lock().expect("secondary store lock").remove(&id);
        Ok(())
    }
}

/// Redis-backed mirror: one JSON value per item under `shelf:item:{id}`.
///
/// Uses the blocking client inside `spawn_blocking`; the service already
/// detaches these calls from the request path, so latency here never blocks
/// a response.
#[cfg(feature = "redis")]
#[derive(Debug, Clone)]
pub struct RedisSecondaryStore {
    client: std::sync::Arc<redis::Client>,
    key_prefix: String,
}

#[cfg(feature = "redis")]
impl RedisSecondaryStore {
    pub fn connect(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url).map_err(|e| StoreError::backend(e.to_string()))?;
        Ok(Self {
            client: std::sync::Arc::new(client),
            key_prefix: "shelf:item:".to_string(),
        })
    }

    fn key(&self, id: ItemId) -> String {
        format!("{}{}", self.key_prefix, id)
    }
}

#[cfg(feature = "redis")]
#[async_trait]
impl SecondaryStore for RedisSecondaryStore {
    async fn upsert(&self, item: Item) -> Result<(), StoreError> {
        let client = self.client.clone();
        let key = self.key(item.id);
        let payload = serde_json::to_string(&item)?;
        tokio::task::spawn_blocking(move || -> Result<(), StoreError> {
            let mut conn = client
                .get_connection()
                .map_err(|e| StoreError::backend(e.to_string()))?;
            redis::cmd("SET")
                .arg(&key)
                .arg(&payload)
                .query::<()>(&mut conn)
                .map_err(|e| StoreError::backend(e.to_string()))
        })
        .await
        .map_err(|e| StoreError::backend(format!("secondary task join: {e}")))?
    }

    async fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        let client = self.client.clone();
        let key = self.key(id);
        tokio::task::spawn_blocking(move || -> Result<(), StoreError> {
            let mut conn = client
                .get_connection()
                .map_err(|e| StoreError::backend(e.to_string()))?;
            redis::cmd("DEL")
                .arg(&key)
                .query::<()>(&mut conn)
                .map_err(|e| StoreError::backend(e.to_string()))
        })
        .await
        .map_err(|e| StoreError::backend(format!("secondary task join: {e}")))?
    }
}
