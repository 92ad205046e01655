//! Item service: validation, primary read-modify-write, and best-effort
//! secondary synchronization.
//!
//! Dual-write policy: the primary store is authoritative and synchronous —
//! its failure aborts the operation and is reported to the caller. Secondary
//! syncs run off the request path through a single background worker that
//! applies them in primary commit order; their failure is recorded and never
//! changes the response already determined by the primary result.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc};
use tokio::time::timeout;

use shelf_core::validate::{validate_identifier, validate_new_item, validate_patch};
use shelf_core::{Catalog, Item, ItemId, ItemInput};

use crate::error::ServiceError;
use crate::primary::CollectionStore;
use crate::secondary::SecondaryStore;

/// Bound on every store call; expiry surfaces as `StoreUnavailable`.
pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(5);

enum SecondarySync {
    Upsert(Item),
    Delete(ItemId),
}

/// CRUD operations over the item catalog.
///
/// The secondary store is explicit construction-time configuration: `None`
/// disables mirroring entirely (no env-driven globals).
pub struct ItemService {
    primary: Arc<dyn CollectionStore>,
    secondary_tx: Option<mpsc::UnboundedSender<SecondarySync>>,
    io_timeout: Duration,
    // Serializes the read-modify-write cycle over the whole collection so
    // concurrent writers cannot silently drop each other's changes.
    write_lock: Mutex<()>,
}

impl ItemService {
    pub fn new(
        primary: Arc<dyn CollectionStore>,
        secondary: Option<Arc<dyn SecondaryStore>>,
        io_timeout: Duration,
    ) -> Self {
        let secondary_tx = secondary.map(|store| spawn_secondary_worker(store, io_timeout));
        Self {
            primary,
            secondary_tx,
            io_timeout,
            write_lock: Mutex::new(()),
        }
    }

    /// Full catalog, in insertion order.
    pub async fn list(&self) -> Result<Vec<Item>, ServiceError> {
        Ok(self.read_catalog().await?.items)
    }

    /// Look up a single item by its (validated) identifier.
    pub async fn get(&self, raw_id: &str) -> Result<Item, ServiceError> {
        let id = validate_identifier(raw_id)?;
        let catalog = self.read_catalog().await?;
        catalog
            .find(id)
            .cloned()
            .ok_or(ServiceError::NotFound)
    }

    /// Validate all fields, append a fresh item, persist, mirror.
    pub async fn create(&self, input: ItemInput) -> Result<Item, ServiceError> {
        let fields = validate_new_item(&input)?;
        let item = Item {
            id: ItemId::new(),
            name: fields.name,
            description: fields.description,
            price: fields.price,
        };

        let guard = self.write_lock.lock().await;
        let mut catalog = self.read_catalog().await?;
        catalog.items.push(item.clone());
        self.write_catalog(&catalog).await?;
        self.enqueue_secondary_sync(SecondarySync::Upsert(item.clone()));
        drop(guard);

        Ok(item)
    }

    /// Merge the validated present fields onto an existing item. Fields
    /// omitted from the input are left untouched.
    pub async fn update(&self, raw_id: &str, input: ItemInput) -> Result<Item, ServiceError> {
        let id = validate_identifier(raw_id)?;
        let patch = validate_patch(&input)?;

        let guard = self.write_lock.lock().await;
        let mut catalog = self.read_catalog().await?;
        let pos = catalog.position(id).ok_or(ServiceError::NotFound)?;
        patch.apply_to(&mut catalog.items[pos]);
        let updated = catalog.items[pos].clone();
        self.write_catalog(&catalog).await?;
        self.enqueue_secondary_sync(SecondarySync::Upsert(updated.clone()));
        drop(guard);

        Ok(updated)
    }

    /// Remove an item and return it.
    pub async fn remove(&self, raw_id: &str) -> Result<Item, ServiceError> {
        let id = validate_identifier(raw_id)?;

        let guard = self.write_lock.lock().await;
        let mut catalog = self.read_catalog().await?;
        let pos = catalog.position(id).ok_or(ServiceError::NotFound)?;
        let removed = catalog.items.remove(pos);
        self.write_catalog(&catalog).await?;
        self.enqueue_secondary_sync(SecondarySync::Delete(removed.id));
        drop(guard);

        Ok(removed)
    }

    async fn read_catalog(&self) -> Result<Catalog, ServiceError> {
        timeout(self.io_timeout, self.primary.read())
            .await
            .map_err(|_| ServiceError::StoreUnavailable("primary read timed out".to_string()))?
            .map_err(ServiceError::from)
    }

    async fn write_catalog(&self, catalog: &Catalog) -> Result<(), ServiceError> {
        timeout(self.io_timeout, self.primary.write(catalog))
            .await
            .map_err(|_| ServiceError::StoreUnavailable("primary write timed out".to_string()))?
            .map_err(ServiceError::from)
    }

    /// Queue a mirror sync off the request path. Callers enqueue while
    /// still holding the write lock, so the queue order is the primary's
    /// commit order.
    fn enqueue_secondary_sync(&self, sync: SecondarySync) {
        if let Some(tx) = &self.secondary_tx {
            let _ = tx.send(sync);
        }
    }
}

/// Single worker draining the sync queue in order, one mirror call at a
/// time. Failure and timeout are logged, never surfaced; the worker exits
/// when the service is dropped.
fn spawn_secondary_worker(
    secondary: Arc<dyn SecondaryStore>,
    io_timeout: Duration,
) -> mpsc::UnboundedSender<SecondarySync> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Some(sync) = rx.recv().await {
            let (op, id, result) = match sync {
                SecondarySync::Upsert(item) => {
                    let id = item.id;
                    ("upsert", id, timeout(io_timeout, secondary.upsert(item)).await)
                }
                SecondarySync::Delete(id) => {
                    ("delete", id, timeout(io_timeout, secondary.delete(id)).await)
                }
            };
            match result {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    tracing::warn!(item_id = %id, op, error = %err, "secondary store sync failed");
                }
                Err(_) => {
                    tracing::warn!(item_id = %id, op, "secondary store sync timed out");
                }
            }
        }
    });
    tx
}
