//! Infrastructure layer: the primary (authoritative) store, the best-effort
//! secondary mirror, and the item service that orchestrates validation,
//! primary writes, and secondary synchronization.

pub mod error;
pub mod primary;
pub mod secondary;
pub mod service;

pub use error::{ServiceError, StoreError};
pub use primary::{CollectionStore, InMemoryStore, JsonFileStore};
pub use secondary::{InMemorySecondaryStore, SecondaryStore};
#[cfg(feature = "redis")]
pub use secondary::RedisSecondaryStore;
pub use service::{ItemService, DEFAULT_IO_TIMEOUT};
