//! Store and service construction.

use std::sync::Arc;

use shelf_infra::{CollectionStore, ItemService, JsonFileStore, SecondaryStore, DEFAULT_IO_TIMEOUT};

use crate::config::AppConfig;

/// Shared per-process state handed to handlers via `Extension`.
pub struct AppState {
    pub items: Arc<ItemService>,
    pub expose_error_detail: bool,
    pub secondary_configured: bool,
}

pub fn build_services(config: &AppConfig) -> AppState {
    let primary: Arc<dyn CollectionStore> = Arc::new(JsonFileStore::new(&config.data_path));
    let secondary = build_secondary(config);
    let secondary_configured = secondary.is_some();

    AppState {
        items: Arc::new(ItemService::new(primary, secondary, DEFAULT_IO_TIMEOUT)),
        expose_error_detail: config.expose_error_detail,
        secondary_configured,
    }
}

/// A secondary-store outage at startup is not fatal: the catalog keeps
/// running on the primary store alone (mirroring is best-effort).
fn build_secondary(config: &AppConfig) -> Option<Arc<dyn SecondaryStore>> {
    let url = config.secondary_redis_url.as_deref()?;

    #[cfg(feature = "redis")]
    {
        match shelf_infra::RedisSecondaryStore::connect(url) {
            Ok(store) => Some(Arc::new(store)),
            Err(err) => {
                tracing::warn!(error = %err, "secondary store unavailable; running on the primary store only");
                None
            }
        }
    }

    #[cfg(not(feature = "redis"))]
    {
        tracing::warn!(
            url,
            "REDIS_URL is set but the redis feature is not enabled; ignoring the secondary store"
        );
        None
    }
}
