use std::sync::Arc;

use axum::{Json, extract::Extension, response::IntoResponse};
use chrono::Utc;

use crate::app::services::AppState;

pub async fn index() -> impl IntoResponse {
    Json(serde_json::json!({
        "ok": true,
        "service": "item catalog api",
        "endpoints": { "items": "/items" },
    }))
}

pub async fn health(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
        "secondary_store": if state.secondary_configured { "configured" } else { "not configured" },
    }))
}
