use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use crate::app::services::AppState;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/:id", get(get_item).put(update_item).delete(delete_item))
}

pub async fn list_items(Extension(state): Extension<Arc<AppState>>) -> axum::response::Response {
    match state.items.list().await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(err) => errors::service_error_to_response(err, state.expose_error_detail),
    }
}

pub async fn get_item(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match state.items.get(&id).await {
        Ok(item) => (StatusCode::OK, Json(item)).into_response(),
        Err(err) => errors::service_error_to_response(err, state.expose_error_detail),
    }
}

pub async fn create_item(
    Extension(state): Extension<Arc<AppState>>,
    Json(body): Json<dto::ItemInput>,
) -> axum::response::Response {
    match state.items.create(body).await {
        Ok(item) => (StatusCode::CREATED, Json(item)).into_response(),
        Err(err) => errors::service_error_to_response(err, state.expose_error_detail),
    }
}

pub async fn update_item(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<dto::ItemInput>,
) -> axum::response::Response {
    match state.items.update(&id, body).await {
        Ok(item) => (StatusCode::OK, Json(item)).into_response(),
        Err(err) => errors::service_error_to_response(err, state.expose_error_detail),
    }
}

pub async fn delete_item(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match state.items.remove(&id).await {
        Ok(removed) => (StatusCode::OK, Json(dto::removed_to_json(&removed))).into_response(),
        Err(err) => errors::service_error_to_response(err, state.expose_error_detail),
    }
}
