//! Consistent error responses.
//!
//! Every error body carries a stable machine-checkable `error` code plus a
//! human-readable `message`. Primary-store failure detail is only exposed
//! when configured on (non-production contexts).

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use shelf_infra::ServiceError;

pub fn service_error_to_response(err: ServiceError, expose_detail: bool) -> axum::response::Response {
    match err {
        ServiceError::Validation(v) => json_error(StatusCode::BAD_REQUEST, v.code(), v.to_string()),
        ServiceError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "item not found"),
        ServiceError::StoreUnavailable(detail) => {
            tracing::error!(%detail, "primary store failure");
            let message = if expose_detail {
                detail
            } else {
                "catalog storage is unavailable".to_string()
            };
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_unavailable", message)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
