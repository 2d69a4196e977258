//! HTTP API handlers.
//!
//! # Endpoints
//!
//! - `POST /api/v1/line-items`      – create a line item
//! - `GET  /api/v1/line-items`      – list line items
//! - `GET  /api/v1/line-items/{id}` – fetch a line item
//! - `GET  /api/v1/ads`             – select winning ads for a placement
//! - `POST /api/v1/tracking`        – record a tracking event

use crate::state::AppState;
use adserve_core::store::StoreError;
use adserve_sdk::objects::ErrorResponse;
use axum::{
    Json, Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

mod ads;
mod line_items;
mod tracking;

/// Build the `/api/v1` router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/line-items",
            post(line_items::create).get(line_items::list),
        )
        .route("/line-items/{id}", get(line_items::get_by_id))
        .route("/ads", get(ads::get_winning_ads))
        .route("/tracking", post(tracking::track_event))
}

// ---------------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------------

/// Errors that can occur in API handlers.
#[derive(Debug)]
pub(super) enum ApiError {
    /// A storage operation failed.
    Storage(StoreError),
    /// The requested resource does not exist.
    NotFound(&'static str),
    /// The request payload or query parameters are invalid.
    Validation(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound("line item not found"),
            other => ApiError::Storage(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message, details) = match self {
            ApiError::Storage(e) => {
                tracing::error!(error = %e, "API storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                    None,
                )
            }
            ApiError::NotFound(what) => (StatusCode::NOT_FOUND, what.to_string(), None),
            ApiError::Validation(reason) => (
                StatusCode::BAD_REQUEST,
                "invalid request parameters".to_string(),
                Some(reason),
            ),
        };
        (
            status,
            Json(ErrorResponse {
                code: status.as_u16(),
                message,
                details,
            }),
        )
            .into_response()
    }
}
