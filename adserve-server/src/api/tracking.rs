use super::ApiError;
use crate::state::AppState;
use adserve_core::accrual::TrackError;
use adserve_sdk::objects::TrackEventRequest;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

/// `POST /api/v1/tracking` — record a tracking event and accrue spend.
pub(super) async fn track_event(
    State(state): State<AppState>,
    Json(body): Json<TrackEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.tracking.track(body).await.map_err(|err| match err {
        TrackError::LineItemNotFound(_) => ApiError::NotFound("line item not found"),
        TrackError::Store(store_err) => ApiError::Storage(store_err),
    })?;

    Ok((
        StatusCode::ACCEPTED,
        Json(serde_json::json!({ "success": true })),
    ))
}
