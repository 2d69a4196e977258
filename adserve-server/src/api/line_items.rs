use super::ApiError;
use crate::state::AppState;
use adserve_core::entities::LineItem;
use adserve_sdk::objects::{LineItemCreate, LineItemResponse};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

/// `POST /api/v1/line-items` — create a new line item.
pub(super) async fn create(
    State(state): State<AppState>,
    Json(body): Json<LineItemCreate>,
) -> Result<impl IntoResponse, ApiError> {
    validate_create(&body)?;

    let item = LineItem::from_create(body, time::OffsetDateTime::now_utc());
    state.line_items.create(item.clone()).await?;

    tracing::info!(
        id = %item.id,
        name = %item.name,
        advertiser_id = %item.advertiser_id,
        placement = %item.placement,
        "Line item created"
    );
    Ok((StatusCode::CREATED, Json(item.into_response())))
}

fn validate_create(body: &LineItemCreate) -> Result<(), ApiError> {
    if body.name.is_empty() {
        return Err(ApiError::Validation("name is required".into()));
    }
    if body.advertiser_id.is_empty() {
        return Err(ApiError::Validation("advertiser_id is required".into()));
    }
    if body.placement.is_empty() {
        return Err(ApiError::Validation("placement is required".into()));
    }
    if body.max_bid <= Decimal::ZERO {
        return Err(ApiError::Validation("max_bid must be greater than 0".into()));
    }
    if body.daily_budget <= Decimal::ZERO {
        return Err(ApiError::Validation(
            "daily_budget must be greater than 0".into(),
        ));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub(super) struct ListQuery {
    advertiser_id: Option<String>,
    placement: Option<String>,
}

/// `GET /api/v1/line-items` — list line items, optionally filtered.
pub(super) async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<LineItemResponse>>, ApiError> {
    let items = state
        .line_items
        .list(query.advertiser_id.as_deref(), query.placement.as_deref())
        .await?;
    Ok(Json(items.into_iter().map(LineItem::into_response).collect()))
}

/// `GET /api/v1/line-items/{id}` — fetch a single line item.
pub(super) async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LineItemResponse>, ApiError> {
    let item = state.line_items.get_by_id(id).await?;
    Ok(Json(item.into_response()))
}
