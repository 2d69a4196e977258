use super::ApiError;
use crate::state::AppState;
use adserve_sdk::objects::Ad;
use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

const DEFAULT_LIMIT: usize = 1;
const MAX_LIMIT: usize = adserve_core::selection::MAX_WINNING_ADS;

#[derive(Debug, Deserialize)]
pub(super) struct AdQuery {
    placement: Option<String>,
    category: Option<String>,
    keyword: Option<String>,
    limit: Option<usize>,
}

/// `GET /api/v1/ads` — select the winning ads for a placement.
pub(super) async fn get_winning_ads(
    State(state): State<AppState>,
    Query(query): Query<AdQuery>,
) -> Result<Json<Vec<Ad>>, ApiError> {
    let placement = match query.placement.as_deref() {
        Some(p) if !p.is_empty() => p,
        _ => return Err(ApiError::Validation("placement is required".into())),
    };
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    if limit < 1 || limit > MAX_LIMIT {
        return Err(ApiError::Validation(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }

    let ads = state
        .selector
        .winning_ads(
            placement,
            non_empty(query.category.as_deref()),
            non_empty(query.keyword.as_deref()),
            limit,
        )
        .await?;

    Ok(Json(
        ads.into_iter()
            .map(|ad| Ad {
                id: ad.id,
                name: ad.name,
                advertiser_id: ad.advertiser_id,
                bid: ad.served_bid,
                placement: ad.placement,
                serve_url: ad.serve_url,
            })
            .collect(),
    ))
}

/// An empty filter string means "no filter".
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
