use compact_str::CompactString;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A winning advertisement as returned by `GET /api/v1/ads`.
///
/// `bid` is the served bid: the performance-adjusted, pacing-adjusted value
/// used for ranking, not the line item's stored maximum bid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ad {
    pub id: Uuid,
    pub name: CompactString,
    pub advertiser_id: CompactString,
    pub bid: Decimal,
    pub placement: CompactString,
    pub serve_url: String,
}
