use compact_str::CompactString;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a line item.
///
/// Only `Active` line items take part in ad selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineItemStatus {
    Active,
    Paused,
    Completed,
}

/// Request payload for creating a new line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemCreate {
    pub name: CompactString,
    pub advertiser_id: CompactString,
    /// Maximum bid the advertiser is willing to pay. Must be > 0.
    pub max_bid: Decimal,
    /// Daily budget ceiling. Must be > 0.
    pub daily_budget: Decimal,
    pub placement: CompactString,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Full line item representation returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemResponse {
    pub id: Uuid,
    pub name: CompactString,
    pub advertiser_id: CompactString,
    pub max_bid: Decimal,
    pub daily_budget: Decimal,
    pub daily_spend: Decimal,
    pub placement: CompactString,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    pub status: LineItemStatus,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}
