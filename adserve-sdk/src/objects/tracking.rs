use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Kind of user interaction being tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackingEventType {
    Impression,
    Click,
    Conversion,
}

/// Request payload for `POST /api/v1/tracking`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackEventRequest {
    pub event_type: TrackingEventType,
    pub line_item_id: Uuid,
    /// When the event happened. Defaults to the server's current time.
    #[serde(default)]
    pub timestamp: Option<time::OffsetDateTime>,
    #[serde(default)]
    pub placement: Option<CompactString>,
    #[serde(default)]
    pub user_id: Option<CompactString>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}
