//! Wire-level objects of the adserve HTTP API.
//!
//! These types define the JSON payloads exchanged with the server. They are
//! deliberately separate from the domain entities in `adserve-core`: the
//! server maps between the two at its API boundary.

pub mod ad;
pub mod line_item;
pub mod tracking;

pub use ad::Ad;
pub use line_item::{LineItemCreate, LineItemResponse, LineItemStatus};
pub use tracking::{TrackEventRequest, TrackingEventType};

use serde::{Deserialize, Serialize};

/// JSON error body returned by all API endpoints on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status code, repeated in the body.
    pub code: u16,
    /// Human-readable error message.
    pub message: String,
    /// Optional extra detail (e.g. the offending field).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
