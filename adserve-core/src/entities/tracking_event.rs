use compact_str::CompactString;
use std::collections::HashMap;
use time::OffsetDateTime;
use uuid::Uuid;

/// Kind of user interaction recorded against a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackingEventType {
    Impression,
    Click,
    Conversion,
}

impl TrackingEventType {
    pub fn as_str(self) -> &'static str {
        match self {
            TrackingEventType::Impression => "impression",
            TrackingEventType::Click => "click",
            TrackingEventType::Conversion => "conversion",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "impression" => Some(TrackingEventType::Impression),
            "click" => Some(TrackingEventType::Click),
            "conversion" => Some(TrackingEventType::Conversion),
            _ => None,
        }
    }
}

impl From<adserve_sdk::objects::TrackingEventType> for TrackingEventType {
    fn from(kind: adserve_sdk::objects::TrackingEventType) -> Self {
        use adserve_sdk::objects::TrackingEventType as Wire;
        match kind {
            Wire::Impression => TrackingEventType::Impression,
            Wire::Click => TrackingEventType::Click,
            Wire::Conversion => TrackingEventType::Conversion,
        }
    }
}

/// A recorded user interaction. Immutable once stored.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingEvent {
    pub event_type: TrackingEventType,
    pub line_item_id: Uuid,
    pub timestamp: OffsetDateTime,
    pub placement: CompactString,
    pub user_id: CompactString,
    pub metadata: HashMap<String, String>,
}

/// Event counts over a `(line_item?, placement?)` scope.
///
/// Derived on demand from the stored events; never persisted. An omitted
/// scope component means "all".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventCounts {
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
}

impl EventCounts {
    /// Add one event of the given type.
    pub fn record(&mut self, kind: TrackingEventType) {
        match kind {
            TrackingEventType::Impression => self.impressions += 1,
            TrackingEventType::Click => self.clicks += 1,
            TrackingEventType::Conversion => self.conversions += 1,
        }
    }
}
