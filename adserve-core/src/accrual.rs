//! Tracking ingestion and spend accrual.
//!
//! Each tracked event charges the line item a CPM-style unit cost
//! (`stored max_bid / 1000`) against its daily budget. The increment goes
//! through [`LineItemStore::increase_daily_spend`], which is atomic at the
//! storage layer, so concurrent tracking calls on the same line item never
//! lose updates.

use crate::entities::{TrackingEvent, TrackingEventType};
use crate::store::{LineItemStore, StoreError, TrackingStore};
use adserve_sdk::objects::TrackEventRequest;
use std::sync::Arc;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

/// Errors surfaced by event tracking.
#[derive(Debug, Error)]
pub enum TrackError {
    /// The event references a line item that does not exist. Surfaced
    /// distinctly so the HTTP layer can answer 404 instead of 500.
    #[error("line item not found: {0}")]
    LineItemNotFound(Uuid),

    /// Underlying storage failure.
    #[error(transparent)]
    Store(StoreError),
}

/// Records tracking events and accrues spend.
#[derive(Clone)]
pub struct TrackingService {
    line_items: Arc<dyn LineItemStore>,
    tracking: Arc<dyn TrackingStore>,
}

impl TrackingService {
    pub fn new(line_items: Arc<dyn LineItemStore>, tracking: Arc<dyn TrackingStore>) -> Self {
        Self {
            line_items,
            tracking,
        }
    }

    /// Record one tracking event.
    ///
    /// Resolves the line item, accrues `max_bid / 1000` against its daily
    /// spend, and persists the event. A missing timestamp defaults to now.
    pub async fn track(&self, request: TrackEventRequest) -> Result<(), TrackError> {
        tracing::info!(
            event_type = ?request.event_type,
            line_item_id = %request.line_item_id,
            "Tracking event"
        );

        let item = self
            .line_items
            .get_by_id(request.line_item_id)
            .await
            .map_err(|err| match err {
                StoreError::NotFound(id) => TrackError::LineItemNotFound(id),
                other => TrackError::Store(other),
            })?;

        let event = TrackingEvent {
            event_type: TrackingEventType::from(request.event_type),
            line_item_id: item.id,
            timestamp: request
                .timestamp
                .unwrap_or_else(OffsetDateTime::now_utc),
            placement: request.placement.unwrap_or_default(),
            user_id: request.user_id.unwrap_or_default(),
            metadata: request.metadata,
        };

        // Every event type in the closed set accrues spend against the
        // stored base bid.
        let cost = item.max_bid / rust_decimal::Decimal::ONE_THOUSAND;
        self.line_items
            .increase_daily_spend(item.id, cost)
            .await
            .map_err(TrackError::Store)?;

        self.tracking.store(event).await.map_err(TrackError::Store)
    }

    /// Event counts for a `(line_item?, placement?)` scope.
    pub async fn event_counts(
        &self,
        line_item_id: Option<Uuid>,
        placement: Option<&str>,
    ) -> Result<crate::entities::EventCounts, StoreError> {
        self.tracking.count_events(line_item_id, placement).await
    }
}
