//! Application state shared across all request handlers.

use adserve_core::accrual::TrackingService;
use adserve_core::selection::AdSelector;
use adserve_core::store::{LineItemStore, TrackingStore};
use std::sync::Arc;
use time::UtcOffset;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Line item persistence, also used directly by the CRUD handlers.
    pub line_items: Arc<dyn LineItemStore>,
    /// The ad selection pipeline.
    pub selector: AdSelector,
    /// Tracking ingestion and spend accrual.
    pub tracking: TrackingService,
}

impl AppState {
    /// Wire the services over the given stores.
    pub fn new(
        line_items: Arc<dyn LineItemStore>,
        tracking_store: Arc<dyn TrackingStore>,
        pacing_offset: UtcOffset,
    ) -> Self {
        let selector = AdSelector::new(line_items.clone(), tracking_store.clone(), pacing_offset);
        let tracking = TrackingService::new(line_items.clone(), tracking_store);
        Self {
            line_items,
            selector,
            tracking,
        }
    }
}
