//! In-memory store implementations.
//!
//! Used by tests and by deployments that do not need durability. Records are
//! owned exclusively by the store behind a `tokio::sync::RwLock`; reads
//! return clones, so callers can never alias the stored records. Spend
//! mutation happens inside the write lock, which makes
//! `increase_daily_spend` an atomic read-modify-write with respect to both
//! concurrent accruals and the daily reset.

use super::{LineItemStore, StoreError, TrackingStore};
use crate::entities::{EventCounts, LineItem, TrackingEvent};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory [`LineItemStore`].
#[derive(Default)]
pub struct MemoryLineItemStore {
    items: RwLock<HashMap<Uuid, LineItem>>,
}

impl MemoryLineItemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LineItemStore for MemoryLineItemStore {
    async fn create(&self, item: LineItem) -> Result<(), StoreError> {
        let mut items = self.items.write().await;
        if items.contains_key(&item.id) {
            return Err(StoreError::AlreadyExists(item.id));
        }
        items.insert(item.id, item);
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<LineItem, StoreError> {
        let items = self.items.read().await;
        items.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn list(
        &self,
        advertiser_id: Option<&str>,
        placement: Option<&str>,
    ) -> Result<Vec<LineItem>, StoreError> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .filter(|item| advertiser_id.is_none_or(|a| item.advertiser_id == a))
            .filter(|item| placement.is_none_or(|p| item.placement == p))
            .cloned()
            .collect())
    }

    async fn find_eligible(
        &self,
        placement: &str,
        category: Option<&str>,
        keyword: Option<&str>,
    ) -> Result<Vec<LineItem>, StoreError> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .filter(|item| item.matches(placement, category, keyword))
            .cloned()
            .collect())
    }

    async fn increase_daily_spend(&self, id: Uuid, amount: Decimal) -> Result<(), StoreError> {
        let mut items = self.items.write().await;
        let item = items.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        item.daily_spend += amount;
        Ok(())
    }

    async fn reset_all_daily_spend(&self) -> Result<u64, StoreError> {
        let mut items = self.items.write().await;
        let mut affected = 0;
        for item in items.values_mut() {
            if item.daily_spend > Decimal::ZERO {
                item.daily_spend = Decimal::ZERO;
                affected += 1;
            }
        }
        Ok(affected)
    }
}

/// In-memory [`TrackingStore`].
#[derive(Default)]
pub struct MemoryTrackingStore {
    events: RwLock<Vec<TrackingEvent>>,
}

impl MemoryTrackingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TrackingStore for MemoryTrackingStore {
    async fn store(&self, event: TrackingEvent) -> Result<(), StoreError> {
        let mut events = self.events.write().await;
        events.push(event);
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<TrackingEvent>, StoreError> {
        let events = self.events.read().await;
        Ok(events.clone())
    }

    async fn count_events(
        &self,
        line_item_id: Option<Uuid>,
        placement: Option<&str>,
    ) -> Result<EventCounts, StoreError> {
        let events = self.events.read().await;
        let mut counts = EventCounts::default();
        for event in events.iter() {
            if line_item_id.is_none_or(|id| event.line_item_id == id)
                && placement.is_none_or(|p| event.placement == p)
            {
                counts.record(event.event_type);
            }
        }
        Ok(counts)
    }
}
