//! Storage contracts for line items and tracking events.
//!
//! The stores are the only owners of persisted state. Every method hands out
//! owned values, and the only mutation entry points for `daily_spend` are
//! [`LineItemStore::increase_daily_spend`] and
//! [`LineItemStore::reset_all_daily_spend`], both of which are atomic
//! read-modify-writes at the storage layer. Callers must never read a record,
//! adjust spend in process memory, and write the record back.

mod memory;
mod postgres;

pub use memory::{MemoryLineItemStore, MemoryTrackingStore};
pub use postgres::{PostgresLineItemStore, PostgresTrackingStore};

use crate::entities::{EventCounts, LineItem, TrackingEvent};
use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by the stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced line item does not exist.
    #[error("line item not found: {0}")]
    NotFound(Uuid),

    /// A line item with this id already exists.
    #[error("line item already exists: {0}")]
    AlreadyExists(Uuid),

    /// Underlying persistence failure. Not retried here; the caller decides.
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Persistence contract for line items.
#[async_trait]
pub trait LineItemStore: Send + Sync {
    /// Insert a new line item.
    async fn create(&self, item: LineItem) -> Result<(), StoreError>;

    /// Fetch a line item by id.
    async fn get_by_id(&self, id: Uuid) -> Result<LineItem, StoreError>;

    /// List line items, optionally filtered by advertiser and placement.
    async fn list(
        &self,
        advertiser_id: Option<&str>,
        placement: Option<&str>,
    ) -> Result<Vec<LineItem>, StoreError>;

    /// Find line items eligible for the given placement and filters.
    ///
    /// Eligibility: `status == active`, exact placement equality, and
    /// case-insensitive membership for each present category / keyword
    /// filter. No ordering guarantee; an empty result is not an error.
    async fn find_eligible(
        &self,
        placement: &str,
        category: Option<&str>,
        keyword: Option<&str>,
    ) -> Result<Vec<LineItem>, StoreError>;

    /// Atomically add `amount` to the item's `daily_spend`.
    async fn increase_daily_spend(&self, id: Uuid, amount: Decimal) -> Result<(), StoreError>;

    /// Zero `daily_spend` for every item where it is positive, as a single
    /// conditional bulk update. Returns the number of affected items.
    async fn reset_all_daily_spend(&self) -> Result<u64, StoreError>;
}

/// Persistence contract for tracking events.
#[async_trait]
pub trait TrackingStore: Send + Sync {
    /// Append an event. Events are immutable once stored.
    async fn store(&self, event: TrackingEvent) -> Result<(), StoreError>;

    /// Return all stored events.
    async fn find_all(&self) -> Result<Vec<TrackingEvent>, StoreError>;

    /// Count events in the `(line_item?, placement?)` scope. An omitted
    /// component means "all".
    async fn count_events(
        &self,
        line_item_id: Option<Uuid>,
        placement: Option<&str>,
    ) -> Result<EventCounts, StoreError>;
}
