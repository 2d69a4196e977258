//! Domain entities.
//!
//! Entities are plain owned values. Stores hand out clones of their records,
//! never references into their internal collections, so nothing outside a
//! store can mutate persisted state as a side effect.

pub mod line_item;
pub mod tracking_event;

pub use line_item::{LineItem, LineItemStatus};
pub use tracking_event::{EventCounts, TrackingEvent, TrackingEventType};
