//! Bid scoring: performance-rate estimation, dynamic bid calculation, and
//! budget pacing.
//!
//! All functions here are pure with respect to persisted state. The scoring
//! pipeline computes a derived bid and carries it alongside the line item;
//! the stored `max_bid` is never written to.

pub mod pacing;
pub mod rate;
pub mod strategy;

pub use pacing::pace;
pub use rate::{MIN_IMPRESSION_THRESHOLD, RateMetric, rate_with_fallbacks};
pub use strategy::{
    BidStrategy, ClickThroughRateStrategy, ConversionRateStrategy, dynamic_bid,
};
