use super::rate::{MIN_IMPRESSION_THRESHOLD, RateMetric, rate_with_fallbacks};
use crate::entities::EventCounts;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

/// Bid multiplier applied when there is no market baseline at all (0.5).
pub const FALLBACK_MULTIPLIER: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Floor multiplier for poor performers (0.3).
pub const MIN_BID_MULTIPLIER: Decimal = Decimal::from_parts(3, 0, 0, false, 1);

/// A campaign rate at or above `2.0 x baseline` earns the full bid.
pub const HIGH_PERFORMANCE_FACTOR: f64 = 2.0;

/// A campaign rate at or below `0.5 x baseline` earns the floor bid.
pub const LOW_PERFORMANCE_FACTOR: f64 = 0.5;

/// Compute the performance-adjusted bid for one line item.
///
/// Pure function: `max_bid` is the advertiser's stored base bid and is never
/// modified; the result always lies in `[0.3 * max_bid, max_bid]` (or is the
/// half-bid fallback when no baseline exists).
pub fn dynamic_bid(max_bid: Decimal, campaign_rate: f64, baseline_rate: f64) -> Decimal {
    if baseline_rate == 0.0 {
        return max_bid * FALLBACK_MULTIPLIER;
    }

    let high = HIGH_PERFORMANCE_FACTOR * baseline_rate;
    let low = LOW_PERFORMANCE_FACTOR * baseline_rate;

    if campaign_rate >= high {
        return max_bid;
    }
    let min_bid = max_bid * MIN_BID_MULTIPLIER;
    if campaign_rate <= low {
        return min_bid;
    }

    // Linear interpolation between the floor bid and the full bid. The ratio
    // is strictly inside (0, 1) here, so the f64 -> Decimal conversion
    // cannot fail in practice.
    let ratio = (campaign_rate - low) / (high - low);
    let ratio = Decimal::from_f64(ratio).unwrap_or(Decimal::ZERO);
    min_bid + ratio * (max_bid - min_bid)
}

/// A bid strategy turns a line item's base bid and the event aggregates of
/// its surrounding scopes into a dynamic bid.
///
/// The campaign rate uses the full fallback hierarchy, most specific first:
/// `[item+placement, item, placement, global]`. The market baseline uses
/// only `[placement, global]`, so a line item is never compared against its
/// own history.
pub trait BidStrategy {
    /// Event type the strategy scores on.
    fn metric(&self) -> RateMetric;

    fn calculate(
        &self,
        max_bid: Decimal,
        global: EventCounts,
        placement: EventCounts,
        item: EventCounts,
        item_placement: EventCounts,
    ) -> Decimal {
        let metric = self.metric();
        let campaign_rate = rate_with_fallbacks(
            &[item_placement, item, placement, global],
            MIN_IMPRESSION_THRESHOLD,
            metric,
        );
        let baseline_rate =
            rate_with_fallbacks(&[placement, global], MIN_IMPRESSION_THRESHOLD, metric);
        dynamic_bid(max_bid, campaign_rate, baseline_rate)
    }
}

/// Conversion-rate strategy. This is the variant active in ad selection.
pub struct ConversionRateStrategy;

impl BidStrategy for ConversionRateStrategy {
    fn metric(&self) -> RateMetric {
        RateMetric::Conversions
    }
}

/// Click-through-rate strategy, identical in shape to the conversion-rate
/// strategy but scored on clicks.
pub struct ClickThroughRateStrategy;

impl BidStrategy for ClickThroughRateStrategy {
    fn metric(&self) -> RateMetric {
        RateMetric::Clicks
    }
}
