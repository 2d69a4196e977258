use crate::entities::LineItem;
use rust_decimal::Decimal;
use time::OffsetDateTime;

const HOURS_PER_DAY: Decimal = Decimal::from_parts(24, 0, 0, false, 0);

/// Throttle a dynamic bid when the line item is spending ahead of its
/// intraday pro-rata budget.
///
/// `expected = (hour_of_day / 24) * daily_budget`; when `daily_spend` exceeds
/// that, the bid is scaled by `expected / daily_spend`. Items without a daily
/// budget are never paced. `now` must already carry the service's configured
/// pacing offset — `hour_of_day` is read straight from it, so the offset
/// decides where "midnight" falls.
pub fn pace(item: &LineItem, dynamic_bid: Decimal, now: OffsetDateTime) -> Decimal {
    if item.daily_budget.is_zero() {
        return dynamic_bid;
    }

    let expected_spend = Decimal::from(now.hour()) / HOURS_PER_DAY * item.daily_budget;
    if item.daily_spend > expected_spend {
        let reduce_factor = expected_spend / item.daily_spend;
        let adjusted = dynamic_bid * reduce_factor;
        tracing::info!(
            line_item_id = %item.id,
            original_bid = %dynamic_bid,
            adjusted_bid = %adjusted,
            daily_spend = %item.daily_spend,
            expected_spend = %expected_spend,
            "Pacing adjustment applied"
        );
        adjusted
    } else {
        dynamic_bid
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::entities::LineItemStatus;
    use time::{Date, Month, Time, UtcOffset};
    use uuid::Uuid;

    fn item(daily_budget: Decimal, daily_spend: Decimal) -> LineItem {
        let now = OffsetDateTime::UNIX_EPOCH;
        LineItem {
            id: Uuid::new_v4(),
            name: "item".into(),
            advertiser_id: "adv_1".into(),
            max_bid: Decimal::TWO,
            daily_budget,
            daily_spend,
            placement: "homepage_top".into(),
            categories: vec![],
            keywords: vec![],
            status: LineItemStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    fn at_hour(hour: u8) -> OffsetDateTime {
        let date = Date::from_calendar_date(2026, Month::August, 30).unwrap();
        let time = Time::from_hms(hour, 0, 0).unwrap();
        date.with_time(time).assume_offset(UtcOffset::UTC)
    }

    #[test]
    fn zero_budget_is_never_paced() {
        let li = item(Decimal::ZERO, Decimal::new(500, 0));
        assert_eq!(pace(&li, Decimal::TWO, at_hour(23)), Decimal::TWO);
    }

    #[test]
    fn on_pace_spend_is_untouched() {
        // At hour 12, expected spend is half the budget.
        let li = item(Decimal::new(1000, 0), Decimal::new(400, 0));
        assert_eq!(pace(&li, Decimal::TWO, at_hour(12)), Decimal::TWO);
    }

    #[test]
    fn ahead_of_pace_scales_the_bid_down() {
        // Expected at hour 12 is 500; spend of 800 scales the bid by 500/800.
        let li = item(Decimal::new(1000, 0), Decimal::new(800, 0));
        let paced = pace(&li, Decimal::TWO, at_hour(12));
        assert_eq!(paced, Decimal::new(125, 2));
        assert!(paced < Decimal::TWO);
    }

    #[test]
    fn midnight_expects_zero_spend() {
        // At hour 0, any spend at all is ahead of pace; expected is 0, so
        // the bid collapses to 0.
        let li = item(Decimal::new(1000, 0), Decimal::new(1, 2));
        assert_eq!(pace(&li, Decimal::TWO, at_hour(0)), Decimal::ZERO);
    }
}
