//! BudgetResetJob processor.
//!
//! The BudgetResetJob is responsible for:
//! - Sleeping until the next midnight in the configured pacing offset
//! - Zeroing `daily_spend` for every line item that spent anything, via the
//!   store's single conditional bulk update
//! - Logging and swallowing failures so the loop keeps ticking
//! - Shutting down when the shutdown signal fires
//!
//! The reset races benignly with spend accrual: both go through the store's
//! atomic spend primitives, so an increment landing around midnight is
//! either included in the reset or survives into the new day, but is never
//! applied to stale state and overwritten.

use crate::store::{LineItemStore, StoreError};
use std::sync::Arc;
use time::{Duration as TimeDuration, OffsetDateTime, UtcOffset};
use tokio::sync::watch;
use tracing::{error, info};

/// Fallback sleep when the next midnight cannot be computed (calendar edge).
const RETRY_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60 * 60);

/// Zeroes all daily spend once per calendar day at local midnight.
pub struct BudgetResetJob {
    line_items: Arc<dyn LineItemStore>,
    pacing_offset: UtcOffset,
}

impl BudgetResetJob {
    pub fn new(line_items: Arc<dyn LineItemStore>, pacing_offset: UtcOffset) -> Self {
        Self {
            line_items,
            pacing_offset,
        }
    }

    /// Run until shutdown is signaled.
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) {
        info!("BudgetResetJob started");

        loop {
            let sleep_duration = self.until_next_midnight(OffsetDateTime::now_utc());

            tokio::select! {
                biased;

                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("BudgetResetJob received shutdown signal");
                        break;
                    }
                }

                _ = tokio::time::sleep(sleep_duration) => {
                    // A failure is retried on the next tick; it must never
                    // take down request serving.
                    if let Err(e) = self.reset_once().await {
                        error!(error = %e, "Daily budget reset failed");
                    }
                }
            }
        }

        info!("BudgetResetJob shutdown complete");
    }

    /// Perform one reset pass. Idempotent: a second run in succession
    /// affects zero items and leaves every `daily_spend` at zero.
    pub async fn reset_once(&self) -> Result<u64, StoreError> {
        info!("Starting daily budget reset");
        let affected = self.line_items.reset_all_daily_spend().await?;
        info!(affected, "Daily budget reset complete");
        Ok(affected)
    }

    /// Time to sleep from `now_utc` until the next midnight in the pacing
    /// offset.
    fn until_next_midnight(&self, now_utc: OffsetDateTime) -> std::time::Duration {
        let local = now_utc.to_offset(self.pacing_offset);
        let Some(next_day) = local.date().next_day() else {
            return RETRY_INTERVAL;
        };
        let next_midnight = next_day.midnight().assume_offset(self.pacing_offset);
        let remaining = next_midnight - local;
        if remaining <= TimeDuration::ZERO {
            return RETRY_INTERVAL;
        }
        std::time::Duration::try_from(remaining).unwrap_or(RETRY_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::entities::{LineItem, LineItemStatus};
    use crate::store::MemoryLineItemStore;
    use rust_decimal::Decimal;
    use time::{Date, Month, Time};
    use uuid::Uuid;

    fn item(daily_spend: Decimal) -> LineItem {
        let now = OffsetDateTime::UNIX_EPOCH;
        LineItem {
            id: Uuid::new_v4(),
            name: "item".into(),
            advertiser_id: "adv_1".into(),
            max_bid: Decimal::TWO,
            daily_budget: Decimal::new(1000, 0),
            daily_spend,
            placement: "homepage_top".into(),
            categories: vec![],
            keywords: vec![],
            status: LineItemStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn reset_zeroes_spend_and_is_idempotent() {
        let store = Arc::new(MemoryLineItemStore::new());
        let spent = item(Decimal::new(42, 0));
        let untouched = item(Decimal::ZERO);
        let spent_id = spent.id;
        store.create(spent).await.unwrap();
        store.create(untouched).await.unwrap();

        let job = BudgetResetJob::new(store.clone(), UtcOffset::UTC);
        assert_eq!(job.reset_once().await.unwrap(), 1);
        assert_eq!(
            store.get_by_id(spent_id).await.unwrap().daily_spend,
            Decimal::ZERO
        );
        assert_eq!(job.reset_once().await.unwrap(), 0);
        assert_eq!(
            store.get_by_id(spent_id).await.unwrap().daily_spend,
            Decimal::ZERO
        );
    }

    #[tokio::test]
    async fn sleeps_until_the_next_local_midnight() {
        let store = Arc::new(MemoryLineItemStore::new());
        let job = BudgetResetJob::new(store, UtcOffset::UTC);

        let date = Date::from_calendar_date(2026, Month::August, 30).unwrap();
        let now = date
            .with_time(Time::from_hms(22, 0, 0).unwrap())
            .assume_offset(UtcOffset::UTC);
        assert_eq!(
            job.until_next_midnight(now),
            std::time::Duration::from_secs(2 * 60 * 60)
        );
    }

    #[tokio::test]
    async fn pacing_offset_moves_midnight() {
        let store = Arc::new(MemoryLineItemStore::new());
        let offset = UtcOffset::from_hms(2, 0, 0).unwrap();
        let job = BudgetResetJob::new(store, offset);

        // 23:00 UTC is 01:00 at +02:00, so the next local midnight is 23
        // hours away.
        let date = Date::from_calendar_date(2026, Month::August, 30).unwrap();
        let now = date
            .with_time(Time::from_hms(23, 0, 0).unwrap())
            .assume_offset(UtcOffset::UTC);
        assert_eq!(
            job.until_next_midnight(now),
            std::time::Duration::from_secs(23 * 60 * 60)
        );
    }

    #[tokio::test]
    async fn reset_interleaved_with_accrual_keeps_spend_consistent() {
        let store = Arc::new(MemoryLineItemStore::new());
        let li = item(Decimal::ZERO);
        let id = li.id;
        store.create(li).await.unwrap();

        let job = BudgetResetJob::new(store.clone(), UtcOffset::UTC);
        let cost = Decimal::new(25, 4);

        let accruals: Vec<_> = (0..20)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.increase_daily_spend(id, cost).await })
            })
            .collect();
        for task in accruals {
            task.await.unwrap().unwrap();
        }
        job.reset_once().await.unwrap();

        // Increments after the reset accrue on a clean slate.
        store.increase_daily_spend(id, cost).await.unwrap();
        assert_eq!(store.get_by_id(id).await.unwrap().daily_spend, cost);
    }
}
