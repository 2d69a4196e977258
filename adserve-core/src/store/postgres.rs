//! Postgres store implementations.
//!
//! Queries are runtime-checked (`sqlx::query` / `query_as`) so the crate
//! builds without a live database. Spend mutation is pushed down to SQL:
//! the increment is a single `UPDATE ... SET daily_spend = daily_spend + $n`
//! and the daily reset is one conditional bulk update, so concurrent
//! accruals and resets cannot lose updates to stale in-process state.

use super::{LineItemStore, StoreError, TrackingStore};
use crate::entities::{
    EventCounts, LineItem, LineItemStatus, TrackingEvent, TrackingEventType,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;
use std::collections::HashMap;
use time::OffsetDateTime;
use uuid::Uuid;

const LINE_ITEM_COLUMNS: &str = "id, name, advertiser_id, max_bid, daily_budget, daily_spend, \
     placement, categories, keywords, status, created_at, updated_at";

/// Postgres-backed [`LineItemStore`].
#[derive(Clone)]
pub struct PostgresLineItemStore {
    pool: PgPool,
}

impl PostgresLineItemStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct LineItemRow {
    id: Uuid,
    name: String,
    advertiser_id: String,
    max_bid: Decimal,
    daily_budget: Decimal,
    daily_spend: Decimal,
    placement: String,
    categories: Vec<String>,
    keywords: Vec<String>,
    status: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl LineItemRow {
    fn into_entity(self) -> Result<LineItem, StoreError> {
        let status = LineItemStatus::parse(&self.status).ok_or_else(|| {
            StoreError::Storage(sqlx::Error::Decode(
                format!("unknown line item status: {}", self.status).into(),
            ))
        })?;
        Ok(LineItem {
            id: self.id,
            name: self.name.into(),
            advertiser_id: self.advertiser_id.into(),
            max_bid: self.max_bid,
            daily_budget: self.daily_budget,
            daily_spend: self.daily_spend,
            placement: self.placement.into(),
            categories: self.categories,
            keywords: self.keywords,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[async_trait]
impl LineItemStore for PostgresLineItemStore {
    async fn create(&self, item: LineItem) -> Result<(), StoreError> {
        let result = sqlx::query(
            "INSERT INTO line_items (id, name, advertiser_id, max_bid, daily_budget, daily_spend, \
             placement, categories, keywords, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(item.id)
        .bind(item.name.as_str())
        .bind(item.advertiser_id.as_str())
        .bind(item.max_bid)
        .bind(item.daily_budget)
        .bind(item.daily_spend)
        .bind(item.placement.as_str())
        .bind(&item.categories)
        .bind(&item.keywords)
        .bind(item.status.as_str())
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::AlreadyExists(item.id));
        }
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<LineItem, StoreError> {
        let row: Option<LineItemRow> = sqlx::query_as(&format!(
            "SELECT {LINE_ITEM_COLUMNS} FROM line_items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or(StoreError::NotFound(id))?.into_entity()
    }

    async fn list(
        &self,
        advertiser_id: Option<&str>,
        placement: Option<&str>,
    ) -> Result<Vec<LineItem>, StoreError> {
        let rows: Vec<LineItemRow> = sqlx::query_as(&format!(
            "SELECT {LINE_ITEM_COLUMNS} FROM line_items \
             WHERE ($1::text IS NULL OR advertiser_id = $1) \
               AND ($2::text IS NULL OR placement = $2)"
        ))
        .bind(advertiser_id)
        .bind(placement)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(LineItemRow::into_entity).collect()
    }

    async fn find_eligible(
        &self,
        placement: &str,
        category: Option<&str>,
        keyword: Option<&str>,
    ) -> Result<Vec<LineItem>, StoreError> {
        let rows: Vec<LineItemRow> = sqlx::query_as(&format!(
            "SELECT {LINE_ITEM_COLUMNS} FROM line_items \
             WHERE placement = $1 AND status = 'active' \
               AND ($2::text IS NULL OR EXISTS \
                    (SELECT 1 FROM unnest(categories) c WHERE lower(c) = lower($2))) \
               AND ($3::text IS NULL OR EXISTS \
                    (SELECT 1 FROM unnest(keywords) k WHERE lower(k) = lower($3)))"
        ))
        .bind(placement)
        .bind(category)
        .bind(keyword)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(LineItemRow::into_entity).collect()
    }

    async fn increase_daily_spend(&self, id: Uuid, amount: Decimal) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE line_items \
             SET daily_spend = daily_spend + $2, updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(amount)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn reset_all_daily_spend(&self) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE line_items \
             SET daily_spend = 0, updated_at = now() \
             WHERE daily_spend > 0",
        )
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

/// Postgres-backed [`TrackingStore`].
#[derive(Clone)]
pub struct PostgresTrackingStore {
    pool: PgPool,
}

impl PostgresTrackingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TrackingEventRow {
    event_type: String,
    line_item_id: Uuid,
    occurred_at: OffsetDateTime,
    placement: String,
    user_id: String,
    metadata: Json<HashMap<String, String>>,
}

impl TrackingEventRow {
    fn into_entity(self) -> Result<TrackingEvent, StoreError> {
        let event_type = TrackingEventType::parse(&self.event_type).ok_or_else(|| {
            StoreError::Storage(sqlx::Error::Decode(
                format!("unknown tracking event type: {}", self.event_type).into(),
            ))
        })?;
        Ok(TrackingEvent {
            event_type,
            line_item_id: self.line_item_id,
            timestamp: self.occurred_at,
            placement: self.placement.into(),
            user_id: self.user_id.into(),
            metadata: self.metadata.0,
        })
    }
}

#[async_trait]
impl TrackingStore for PostgresTrackingStore {
    async fn store(&self, event: TrackingEvent) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO tracking_events \
             (event_type, line_item_id, occurred_at, placement, user_id, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(event.event_type.as_str())
        .bind(event.line_item_id)
        .bind(event.timestamp)
        .bind(event.placement.as_str())
        .bind(event.user_id.as_str())
        .bind(Json(&event.metadata))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<TrackingEvent>, StoreError> {
        let rows: Vec<TrackingEventRow> = sqlx::query_as(
            "SELECT event_type, line_item_id, occurred_at, placement, user_id, metadata \
             FROM tracking_events ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(TrackingEventRow::into_entity).collect()
    }

    async fn count_events(
        &self,
        line_item_id: Option<Uuid>,
        placement: Option<&str>,
    ) -> Result<EventCounts, StoreError> {
        let (impressions, clicks, conversions): (i64, i64, i64) = sqlx::query_as(
            "SELECT \
               count(*) FILTER (WHERE event_type = 'impression'), \
               count(*) FILTER (WHERE event_type = 'click'), \
               count(*) FILTER (WHERE event_type = 'conversion') \
             FROM tracking_events \
             WHERE ($1::uuid IS NULL OR line_item_id = $1) \
               AND ($2::text IS NULL OR placement = $2)",
        )
        .bind(line_item_id)
        .bind(placement)
        .fetch_one(&self.pool)
        .await?;

        Ok(EventCounts {
            impressions: impressions.max(0) as u64,
            clicks: clicks.max(0) as u64,
            conversions: conversions.max(0) as u64,
        })
    }
}
