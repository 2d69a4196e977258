use compact_str::CompactString;
use rust_decimal::Decimal;
use time::OffsetDateTime;
use uuid::Uuid;

/// Lifecycle status of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineItemStatus {
    Active,
    Paused,
    Completed,
}

impl LineItemStatus {
    /// Database / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            LineItemStatus::Active => "active",
            LineItemStatus::Paused => "paused",
            LineItemStatus::Completed => "completed",
        }
    }

    /// Parse the database representation. Returns `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(LineItemStatus::Active),
            "paused" => Some(LineItemStatus::Paused),
            "completed" => Some(LineItemStatus::Completed),
            _ => None,
        }
    }
}

impl From<adserve_sdk::objects::LineItemStatus> for LineItemStatus {
    fn from(status: adserve_sdk::objects::LineItemStatus) -> Self {
        use adserve_sdk::objects::LineItemStatus as Wire;
        match status {
            Wire::Active => LineItemStatus::Active,
            Wire::Paused => LineItemStatus::Paused,
            Wire::Completed => LineItemStatus::Completed,
        }
    }
}

impl From<LineItemStatus> for adserve_sdk::objects::LineItemStatus {
    fn from(status: LineItemStatus) -> Self {
        use adserve_sdk::objects::LineItemStatus as Wire;
        match status {
            LineItemStatus::Active => Wire::Active,
            LineItemStatus::Paused => Wire::Paused,
            LineItemStatus::Completed => Wire::Completed,
        }
    }
}

/// An advertiser's bid configuration for a placement.
///
/// `max_bid` is the base bid set by the advertiser and is never modified by
/// the scoring pipeline; the served bid is derived per request and carried
/// separately. `daily_spend` grows monotonically intraday through
/// [`LineItemStore::increase_daily_spend`](crate::store::LineItemStore) and
/// is zeroed by the daily budget reset.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub id: Uuid,
    pub name: CompactString,
    pub advertiser_id: CompactString,
    pub max_bid: Decimal,
    pub daily_budget: Decimal,
    pub daily_spend: Decimal,
    pub placement: CompactString,
    pub categories: Vec<String>,
    pub keywords: Vec<String>,
    pub status: LineItemStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl LineItem {
    /// Build a fresh line item from a create request.
    pub fn from_create(create: adserve_sdk::objects::LineItemCreate, now: OffsetDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: create.name,
            advertiser_id: create.advertiser_id,
            max_bid: create.max_bid,
            daily_budget: create.daily_budget,
            daily_spend: Decimal::ZERO,
            placement: create.placement,
            categories: create.categories,
            keywords: create.keywords,
            status: LineItemStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Eligibility check used by ad selection.
    ///
    /// A line item matches when it is active, its placement equals the
    /// requested placement exactly, and each present filter is a
    /// case-insensitive member of the corresponding tag set.
    pub fn matches(&self, placement: &str, category: Option<&str>, keyword: Option<&str>) -> bool {
        if self.status != LineItemStatus::Active || self.placement != placement {
            return false;
        }
        if let Some(category) = category {
            if !contains_ignore_case(&self.categories, category) {
                return false;
            }
        }
        if let Some(keyword) = keyword {
            if !contains_ignore_case(&self.keywords, keyword) {
                return false;
            }
        }
        true
    }

    /// Convert into the API response representation.
    pub fn into_response(self) -> adserve_sdk::objects::LineItemResponse {
        adserve_sdk::objects::LineItemResponse {
            id: self.id,
            name: self.name,
            advertiser_id: self.advertiser_id,
            max_bid: self.max_bid,
            daily_budget: self.daily_budget,
            daily_spend: self.daily_spend,
            placement: self.placement,
            categories: self.categories,
            keywords: self.keywords,
            status: self.status.into(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

fn contains_ignore_case(tags: &[String], wanted: &str) -> bool {
    tags.iter().any(|tag| tag.eq_ignore_ascii_case(wanted))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(status: LineItemStatus) -> LineItem {
        let now = OffsetDateTime::UNIX_EPOCH;
        LineItem {
            id: Uuid::new_v4(),
            name: "Spring Sale".into(),
            advertiser_id: "adv_1".into(),
            max_bid: Decimal::new(25, 1),
            daily_budget: Decimal::new(1000, 0),
            daily_spend: Decimal::ZERO,
            placement: "homepage_top".into(),
            categories: vec!["electronics".to_string()],
            keywords: vec!["sale".to_string()],
            status,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn inactive_items_never_match() {
        assert!(!item(LineItemStatus::Paused).matches("homepage_top", None, None));
        assert!(!item(LineItemStatus::Completed).matches("homepage_top", None, None));
        assert!(item(LineItemStatus::Active).matches("homepage_top", None, None));
    }

    #[test]
    fn placement_is_exact_match() {
        let li = item(LineItemStatus::Active);
        assert!(!li.matches("homepage_bottom", None, None));
        assert!(!li.matches("HOMEPAGE_TOP", None, None));
    }

    #[test]
    fn category_and_keyword_filters_are_case_insensitive() {
        let li = item(LineItemStatus::Active);
        assert!(li.matches("homepage_top", Some("Electronics"), None));
        assert!(li.matches("homepage_top", None, Some("SALE")));
        assert!(li.matches("homepage_top", Some("ELECTRONICS"), Some("Sale")));
        assert!(!li.matches("homepage_top", Some("fashion"), None));
        assert!(!li.matches("homepage_top", None, Some("discount")));
    }
}
