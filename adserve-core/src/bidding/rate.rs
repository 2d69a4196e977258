use crate::entities::EventCounts;

/// Minimum impressions a scope needs before its rate is considered
/// statistically meaningful.
pub const MIN_IMPRESSION_THRESHOLD: u64 = 100;

/// Which event type the rate is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateMetric {
    Conversions,
    Clicks,
}

impl RateMetric {
    fn extract(self, counts: &EventCounts) -> u64 {
        match self {
            RateMetric::Conversions => counts.conversions,
            RateMetric::Clicks => counts.clicks,
        }
    }
}

/// Estimate a performance rate over an ordered scope fallback hierarchy.
///
/// `scopes` is ordered most specific to least specific. Two passes:
/// the first scope with `impressions >= threshold` wins; failing that, the
/// first scope with any impressions at all; failing that, the rate is 0.
/// The returned rate is `metric / max(1, impressions)` and lies in `[0, 1]`.
pub fn rate_with_fallbacks(scopes: &[EventCounts], threshold: u64, metric: RateMetric) -> f64 {
    for counts in scopes {
        if counts.impressions >= threshold {
            return ratio(metric, counts);
        }
    }
    for counts in scopes {
        if counts.impressions > 0 {
            return ratio(metric, counts);
        }
    }
    0.0
}

fn ratio(metric: RateMetric, counts: &EventCounts) -> f64 {
    metric.extract(counts) as f64 / counts.impressions.max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(impressions: u64, clicks: u64, conversions: u64) -> EventCounts {
        EventCounts {
            impressions,
            clicks,
            conversions,
        }
    }

    #[test]
    fn returns_zero_when_no_scope_has_impressions() {
        let scopes = [counts(0, 0, 0), counts(0, 5, 3), counts(0, 0, 0)];
        assert_eq!(
            rate_with_fallbacks(&scopes, MIN_IMPRESSION_THRESHOLD, RateMetric::Conversions),
            0.0
        );
    }

    #[test]
    fn first_scope_meeting_threshold_wins() {
        // Second scope is the first to meet the threshold; the third would
        // give a different rate and must not be consulted.
        let scopes = [counts(10, 0, 5), counts(200, 0, 10), counts(1000, 0, 900)];
        assert_eq!(
            rate_with_fallbacks(&scopes, 100, RateMetric::Conversions),
            10.0 / 200.0
        );
    }

    #[test]
    fn falls_back_to_first_scope_with_any_impressions() {
        let scopes = [counts(0, 0, 0), counts(10, 2, 1), counts(50, 20, 10)];
        assert_eq!(
            rate_with_fallbacks(&scopes, 100, RateMetric::Conversions),
            1.0 / 10.0
        );
        assert_eq!(
            rate_with_fallbacks(&scopes, 100, RateMetric::Clicks),
            2.0 / 10.0
        );
    }

    #[test]
    fn rate_is_bounded_by_one() {
        let scopes = [counts(100, 0, 100)];
        assert_eq!(
            rate_with_fallbacks(&scopes, 100, RateMetric::Conversions),
            1.0
        );
    }
}
