//! Daily load policy
//!
//! Computes the effective per-day ceilings on new and review cards for a
//! deck. Leniency keeps a backlog from piling up after missed days; decay
//! shrinks daily targets after prolonged inactivity, down to a floor. One
//! shared function serves both the queue-building path and the count-only
//! path so the two can never drift apart numerically.

use chrono::{DateTime, Utc};

use crate::models::StudySettings;

/// Effective daily limits for one deck, one day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyLoad {
    /// Whole days with no study between the last session and today; a
    /// normal one-day gap counts as zero skipped days.
    pub days_skipped: i64,
    /// Today's ceiling on new cards, after leniency/decay
    pub new_cards_limit: i32,
    /// Today's ceiling on review cards, after decay
    pub review_cards_limit: i32,
    /// How many review-due cards to actually take today
    pub review_take: usize,
    /// How many new cards may still be introduced today
    pub new_take: usize,
}

/// Days fully skipped since the last study session. `None` (never studied)
/// and negative gaps both read as zero.
pub fn days_skipped(last_studied_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    match last_studied_date {
        Some(last) => {
            let gap = now.signed_duration_since(last);
            (gap.num_days() - 1).max(0)
        }
        None => 0,
    }
}

impl DailyLoad {
    pub fn compute(
        settings: &StudySettings,
        last_studied_date: Option<DateTime<Utc>>,
        new_cards_already_studied: i32,
        now: DateTime<Utc>,
    ) -> Self {
        let days_skipped = days_skipped(last_studied_date, now);

        let mut new_cards_limit = settings.daily_new_cards.max(0);
        let mut review_cards_limit = settings.daily_review_limit.max(0);
        let mut review_take = review_cards_limit;

        if settings.leniency_mode_enabled {
            review_take = review_take.min(settings.max_review_cards.max(0));

            if days_skipped > 0 && settings.max_new_cards_after_skip < new_cards_limit {
                new_cards_limit = settings.max_new_cards_after_skip.max(0);
            }

            let max_allowed_reviews = (settings.daily_review_limit.max(0) / 5) as i64
                + settings.daily_reviews_addable.max(0) as i64 * (days_skipped + 1);
            let max_allowed_reviews = max_allowed_reviews.min(i32::MAX as i64) as i32;
            review_take = review_take
                .min(max_allowed_reviews)
                .min(settings.max_review_cards.max(0));
        }

        if settings.decay_mode_enabled && days_skipped >= settings.decay_start_days {
            let decay_days = days_skipped - settings.decay_start_days + 1;
            let decay_amount =
                (decay_days * settings.decay_rate_per_day.max(0) as i64).min(i32::MAX as i64) as i32;
            let floor = settings.decay_min_cards.max(0);

            new_cards_limit =
                new_cards_limit.min(floor.max(settings.daily_new_cards.max(0) - decay_amount));
            review_cards_limit =
                review_cards_limit.min(floor.max(settings.daily_review_limit.max(0) - decay_amount));
            review_take = review_take.min(review_cards_limit);
        }

        let new_take = (new_cards_limit - new_cards_already_studied).max(0);

        Self {
            days_skipped,
            new_cards_limit,
            review_cards_limit,
            review_take: review_take as usize,
            new_take: new_take as usize,
        }
    }
}
