//! Review classification and interval scheduling
//!
//! Two pure pieces: the difficulty classifier maps an answer (correctness +
//! response latency) to a discrete bucket, and the interval scheduler is a
//! state machine over card status driven by that bucket. Neither touches
//! storage; callers persist the returned card.

use chrono::{DateTime, Duration, Utc};

use crate::models::{Card, CardStatus, StudySettings};

/// Minimum ease factor allowed
const MIN_EASE_FACTOR: f32 = 1.3;

/// Classified difficulty of a single answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Again,
    Hard,
    Good,
    Easy,
}

/// Classify an answer by correctness and response time.
///
/// Thresholds compare in whole seconds with strict `<`; an answer exactly at
/// the easy threshold is Good, not Easy. A correct answer slower than the
/// hard threshold is treated as a failure: recall that slow is not retained.
pub fn classify_answer(
    correct: bool,
    response_time_millis: i64,
    settings: &StudySettings,
) -> Difficulty {
    if !correct {
        return Difficulty::Again;
    }

    let seconds = response_time_millis / 1000;
    if seconds < settings.easy_threshold_seconds {
        Difficulty::Easy
    } else if seconds < settings.good_threshold_seconds {
        Difficulty::Good
    } else if seconds < settings.hard_threshold_seconds {
        Difficulty::Hard
    } else {
        Difficulty::Again
    }
}

/// Result of scheduling the next review
#[derive(Debug, Clone)]
pub struct ReviewResult {
    pub status: CardStatus,
    pub ease_factor: f32,
    pub interval_minutes: i64,
    pub repetitions: i32,
    pub due_date: DateTime<Utc>,
}

/// Compute the interval (in minutes) a difficulty would assign, without
/// building the full result. Again always yields 0 — the failed card is
/// rescheduled by calendar day, not by interval.
fn next_interval(card: &Card, difficulty: Difficulty, settings: &StudySettings) -> i64 {
    match difficulty {
        Difficulty::Again => 0,
        Difficulty::Hard => {
            let minutes = if card.status == CardStatus::New {
                settings.hard_interval_minutes
            } else {
                (card.interval_minutes as f64 * 1.2).round() as i64
            };
            minutes.max(1)
        }
        Difficulty::Good => {
            let minutes = if card.status == CardStatus::New || card.interval_minutes == 0 {
                settings.good_interval_minutes
            } else {
                (card.interval_minutes as f64 * card.ease_factor as f64).round() as i64
            };
            minutes.max(1)
        }
        Difficulty::Easy => {
            let minutes = if card.interval_minutes < settings.good_interval_minutes {
                settings.easy_interval_minutes
            } else {
                card.interval_minutes.saturating_mul(2)
            };
            minutes.max(1)
        }
    }
}

/// Compute the card's next scheduling state for a classified difficulty.
///
/// Every transition stamps `last_reviewed = now` (folded in by
/// [`apply_difficulty`]) and increments `repetitions`, except Again, which
/// resets the streak and forces the card to the same time tomorrow so a
/// failed card never reappears in the current sitting.
pub fn next_review(
    card: &Card,
    difficulty: Difficulty,
    settings: &StudySettings,
    now: DateTime<Utc>,
) -> ReviewResult {
    let interval_minutes = next_interval(card, difficulty, settings);

    match difficulty {
        Difficulty::Again => ReviewResult {
            status: CardStatus::Learning,
            ease_factor: (card.ease_factor - 0.2).max(MIN_EASE_FACTOR),
            interval_minutes: 0,
            repetitions: 0,
            due_date: now + Duration::days(1),
        },
        Difficulty::Hard => ReviewResult {
            status: CardStatus::Learning,
            ease_factor: (card.ease_factor - 0.15).max(MIN_EASE_FACTOR),
            interval_minutes,
            repetitions: card.repetitions + 1,
            due_date: now + Duration::minutes(interval_minutes),
        },
        Difficulty::Good => ReviewResult {
            status: if interval_minutes >= settings.good_interval_minutes {
                CardStatus::Review
            } else {
                CardStatus::Learning
            },
            ease_factor: card.ease_factor,
            interval_minutes,
            repetitions: card.repetitions + 1,
            due_date: now + Duration::minutes(interval_minutes),
        },
        Difficulty::Easy => ReviewResult {
            status: CardStatus::Mastered,
            ease_factor: card.ease_factor + 0.15,
            interval_minutes,
            repetitions: card.repetitions + 1,
            due_date: now + Duration::minutes(interval_minutes),
        },
    }
}

/// Fold a scheduling result into a card, producing the updated copy the
/// caller persists.
pub fn apply_difficulty(
    card: &Card,
    difficulty: Difficulty,
    settings: &StudySettings,
    now: DateTime<Utc>,
) -> Card {
    let result = next_review(card, difficulty, settings, now);

    let mut updated = card.clone();
    updated.status = result.status;
    updated.ease_factor = result.ease_factor;
    updated.interval_minutes = result.interval_minutes;
    updated.repetitions = result.repetitions;
    updated.last_reviewed = Some(now);
    updated.next_review_date = Some(result.due_date);
    updated
}

/// Intervals (minutes) each rating would schedule, for rating-button labels.
/// Order: Again, Hard, Good, Easy. Again shows 0 because it reschedules by
/// calendar day.
pub fn preview_intervals(card: &Card, settings: &StudySettings) -> [i64; 4] {
    [
        next_interval(card, Difficulty::Again, settings),
        next_interval(card, Difficulty::Hard, settings),
        next_interval(card, Difficulty::Good, settings),
        next_interval(card, Difficulty::Easy, settings),
    ]
}

/// Format an interval in minutes to a human-readable string
pub fn format_interval(minutes: i64) -> String {
    if minutes <= 0 {
        "now".to_string()
    } else if minutes < 60 {
        format!("{}m", minutes)
    } else if minutes < 24 * 60 {
        format!("{}h", minutes / 60)
    } else {
        let days = minutes / (24 * 60);
        if days < 7 {
            format!("{}d", days)
        } else if days < 30 {
            format!("{}w", days / 7)
        } else if days < 365 {
            format!("{}mo", days / 30)
        } else {
            format!("{}y", days / 365)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn new_card() -> Card {
        Card::new(Uuid::new_v4(), "front".into(), "back".into())
    }

    fn settings() -> StudySettings {
        StudySettings::default()
    }

    #[test]
    fn test_incorrect_is_again() {
        assert_eq!(classify_answer(false, 100, &settings()), Difficulty::Again);
    }

    #[test]
    fn test_classify_by_speed() {
        let s = settings();
        assert_eq!(classify_answer(true, 2_000, &s), Difficulty::Easy);
        assert_eq!(classify_answer(true, 7_000, &s), Difficulty::Good);
        assert_eq!(classify_answer(true, 15_000, &s), Difficulty::Hard);
        assert_eq!(classify_answer(true, 25_000, &s), Difficulty::Again);
    }

    #[test]
    fn test_threshold_boundaries_are_strict() {
        let s = settings();
        // Exactly at the easy threshold is Good, not Easy
        assert_eq!(
            classify_answer(true, s.easy_threshold_seconds * 1000, &s),
            Difficulty::Good
        );
        assert_eq!(
            classify_answer(true, s.good_threshold_seconds * 1000, &s),
            Difficulty::Hard
        );
        assert_eq!(
            classify_answer(true, s.hard_threshold_seconds * 1000, &s),
            Difficulty::Again
        );
        // One millisecond under stays in the faster bucket
        assert_eq!(
            classify_answer(true, s.easy_threshold_seconds * 1000 - 1, &s),
            Difficulty::Easy
        );
    }

    #[test]
    fn test_again_resets_and_floors_ease() {
        let now = Utc::now();
        let mut card = new_card();
        card.status = CardStatus::Review;
        card.repetitions = 5;
        card.interval_minutes = 300;
        card.ease_factor = 1.4;

        let mut current = card;
        for _ in 0..4 {
            current = apply_difficulty(&current, Difficulty::Again, &settings(), now);
            assert!(current.ease_factor >= MIN_EASE_FACTOR);
        }
        assert_eq!(current.status, CardStatus::Learning);
        assert_eq!(current.repetitions, 0);
        assert_eq!(current.interval_minutes, 0);
    }

    #[test]
    fn test_again_never_due_same_session() {
        let now = Utc::now();
        let card = apply_difficulty(&new_card(), Difficulty::Again, &settings(), now);
        let due = card.next_review_date.unwrap();
        assert!(due >= now + Duration::hours(23));
        assert!(!card.is_due(now));
    }

    #[test]
    fn test_hard_on_new_card_uses_setting() {
        let now = Utc::now();
        let s = settings();
        let card = apply_difficulty(&new_card(), Difficulty::Hard, &s, now);
        assert_eq!(card.interval_minutes, s.hard_interval_minutes);
        assert_eq!(card.status, CardStatus::Learning);
        assert_eq!(card.repetitions, 1);
    }

    #[test]
    fn test_hard_grows_interval_with_floor() {
        let now = Utc::now();
        let mut card = new_card();
        card.status = CardStatus::Learning;
        card.interval_minutes = 100;

        let updated = apply_difficulty(&card, Difficulty::Hard, &settings(), now);
        assert_eq!(updated.interval_minutes, 120);
        assert!((updated.ease_factor - 2.35).abs() < 1e-6);

        // A zero interval never produces a zero next interval
        card.interval_minutes = 0;
        let updated = apply_difficulty(&card, Difficulty::Hard, &settings(), now);
        assert!(updated.interval_minutes >= 1);
    }

    #[test]
    fn test_good_promotes_to_review_at_threshold() {
        let now = Utc::now();
        let s = settings();

        // First Good on a new card lands exactly at the good interval
        let card = apply_difficulty(&new_card(), Difficulty::Good, &s, now);
        assert_eq!(card.interval_minutes, s.good_interval_minutes);
        assert_eq!(card.status, CardStatus::Review);
        assert_eq!(card.ease_factor, 2.5);

        // A grown interval multiplies by ease
        let mut seasoned = new_card();
        seasoned.status = CardStatus::Review;
        seasoned.interval_minutes = 100;
        seasoned.ease_factor = 2.5;
        let updated = apply_difficulty(&seasoned, Difficulty::Good, &s, now);
        assert_eq!(updated.interval_minutes, 250);
        assert_eq!(updated.status, CardStatus::Review);
    }

    #[test]
    fn test_good_below_threshold_stays_learning() {
        let now = Utc::now();
        let mut s = settings();
        s.good_interval_minutes = 10;

        let mut card = new_card();
        card.status = CardStatus::Learning;
        card.interval_minutes = 5;
        card.ease_factor = 1.3;

        // 5 * 1.3 = 6.5 -> 7, below the good interval
        let updated = apply_difficulty(&card, Difficulty::Good, &s, now);
        assert_eq!(updated.interval_minutes, 7);
        assert_eq!(updated.status, CardStatus::Learning);
    }

    #[test]
    fn test_easy_masters_and_raises_ease() {
        let now = Utc::now();
        let s = settings();

        // Short interval jumps to the easy interval
        let card = apply_difficulty(&new_card(), Difficulty::Easy, &s, now);
        assert_eq!(card.interval_minutes, s.easy_interval_minutes);
        assert_eq!(card.status, CardStatus::Mastered);
        assert!((card.ease_factor - 2.65).abs() < 1e-6);

        // Long interval doubles
        let mut seasoned = new_card();
        seasoned.status = CardStatus::Mastered;
        seasoned.interval_minutes = s.good_interval_minutes * 3;
        let updated = apply_difficulty(&seasoned, Difficulty::Easy, &s, now);
        assert_eq!(updated.interval_minutes, s.good_interval_minutes * 6);
    }

    #[test]
    fn test_review_stamps_last_reviewed() {
        let now = Utc::now();
        let card = apply_difficulty(&new_card(), Difficulty::Good, &settings(), now);
        assert_eq!(card.last_reviewed, Some(now));
        assert_eq!(
            card.next_review_date,
            Some(now + Duration::minutes(card.interval_minutes))
        );
    }

    #[test]
    fn test_preview_intervals() {
        let s = settings();
        let previews = preview_intervals(&new_card(), &s);
        assert_eq!(previews[0], 0);
        assert_eq!(previews[1], s.hard_interval_minutes);
        assert_eq!(previews[2], s.good_interval_minutes);
        assert_eq!(previews[3], s.easy_interval_minutes);
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(0), "now");
        assert_eq!(format_interval(45), "45m");
        assert_eq!(format_interval(180), "3h");
        assert_eq!(format_interval(24 * 60), "1d");
        assert_eq!(format_interval(10 * 24 * 60), "1w");
        assert_eq!(format_interval(60 * 24 * 60), "2mo");
        assert_eq!(format_interval(800 * 24 * 60), "2y");
    }
}
