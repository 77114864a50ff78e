//! Data models for the study scheduler

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of a card in the spaced repetition system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardStatus {
    /// Never reviewed
    New,
    /// In initial learning phase
    Learning,
    /// Regular spaced review
    Review,
    /// Long-interval, well-retained
    Mastered,
}

impl Default for CardStatus {
    fn default() -> Self {
        Self::New
    }
}

impl CardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Learning => "learning",
            Self::Review => "review",
            Self::Mastered => "mastered",
        }
    }

    /// Parse a status from its wire form. Remote documents carry the status
    /// as a plain string; an unknown value is a parse failure the sync layer
    /// turns into "keep local".
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(Self::New),
            "learning" => Some(Self::Learning),
            "review" => Some(Self::Review),
            "mastered" => Some(Self::Mastered),
            _ => None,
        }
    }

    pub const ALL: [CardStatus; 4] = [
        CardStatus::New,
        CardStatus::Learning,
        CardStatus::Review,
        CardStatus::Mastered,
    ];
}

/// A deck is a collection of flashcards
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Deck {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            description: None,
            created_at: Utc::now(),
        }
    }
}

/// A flashcard with its scheduling state
///
/// Display content (front/back text, media refs) is carried for the host
/// application; the engine only reads front/back for sync identity and
/// mutates the scheduling fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    pub deck_id: Uuid,
    pub front: String,
    pub back: String,
    /// Asset references (images, audio) — opaque to the engine
    #[serde(default)]
    pub media: Vec<String>,
    #[serde(default)]
    pub status: CardStatus,
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f32,
    /// Current review interval in minutes
    #[serde(default)]
    pub interval_minutes: i64,
    /// Consecutive successful reviews; reset on a failed answer
    #[serde(default)]
    pub repetitions: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

pub(crate) fn default_ease_factor() -> f32 {
    2.5
}

impl Card {
    pub fn new(deck_id: Uuid, front: String, back: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            deck_id,
            front,
            back,
            media: Vec::new(),
            status: CardStatus::New,
            ease_factor: default_ease_factor(),
            interval_minutes: 0,
            repetitions: 0,
            last_reviewed: None,
            next_review_date: None,
            created_at: Utc::now(),
        }
    }

    /// A card is due when it has never been studied, or its scheduled time
    /// has passed.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.status {
            CardStatus::New => true,
            _ => self.next_review_date.map_or(false, |due| due <= now),
        }
    }

    /// Whether any scheduling field deviates from a brand-new card. Only
    /// cards with progress are worth pushing to the remote store.
    pub fn has_progress(&self) -> bool {
        self.status != CardStatus::New
            || self.ease_factor != default_ease_factor()
            || self.interval_minutes != 0
            || self.repetitions != 0
            || self.last_reviewed.is_some()
            || self.next_review_date.is_some()
    }
}

/// Per-installation study configuration
///
/// Immutable for the duration of one scheduling computation; callers supply
/// a fresh copy on every call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySettings {
    #[serde(default = "default_daily_new_cards")]
    pub daily_new_cards: i32,
    #[serde(default = "default_daily_review_limit")]
    pub daily_review_limit: i32,

    /// Interval assigned by the host UI for a manual "again" — the scheduler
    /// itself always pushes a failed card to the next calendar day.
    #[serde(default = "default_again_interval")]
    pub again_interval_minutes: i64,
    #[serde(default = "default_hard_interval")]
    pub hard_interval_minutes: i64,
    #[serde(default = "default_good_interval")]
    pub good_interval_minutes: i64,
    #[serde(default = "default_easy_interval")]
    pub easy_interval_minutes: i64,

    /// Response-time thresholds in whole seconds, easy < good < hard;
    /// a correct answer slower than the hard threshold counts as a failure.
    #[serde(default = "default_easy_threshold")]
    pub easy_threshold_seconds: i64,
    #[serde(default = "default_good_threshold")]
    pub good_threshold_seconds: i64,
    #[serde(default = "default_hard_threshold")]
    pub hard_threshold_seconds: i64,

    #[serde(default)]
    pub leniency_mode_enabled: bool,
    #[serde(default = "default_max_new_after_skip")]
    pub max_new_cards_after_skip: i32,
    #[serde(default = "default_max_review_cards")]
    pub max_review_cards: i32,
    #[serde(default = "default_reviews_addable")]
    pub daily_reviews_addable: i32,

    #[serde(default)]
    pub decay_mode_enabled: bool,
    #[serde(default = "default_decay_start_days")]
    pub decay_start_days: i64,
    #[serde(default = "default_decay_rate")]
    pub decay_rate_per_day: i32,
    #[serde(default = "default_decay_min_cards")]
    pub decay_min_cards: i32,
}

fn default_daily_new_cards() -> i32 {
    20
}

fn default_daily_review_limit() -> i32 {
    100
}

fn default_again_interval() -> i64 {
    1
}

fn default_hard_interval() -> i64 {
    6
}

fn default_good_interval() -> i64 {
    10
}

fn default_easy_interval() -> i64 {
    4 * 24 * 60
}

fn default_easy_threshold() -> i64 {
    5
}

fn default_good_threshold() -> i64 {
    10
}

fn default_hard_threshold() -> i64 {
    20
}

fn default_max_new_after_skip() -> i32 {
    10
}

fn default_max_review_cards() -> i32 {
    50
}

fn default_reviews_addable() -> i32 {
    20
}

fn default_decay_start_days() -> i64 {
    5
}

fn default_decay_rate() -> i32 {
    2
}

fn default_decay_min_cards() -> i32 {
    10
}

impl Default for StudySettings {
    fn default() -> Self {
        Self {
            daily_new_cards: default_daily_new_cards(),
            daily_review_limit: default_daily_review_limit(),
            again_interval_minutes: default_again_interval(),
            hard_interval_minutes: default_hard_interval(),
            good_interval_minutes: default_good_interval(),
            easy_interval_minutes: default_easy_interval(),
            easy_threshold_seconds: default_easy_threshold(),
            good_threshold_seconds: default_good_threshold(),
            hard_threshold_seconds: default_hard_threshold(),
            leniency_mode_enabled: false,
            max_new_cards_after_skip: default_max_new_after_skip(),
            max_review_cards: default_max_review_cards(),
            daily_reviews_addable: default_reviews_addable(),
            decay_mode_enabled: false,
            decay_start_days: default_decay_start_days(),
            decay_rate_per_day: default_decay_rate(),
            decay_min_cards: default_decay_min_cards(),
        }
    }
}

/// Per-deck mutable settings
///
/// Only `last_studied_date` feeds the scheduler (skipped-day computation);
/// freeze gating is enforced by the host before it asks for a queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSettings {
    pub deck_id: Uuid,
    #[serde(default)]
    pub is_frozen: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeze_until_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_studied_date: Option<DateTime<Utc>>,
}

impl DeckSettings {
    pub fn new(deck_id: Uuid) -> Self {
        Self {
            deck_id,
            is_frozen: false,
            freeze_until_date: None,
            last_studied_date: None,
        }
    }
}

/// Per-deck, per-calendar-day snapshot of study activity
///
/// Written as a side effect of reviews; observational only, never read back
/// by the scheduling algorithm.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewHistorySnapshot {
    pub deck_id: Uuid,
    pub day: NaiveDate,
    #[serde(default)]
    pub new_count: usize,
    #[serde(default)]
    pub learning_count: usize,
    #[serde(default)]
    pub review_count: usize,
    #[serde(default)]
    pub mastered_count: usize,
    /// Cumulative reviews submitted this day
    #[serde(default)]
    pub cards_reviewed: usize,
}

impl ReviewHistorySnapshot {
    pub fn new(deck_id: Uuid, day: NaiveDate) -> Self {
        Self {
            deck_id,
            day,
            new_count: 0,
            learning_count: 0,
            review_count: 0,
            mastered_count: 0,
            cards_reviewed: 0,
        }
    }
}

/// Aggregate statistics for a deck, for host UIs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckStats {
    pub total_cards: usize,
    pub new_cards: usize,
    pub learning_cards: usize,
    pub review_cards: usize,
    pub mastered_cards: usize,
    pub due_cards: usize,
}
