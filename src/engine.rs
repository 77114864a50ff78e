//! Public engine surface
//!
//! Composes the pure pieces (classifier, scheduler, daily load policy,
//! interleaver) over a [`CardStore`] and an injected [`Clock`]. The queue
//! path and the count path share one `DailyLoad` computation, so the session
//! a learner gets always matches the badge counts the host shows.

use uuid::Uuid;

use crate::algorithm::{apply_difficulty, classify_answer};
use crate::clock::{Clock, SystemClock};
use crate::models::{Card, CardStatus, DeckStats, StudySettings};
use crate::policy::DailyLoad;
use crate::queue::build_study_queue;
use crate::storage::{CardStore, Result};

/// Bare due counts for a deck, for badges and deck lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueCounts {
    pub review_count: usize,
    pub new_count: usize,
}

pub struct StudyEngine<S: CardStore> {
    store: S,
    clock: Box<dyn Clock>,
}

impl<S: CardStore> StudyEngine<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, Box::new(SystemClock::new()))
    }

    pub fn with_clock(store: S, clock: Box<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Assemble today's study queue for a deck.
    ///
    /// Review-due cards are truncated to the daily load's review allowance
    /// (oldest due first, no priority sort), new cards fill the remaining
    /// new-card allowance, and the two interleave 3:1.
    pub fn study_queue(
        &self,
        deck_id: Uuid,
        settings: &StudySettings,
        new_cards_studied_today: i32,
    ) -> Result<Vec<Card>> {
        let now = self.clock.now();
        let last_studied = self.store.deck_settings(deck_id)?.last_studied_date;
        let load = DailyLoad::compute(settings, last_studied, new_cards_studied_today, now);

        let mut review_cards = self.store.review_due_cards(deck_id, now)?;
        review_cards.truncate(load.review_take);
        let new_cards = self.store.new_cards(deck_id, load.new_take)?;

        log::debug!(
            "Queue for deck {}: {} review, {} new (skipped days: {})",
            deck_id,
            review_cards.len(),
            new_cards.len(),
            load.days_skipped
        );
        Ok(build_study_queue(review_cards, new_cards))
    }

    /// Due counts for a deck, numerically identical to what
    /// [`Self::study_queue`] would select.
    pub fn due_counts(
        &self,
        deck_id: Uuid,
        settings: &StudySettings,
        new_cards_studied_today: i32,
    ) -> Result<DueCounts> {
        let now = self.clock.now();
        let last_studied = self.store.deck_settings(deck_id)?.last_studied_date;
        let load = DailyLoad::compute(settings, last_studied, new_cards_studied_today, now);

        let review_count = self
            .store
            .count_review_due(deck_id, now)?
            .min(load.review_take);
        let new_count = self
            .store
            .count_by_status(deck_id, CardStatus::New)?
            .min(load.new_take);

        Ok(DueCounts {
            review_count,
            new_count,
        })
    }

    /// Apply one answer to a card: classify, reschedule, persist, and bump
    /// the deck's daily snapshot and last-studied stamp. Returns the updated
    /// card.
    pub fn apply_review(
        &self,
        card: &Card,
        correct: bool,
        response_time_millis: i64,
        settings: &StudySettings,
    ) -> Result<Card> {
        let now = self.clock.now();
        let difficulty = classify_answer(correct, response_time_millis, settings);
        let updated = apply_difficulty(card, difficulty, settings, now);

        self.store.update_card(&updated)?;
        self.store.record_review(card.deck_id, now.date_naive())?;
        self.store.mark_studied(card.deck_id, now)?;

        log::debug!(
            "Reviewed card {}: {:?} -> {:?}, next in {}m",
            card.id,
            difficulty,
            updated.status,
            updated.interval_minutes
        );
        Ok(updated)
    }

    /// Aggregate per-status and due counts for a deck.
    pub fn deck_stats(&self, deck_id: Uuid) -> Result<DeckStats> {
        let now = self.clock.now();
        let cards = self.store.all_cards_for_deck(deck_id)?;

        let mut stats = DeckStats {
            total_cards: cards.len(),
            ..DeckStats::default()
        };
        for card in &cards {
            match card.status {
                CardStatus::New => stats.new_cards += 1,
                CardStatus::Learning => stats.learning_cards += 1,
                CardStatus::Review => stats.review_cards += 1,
                CardStatus::Mastered => stats.mastered_cards += 1,
            }
            if card.is_due(now) {
                stats.due_cards += 1;
            }
        }
        Ok(stats)
    }
}
