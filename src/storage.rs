//! Card store contract and file-backed implementation
//!
//! The engine only depends on the [`CardStore`] trait; hosts with their own
//! persistence implement it directly. [`FileCardStore`] is the built-in
//! store, one JSON file per record:
//!
//! ```text
//! {root}/
//! ├── decks.json                    # Array of all decks
//! ├── cards/
//! │   └── {card-id}.json            # Individual card files
//! ├── deck_settings/
//! │   └── {deck-id}.json            # Per-deck mutable settings
//! └── history/
//!     └── {deck-id}/
//!         └── {yyyy-mm-dd}.json     # Daily review snapshot
//! ```

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Card, CardStatus, Deck, DeckSettings, ReviewHistorySnapshot};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Deck not found: {0}")]
    DeckNotFound(Uuid),

    #[error("Card not found: {0}")]
    CardNotFound(Uuid),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Persistence contract the engine schedules against.
///
/// Mutations are atomic per card; nothing here spans a cross-card
/// transaction, which is what makes reconciliation re-runnable.
pub trait CardStore {
    /// Cards past their scheduled review time: status in
    /// {Learning, Review, Mastered} with `next_review_date <= now`,
    /// oldest due first.
    fn review_due_cards(&self, deck_id: Uuid, now: DateTime<Utc>) -> Result<Vec<Card>>;

    /// Up to `limit` never-studied cards, oldest created first.
    fn new_cards(&self, deck_id: Uuid, limit: usize) -> Result<Vec<Card>>;

    fn count_by_status(&self, deck_id: Uuid, status: CardStatus) -> Result<usize>;

    fn count_review_due(&self, deck_id: Uuid, now: DateTime<Utc>) -> Result<usize>;

    fn all_cards_for_deck(&self, deck_id: Uuid) -> Result<Vec<Card>>;

    fn get_card(&self, card_id: Uuid) -> Result<Card>;

    fn update_card(&self, card: &Card) -> Result<()>;

    fn deck_settings(&self, deck_id: Uuid) -> Result<DeckSettings>;

    /// Stamp the deck's `last_studied_date`.
    fn mark_studied(&self, deck_id: Uuid, now: DateTime<Utc>) -> Result<()>;

    /// Bump today's review snapshot for the deck: refresh the per-status
    /// counts and increment `cards_reviewed`. Creates the snapshot on first
    /// review of the day.
    fn record_review(&self, deck_id: Uuid, day: NaiveDate) -> Result<ReviewHistorySnapshot>;
}

/// File-backed store, one JSON document per record
pub struct FileCardStore {
    root: PathBuf,
}

impl FileCardStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn decks_path(&self) -> PathBuf {
        self.root.join("decks.json")
    }

    fn cards_dir(&self) -> PathBuf {
        self.root.join("cards")
    }

    fn card_path(&self, card_id: Uuid) -> PathBuf {
        self.cards_dir().join(format!("{}.json", card_id))
    }

    fn deck_settings_dir(&self) -> PathBuf {
        self.root.join("deck_settings")
    }

    fn deck_settings_path(&self, deck_id: Uuid) -> PathBuf {
        self.deck_settings_dir().join(format!("{}.json", deck_id))
    }

    fn history_dir(&self, deck_id: Uuid) -> PathBuf {
        self.root.join("history").join(deck_id.to_string())
    }

    fn snapshot_path(&self, deck_id: Uuid, day: NaiveDate) -> PathBuf {
        self.history_dir(deck_id).join(format!("{}.json", day))
    }

    /// Create the directory layout and an empty deck list if absent.
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::create_dir_all(self.cards_dir())?;
        fs::create_dir_all(self.deck_settings_dir())?;

        let decks_path = self.decks_path();
        if !decks_path.exists() {
            let empty: Vec<Deck> = Vec::new();
            fs::write(&decks_path, serde_json::to_string_pretty(&empty)?)?;
            log::info!("Initialized card store at {:?}", self.root);
        }
        Ok(())
    }

    // ==================== Deck Operations ====================

    pub fn list_decks(&self) -> Result<Vec<Deck>> {
        let decks_path = self.decks_path();
        if !decks_path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&decks_path)?;
        let decks: Vec<Deck> = serde_json::from_str(&content)?;
        Ok(decks)
    }

    pub fn get_deck(&self, deck_id: Uuid) -> Result<Deck> {
        self.list_decks()?
            .into_iter()
            .find(|d| d.id == deck_id)
            .ok_or(StoreError::DeckNotFound(deck_id))
    }

    pub fn create_deck(&self, name: String, description: Option<String>) -> Result<Deck> {
        self.init()?;

        let mut deck = Deck::new(name);
        deck.description = description;

        let mut decks = self.list_decks()?;
        decks.push(deck.clone());
        fs::write(self.decks_path(), serde_json::to_string_pretty(&decks)?)?;

        let settings = DeckSettings::new(deck.id);
        fs::write(
            self.deck_settings_path(deck.id),
            serde_json::to_string_pretty(&settings)?,
        )?;

        Ok(deck)
    }

    pub fn delete_deck(&self, deck_id: Uuid) -> Result<()> {
        for card in self.all_cards_for_deck(deck_id)? {
            let path = self.card_path(card.id);
            if path.exists() {
                fs::remove_file(&path)?;
            }
        }

        let mut decks = self.list_decks()?;
        decks.retain(|d| d.id != deck_id);
        fs::write(self.decks_path(), serde_json::to_string_pretty(&decks)?)?;

        let settings_path = self.deck_settings_path(deck_id);
        if settings_path.exists() {
            fs::remove_file(&settings_path)?;
        }
        let history = self.history_dir(deck_id);
        if history.exists() {
            fs::remove_dir_all(&history)?;
        }
        Ok(())
    }

    pub fn update_deck_settings(&self, settings: &DeckSettings) -> Result<()> {
        fs::create_dir_all(self.deck_settings_dir())?;
        fs::write(
            self.deck_settings_path(settings.deck_id),
            serde_json::to_string_pretty(settings)?,
        )?;
        Ok(())
    }

    // ==================== Card Operations ====================

    pub fn create_card(&self, deck_id: Uuid, front: String, back: String) -> Result<Card> {
        self.init()?;
        // Decks are created before their cards
        self.get_deck(deck_id)?;

        let card = Card::new(deck_id, front, back);
        fs::write(
            self.card_path(card.id),
            serde_json::to_string_pretty(&card)?,
        )?;
        Ok(card)
    }

    pub fn delete_card(&self, card_id: Uuid) -> Result<()> {
        let path = self.card_path(card_id);
        if !path.exists() {
            return Err(StoreError::CardNotFound(card_id));
        }
        fs::remove_file(&path)?;
        Ok(())
    }

    fn load_cards(&self, deck_id: Uuid) -> Result<Vec<Card>> {
        let cards_dir = self.cards_dir();
        if !cards_dir.exists() {
            return Ok(Vec::new());
        }

        let mut cards = Vec::new();
        for entry in fs::read_dir(&cards_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                let content = fs::read_to_string(&path)?;
                let card: Card = serde_json::from_str(&content)?;
                if card.deck_id == deck_id {
                    cards.push(card);
                }
            }
        }
        Ok(cards)
    }
}

impl CardStore for FileCardStore {
    fn review_due_cards(&self, deck_id: Uuid, now: DateTime<Utc>) -> Result<Vec<Card>> {
        let mut due: Vec<Card> = self
            .load_cards(deck_id)?
            .into_iter()
            .filter(|c| c.status != CardStatus::New && c.is_due(now))
            .collect();
        due.sort_by_key(|c| (c.next_review_date, c.created_at));
        Ok(due)
    }

    fn new_cards(&self, deck_id: Uuid, limit: usize) -> Result<Vec<Card>> {
        let mut fresh: Vec<Card> = self
            .load_cards(deck_id)?
            .into_iter()
            .filter(|c| c.status == CardStatus::New)
            .collect();
        fresh.sort_by_key(|c| c.created_at);
        fresh.truncate(limit);
        Ok(fresh)
    }

    fn count_by_status(&self, deck_id: Uuid, status: CardStatus) -> Result<usize> {
        Ok(self
            .load_cards(deck_id)?
            .iter()
            .filter(|c| c.status == status)
            .count())
    }

    fn count_review_due(&self, deck_id: Uuid, now: DateTime<Utc>) -> Result<usize> {
        Ok(self
            .load_cards(deck_id)?
            .iter()
            .filter(|c| c.status != CardStatus::New && c.is_due(now))
            .count())
    }

    fn all_cards_for_deck(&self, deck_id: Uuid) -> Result<Vec<Card>> {
        self.load_cards(deck_id)
    }

    fn get_card(&self, card_id: Uuid) -> Result<Card> {
        let path = self.card_path(card_id);
        if !path.exists() {
            return Err(StoreError::CardNotFound(card_id));
        }
        let content = fs::read_to_string(&path)?;
        let card: Card = serde_json::from_str(&content)?;
        Ok(card)
    }

    fn update_card(&self, card: &Card) -> Result<()> {
        let path = self.card_path(card.id);
        if !path.exists() {
            return Err(StoreError::CardNotFound(card.id));
        }
        fs::write(&path, serde_json::to_string_pretty(card)?)?;
        Ok(())
    }

    fn deck_settings(&self, deck_id: Uuid) -> Result<DeckSettings> {
        let path = self.deck_settings_path(deck_id);
        if !path.exists() {
            // No settings yet: defaults, never studied
            return Ok(DeckSettings::new(deck_id));
        }
        let content = fs::read_to_string(&path)?;
        let settings: DeckSettings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    fn mark_studied(&self, deck_id: Uuid, now: DateTime<Utc>) -> Result<()> {
        let mut settings = self.deck_settings(deck_id)?;
        settings.last_studied_date = Some(now);
        self.update_deck_settings(&settings)
    }

    fn record_review(&self, deck_id: Uuid, day: NaiveDate) -> Result<ReviewHistorySnapshot> {
        let path = self.snapshot_path(deck_id, day);
        let mut snapshot = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            ReviewHistorySnapshot::new(deck_id, day)
        };

        let cards = self.load_cards(deck_id)?;
        snapshot.new_count = cards.iter().filter(|c| c.status == CardStatus::New).count();
        snapshot.learning_count = cards
            .iter()
            .filter(|c| c.status == CardStatus::Learning)
            .count();
        snapshot.review_count = cards
            .iter()
            .filter(|c| c.status == CardStatus::Review)
            .count();
        snapshot.mastered_count = cards
            .iter()
            .filter(|c| c.status == CardStatus::Mastered)
            .count();
        snapshot.cards_reviewed += 1;

        fs::create_dir_all(self.history_dir(deck_id))?;
        fs::write(&path, serde_json::to_string_pretty(&snapshot)?)?;
        Ok(snapshot)
    }
}
