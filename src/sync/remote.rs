//! Remote progress store contract
//!
//! Documents are keyed by `(userId, deckSyncKey, cardSyncKey)` on whatever
//! backend the host application talks to; the reconciler only sees this
//! trait. Every field is optional on the wire — a partial or malformed
//! document degrades to "keep local" rather than failing the merge.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Card;
use crate::sync::identity::card_sync_key;
use crate::sync::reconciler::SyncError;

/// Scheduling state of one card as stored remotely
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCardDoc {
    /// Card status as a plain string ("new", "learning", ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ease_factor: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetitions: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review_date: Option<DateTime<Utc>>,
    /// Freshness of the writing device's copy at upload time; missing reads
    /// as the epoch, so local always wins against it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RemoteCardDoc {
    /// Snapshot a local card's full scheduling state for upload.
    pub fn from_card(card: &Card, updated_at: DateTime<Utc>) -> Self {
        Self {
            status: Some(card.status.as_str().to_string()),
            ease_factor: Some(card.ease_factor),
            interval_minutes: Some(card.interval_minutes),
            repetitions: Some(card.repetitions),
            last_reviewed: card.last_reviewed,
            next_review_date: card.next_review_date,
            updated_at: Some(updated_at),
        }
    }

    /// The sync key this card's document lives under.
    pub fn key_for(card: &Card) -> String {
        card_sync_key(&card.front, &card.back)
    }
}

/// Backend holding per-user card progress documents.
///
/// Implementations perform the actual network I/O (the reconciler is the
/// only suspending part of the engine). Calls for the same user must not
/// run concurrently; callers serialize reconciliation per user.
#[async_trait]
pub trait RemoteProgressStore: Send + Sync {
    /// All card documents for one deck, keyed by card sync key. An empty
    /// map means the deck has never been pushed from any device.
    async fn fetch_deck(
        &self,
        user_id: &str,
        deck_key: &str,
    ) -> Result<HashMap<String, RemoteCardDoc>, SyncError>;

    /// Create or overwrite one card document.
    async fn upsert_card(
        &self,
        user_id: &str,
        deck_key: &str,
        card_key: &str,
        doc: &RemoteCardDoc,
    ) -> Result<(), SyncError>;
}
