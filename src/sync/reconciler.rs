//! Last-writer-wins merge of local and remote card progress
//!
//! Per deck: pull the remote documents, fold strictly-newer remote state
//! into matching local cards, then push every local card that has progress.
//! There is no vector clock and no conflict flagging — concurrent edits on
//! two devices pick the higher freshness timestamp, with ties keeping
//! local. Each card merges independently, so a cancelled or crashed run
//! leaves a consistent store and the next run finishes the job.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{Card, CardStatus, Deck};
use crate::storage::{CardStore, StoreError};
use crate::sync::identity::deck_sync_key;
use crate::sync::remote::{RemoteCardDoc, RemoteProgressStore};

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Remote store error: {0}")]
    Remote(String),
}

/// Counters from one reconciliation run, for the log line and host UIs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Local cards overwritten from a newer remote document
    pub pulled: usize,
    /// Local cards uploaded
    pub pushed: usize,
    /// Matched cards left untouched (local newer, tie, or malformed remote)
    pub skipped: usize,
}

/// Freshness of a local card: the most recent of its creation, last review,
/// and next due timestamps. Unset timestamps read as the epoch.
pub fn local_freshness(card: &Card) -> DateTime<Utc> {
    let mut freshness = card.created_at;
    if let Some(reviewed) = card.last_reviewed {
        freshness = freshness.max(reviewed);
    }
    if let Some(due) = card.next_review_date {
        freshness = freshness.max(due);
    }
    freshness
}

pub struct ProgressReconciler<R: RemoteProgressStore> {
    remote: R,
}

impl<R: RemoteProgressStore> ProgressReconciler<R> {
    pub fn new(remote: R) -> Self {
        Self { remote }
    }

    /// Merge remote progress into a deck's local cards, then push local
    /// progress back. Must not run concurrently with itself for the same
    /// user; callers serialize per user.
    pub async fn reconcile_deck<S: CardStore>(
        &self,
        store: &S,
        user_id: &str,
        deck: &Deck,
    ) -> Result<ReconcileSummary, SyncError> {
        let deck_key = deck_sync_key(&deck.name);
        let remote_docs = self.remote.fetch_deck(user_id, &deck_key).await?;

        let mut summary = ReconcileSummary::default();

        if remote_docs.is_empty() {
            log::debug!("No remote progress for deck '{}', push only", deck.name);
        } else {
            for card in store.all_cards_for_deck(deck.id)? {
                let Some(doc) = remote_docs.get(&RemoteCardDoc::key_for(&card)) else {
                    continue;
                };

                let remote_updated = doc.updated_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
                if remote_updated <= local_freshness(&card) {
                    summary.skipped += 1;
                    continue;
                }

                let Some(merged) = merge_remote(&card, doc) else {
                    log::warn!(
                        "Malformed remote document for card {} (status {:?}), keeping local",
                        card.id,
                        doc.status
                    );
                    summary.skipped += 1;
                    continue;
                };

                if merged == card {
                    summary.skipped += 1;
                } else {
                    store.update_card(&merged)?;
                    summary.pulled += 1;
                }
            }
        }

        // Push: every card whose state deviates from a brand-new card,
        // re-read so just-merged state is what gets uploaded.
        for card in store.all_cards_for_deck(deck.id)? {
            if !card.has_progress() {
                continue;
            }
            let doc = RemoteCardDoc::from_card(&card, local_freshness(&card));
            self.remote
                .upsert_card(user_id, &deck_key, &RemoteCardDoc::key_for(&card), &doc)
                .await?;
            summary.pushed += 1;
        }

        log::info!(
            "Reconciled deck '{}' for user {}: {} pulled, {} pushed, {} skipped",
            deck.name,
            user_id,
            summary.pulled,
            summary.pushed,
            summary.skipped
        );
        Ok(summary)
    }
}

/// Overlay a remote document on a local card. Fields absent remotely fall
/// back to the local value; a missing or unknown status is a parse failure
/// and returns None (keep local).
fn merge_remote(card: &Card, doc: &RemoteCardDoc) -> Option<Card> {
    let status = CardStatus::parse(doc.status.as_deref()?)?;

    let mut merged = card.clone();
    merged.status = status;
    merged.ease_factor = doc.ease_factor.unwrap_or(card.ease_factor);
    merged.interval_minutes = doc.interval_minutes.unwrap_or(card.interval_minutes);
    merged.repetitions = doc.repetitions.unwrap_or(card.repetitions);
    merged.last_reviewed = doc.last_reviewed.or(card.last_reviewed);
    merged.next_review_date = doc.next_review_date.or(card.next_review_date);
    Some(merged)
}
