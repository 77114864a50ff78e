//! Cross-device progress reconciliation
//!
//! This module provides:
//! - Content-derived sync identity for decks and cards (no shared row ids)
//! - The remote progress store contract
//! - Last-writer-wins merge of remote and local scheduling state

pub mod identity;
pub mod reconciler;
pub mod remote;

pub use identity::{card_sync_key, deck_sync_key, normalize};
pub use reconciler::{ProgressReconciler, ReconcileSummary, SyncError};
pub use remote::{RemoteCardDoc, RemoteProgressStore};
