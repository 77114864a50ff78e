//! Spaced-repetition study scheduler and cross-device progress
//! reconciliation engine.
//!
//! This crate provides:
//! - Review classification and SM-2-style interval scheduling
//! - Daily load policy (leniency and decay caps on new/review cards)
//! - Study queue assembly with 3:1 review/new interleaving
//! - A card store contract plus a file-backed implementation
//! - Last-writer-wins progress reconciliation via content-derived identity
//!
//! The host application owns rendering, capture, import/export, and
//! notifications; it drives this engine through [`StudyEngine`] and
//! [`sync::ProgressReconciler`].

pub mod algorithm;
pub mod clock;
pub mod engine;
pub mod models;
pub mod policy;
pub mod queue;
pub mod storage;
pub mod sync;

pub use algorithm::{
    apply_difficulty, classify_answer, format_interval, preview_intervals, Difficulty,
    ReviewResult,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{DueCounts, StudyEngine};
pub use models::{
    Card, CardStatus, Deck, DeckSettings, DeckStats, ReviewHistorySnapshot, StudySettings,
};
pub use policy::{days_skipped, DailyLoad};
pub use queue::build_study_queue;
pub use storage::{CardStore, FileCardStore, StoreError};
