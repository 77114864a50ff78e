//! Study queue assembly
//!
//! Interleaves review-due and new cards into one ordered session: three
//! review cards, then one new card, repeating until one side runs out, then
//! the rest of the other side unchanged. Review continuity dominates while
//! fresh material still surfaces at a fixed cadence.

use crate::models::Card;

/// How many review cards to emit between new cards
const REVIEWS_PER_NEW_CARD: usize = 3;

/// Interleave already-truncated review and new card lists.
///
/// If either list is empty the other is returned verbatim. Order within
/// each list is preserved.
pub fn build_study_queue(review_cards: Vec<Card>, new_cards: Vec<Card>) -> Vec<Card> {
    if review_cards.is_empty() {
        return new_cards;
    }
    if new_cards.is_empty() {
        return review_cards;
    }

    let mut queue = Vec::with_capacity(review_cards.len() + new_cards.len());
    let mut reviews = review_cards.into_iter();
    let mut fresh = new_cards.into_iter();

    loop {
        let mut emitted_review = false;
        for _ in 0..REVIEWS_PER_NEW_CARD {
            match reviews.next() {
                Some(card) => {
                    queue.push(card);
                    emitted_review = true;
                }
                None => break,
            }
        }

        match fresh.next() {
            Some(card) => queue.push(card),
            None => {
                // New cards exhausted: drain the remaining reviews
                queue.extend(reviews);
                return queue;
            }
        }

        if !emitted_review {
            // Reviews exhausted: drain the remaining new cards
            queue.extend(fresh);
            return queue;
        }
    }
}
