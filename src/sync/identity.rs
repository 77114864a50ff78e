//! Content-derived sync identity
//!
//! Two devices never share row ids, so "the same card" is decided by
//! content: the sync key is a SHA-256 digest of normalized text. As long as
//! both devices normalize and hash the same way, their keys agree.

use sha2::{Digest, Sha256};

/// Trim, lowercase, and collapse internal whitespace runs to single spaces.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn digest_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Sync key for a deck: digest of its normalized name.
pub fn deck_sync_key(name: &str) -> String {
    digest_hex(normalize(name).as_bytes())
}

/// Sync key for a card: digest of `normalize(front) + NUL + normalize(back)`.
/// The NUL separator keeps ("ab", "c") and ("a", "bc") distinct.
pub fn card_sync_key(front: &str, back: &str) -> String {
    let mut buf = normalize(front).into_bytes();
    buf.push(0);
    buf.extend_from_slice(normalize(back).as_bytes());
    digest_hex(&buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Hello   World  "), "hello world");
        assert_eq!(normalize("one\ttwo\nthree"), "one two three");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_keys_stable_under_whitespace_and_case() {
        assert_eq!(deck_sync_key("Spanish Verbs"), deck_sync_key(" spanish  VERBS "));
        assert_eq!(
            card_sync_key("El Gato", "the cat"),
            card_sync_key("  el   gato", "The Cat  ")
        );
    }

    #[test]
    fn test_different_content_different_keys() {
        assert_ne!(deck_sync_key("Spanish"), deck_sync_key("French"));
        assert_ne!(card_sync_key("a", "b"), card_sync_key("a", "c"));
    }

    #[test]
    fn test_separator_keeps_fields_distinct() {
        assert_ne!(card_sync_key("ab", "c"), card_sync_key("a", "bc"));
    }
}
