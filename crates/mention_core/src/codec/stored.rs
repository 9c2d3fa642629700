//! Stored-text mention codec.
//!
//! # Responsibility
//! - Decode `@[name](id)` tokens into display text plus span metadata.
//! - Re-inflate still-valid spans into tokens on save.
//!
//! # Invariants
//! - Neither direction fails; malformed tokens stay plain text and stale
//!   spans are skipped.
//! - Encode splices right-to-left so unprocessed offsets stay valid.
//! - Logs carry counts and lengths only, never text or names.

use crate::model::mention::{utf16_len, DecodedText, MentionMeta, MentionValidationError};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Canonical identifier length (hyphenated UUID shape).
pub const MENTION_ID_LEN: usize = 36;

// `\w` is spelled out as ASCII; ids are hex UUIDs and must not widen to Unicode
// word characters.
static MENTION_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"@\[([^\]]+?)\]\(([A-Za-z0-9_-]{36})\)").expect("valid mention token regex")
});

/// Decodes stored text into display text and ordered mention spans.
///
/// Every well-formed token `@[name](id)` becomes `@name`; all other input is
/// copied verbatim. Spans are returned by ascending `start`, in UTF-16
/// code units of the display text.
pub fn decode(stored: &str) -> DecodedText {
    let mut display = String::with_capacity(stored.len());
    let mut display_units = 0usize;
    let mut mentions = Vec::new();
    let mut cursor = 0usize;

    for caps in MENTION_TOKEN_RE.captures_iter(stored) {
        let (Some(whole), Some(name), Some(id)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };

        let literal = &stored[cursor..whole.start()];
        display.push_str(literal);
        display_units += utf16_len(literal);

        let meta = MentionMeta::new(id.as_str(), name.as_str(), display_units);
        display.push('@');
        display.push_str(name.as_str());
        display_units = meta.end;
        mentions.push(meta);

        cursor = whole.end();
    }
    display.push_str(&stored[cursor..]);

    debug!(
        "event=mention_decode module=codec status=ok input_len={} mentions={}",
        stored.len(),
        mentions.len()
    );

    DecodedText { display, mentions }
}

/// Encodes display text back into stored text.
///
/// Spans may arrive in any order. A span whose covered text no longer reads
/// `@name` is skipped and its text stays as typed. Overlapping spans resolve
/// by processing order (descending `start`, input order on ties).
pub fn encode(display: &str, mentions: &[MentionMeta]) -> String {
    splice_mentions(display, mentions).0
}

/// Encodes like [`encode`] and also returns why each skipped span failed.
pub(crate) fn splice_mentions(
    display: &str,
    mentions: &[MentionMeta],
) -> (String, Vec<MentionValidationError>) {
    if mentions.is_empty() {
        return (display.to_string(), Vec::new());
    }

    let mut ordered: Vec<&MentionMeta> = mentions.iter().collect();
    ordered.sort_by(|left, right| right.start.cmp(&left.start));

    let mut stored = display.to_string();
    let mut skipped = Vec::new();
    for mention in ordered {
        match mention.byte_range_in(stored.as_str()) {
            Ok(range) => stored.replace_range(range, mention.token().as_str()),
            Err(err) => skipped.push(err),
        }
    }

    debug!(
        "event=mention_encode module=codec status=ok input_len={} applied={} skipped={}",
        display.len(),
        mentions.len() - skipped.len(),
        skipped.len()
    );

    (stored, skipped)
}

/// Returns ids of well-formed tokens in document order, without duplicates.
pub fn mentioned_ids(stored: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    MENTION_TOKEN_RE
        .captures_iter(stored)
        .filter_map(|caps| caps.get(2).map(|id| id.as_str().to_string()))
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{decode, encode, splice_mentions, MENTION_ID_LEN};
    use crate::model::mention::{MentionMeta, MentionValidationError};

    const ALICE: &str = "11111111-1111-1111-1111-111111111111";

    #[test]
    fn id_length_matches_hyphenated_uuid() {
        assert_eq!(ALICE.len(), MENTION_ID_LEN);
    }

    #[test]
    fn decode_rejects_unicode_word_chars_in_id() {
        let stored = format!("@[Alice]({}é)", &ALICE[..35]);
        let decoded = decode(&stored);
        assert!(decoded.mentions.is_empty());
        assert_eq!(decoded.display, stored);
    }

    #[test]
    fn splice_counts_only_applied_spans() {
        let valid = MentionMeta::new(ALICE, "Alice", 0);
        let stale = MentionMeta::new(ALICE, "Bob", 7);
        let (stored, skipped) = splice_mentions("@Alice Bob", &[valid, stale]);
        assert_eq!(stored, format!("@[Alice]({ALICE}) Bob"));
        assert_eq!(
            skipped,
            vec![MentionValidationError::OutOfBounds { end: 11, len: 10 }]
        );
    }

    #[test]
    fn encode_skips_reversed_and_empty_spans() {
        let mut reversed = MentionMeta::new(ALICE, "Alice", 0);
        reversed.start = 6;
        reversed.end = 0;
        let mut empty = MentionMeta::new(ALICE, "Alice", 0);
        empty.end = 0;
        assert_eq!(encode("@Alice", &[reversed, empty]), "@Alice");
    }
}
