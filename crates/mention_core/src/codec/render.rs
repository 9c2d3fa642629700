//! Read-only mention rendering.
//!
//! Lossy and not invertible: ids are discarded. Use only where stored text
//! never has to be rebuilt from the result.

use once_cell::sync::Lazy;
use regex::Regex;

// Looser than the stored grammar: whitespace is allowed before `(` and the id
// shape is not checked.
static LOOSE_MENTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@\[([^\]]+)\]\s*\([^)]+\)").expect("valid loose mention regex"));

/// Replaces every `@[name](id)` (optionally `@[name] (id)`) with `@name`.
pub fn format_mentions(text: &str) -> String {
    LOOSE_MENTION_RE.replace_all(text, "@${1}").into_owned()
}
