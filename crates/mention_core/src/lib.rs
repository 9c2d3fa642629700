//! Mention encoding core.
//! This crate is the single source of truth for mention token invariants.

pub mod codec;
pub mod logging;
pub mod model;
pub mod service;

pub use codec::render::format_mentions;
pub use codec::stored::{decode, encode, mentioned_ids, MENTION_ID_LEN};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::mention::{DecodedText, MentionCandidate, MentionMeta, MentionValidationError};
pub use service::draft::{DraftError, MentionDraft, SavedDraft};

/// Minimal health-check API for binding smoke tests.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
