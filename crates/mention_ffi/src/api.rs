//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the mention codec and draft editing to Dart via FRB.
//! - Keep error semantics simple: envelopes with `ok` + `message`.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Offsets crossing the boundary are UTF-16 code-unit offsets, the unit Dart
//!   `String` indices use.

use log::warn;
use mention_core::{
    core_version as core_version_inner, decode, encode, format_mentions,
    init_logging as init_logging_inner, mentioned_ids, ping as ping_inner, MentionCandidate,
    MentionDraft, MentionMeta,
};
use uuid::Uuid;

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One mention span as seen by Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionSpan {
    /// Stable identifier from the stored token.
    pub id: String,
    /// Display name without the leading `@`.
    pub name: String,
    /// Inclusive UTF-16 code-unit offset.
    pub start: u32,
    /// Exclusive UTF-16 code-unit offset.
    pub end: u32,
}

/// Decoded display text with its spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPayload {
    /// Editable text with `@name` runs.
    pub display: String,
    /// Spans sorted by ascending `start`.
    pub mentions: Vec<MentionSpan>,
}

/// Result envelope for draft edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftEditResponse {
    /// Whether the edit was applied.
    pub ok: bool,
    /// Display text after the edit (unchanged on failure).
    pub display: String,
    /// Spans after the edit (unchanged on failure).
    pub mentions: Vec<MentionSpan>,
    /// Human-readable diagnostics.
    pub message: String,
}

/// Decodes stored text for editing.
///
/// # FFI contract
/// - Never panics; malformed tokens come back as plain text.
#[flutter_rust_bridge::frb(sync)]
pub fn mention_decode(stored: String) -> DecodedPayload {
    let decoded = decode(stored.as_str());
    DecodedPayload {
        display: decoded.display,
        mentions: decoded.mentions.into_iter().map(to_span).collect(),
    }
}

/// Encodes display text and spans for persistence.
///
/// # FFI contract
/// - Never panics; stale spans are skipped.
#[flutter_rust_bridge::frb(sync)]
pub fn mention_encode(display: String, mentions: Vec<MentionSpan>) -> String {
    let metas = mentions.into_iter().map(to_meta).collect::<Vec<_>>();
    encode(display.as_str(), &metas)
}

/// Lossy `@name` rendering for read-only views.
#[flutter_rust_bridge::frb(sync)]
pub fn mention_format(text: String) -> String {
    format_mentions(text.as_str())
}

/// Ids mentioned in stored text, for notification fan-out.
#[flutter_rust_bridge::frb(sync)]
pub fn mention_ids(stored: String) -> Vec<String> {
    mentioned_ids(stored.as_str())
}

/// Replaces the typed query at `start..end` with a picked candidate.
///
/// # FFI contract
/// - Never panics.
/// - On failure returns `ok=false` and the input state unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn mention_insert(
    display: String,
    mentions: Vec<MentionSpan>,
    start: u32,
    end: u32,
    id: String,
    name: String,
) -> DraftEditResponse {
    let candidate = match parse_candidate(id.as_str(), name) {
        Ok(candidate) => candidate,
        Err(message) => return DraftEditResponse::failure(display, mentions, message),
    };

    let mut draft =
        MentionDraft::from_parts(display.clone(), mentions.iter().cloned().map(to_meta).collect());
    match draft.insert_mention(start as usize, end as usize, &candidate) {
        Ok(_) => {
            let decoded = draft.into_decoded();
            DraftEditResponse {
                ok: true,
                display: decoded.display,
                mentions: decoded.mentions.into_iter().map(to_span).collect(),
                message: "Mention inserted.".to_string(),
            }
        }
        Err(err) => {
            warn!("event=ffi_mention_insert module=ffi status=error");
            DraftEditResponse::failure(display, mentions, format!("mention_insert failed: {err}"))
        }
    }
}

impl DraftEditResponse {
    fn failure(display: String, mentions: Vec<MentionSpan>, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            display,
            mentions,
            message: message.into(),
        }
    }
}

fn parse_candidate(id: &str, name: String) -> Result<MentionCandidate, String> {
    let id = Uuid::parse_str(id.trim())
        .map_err(|err| format!("mention_insert failed: invalid id `{id}`: {err}"))?;
    MentionCandidate::new(id, name).map_err(|err| format!("mention_insert failed: {err}"))
}

fn to_span(meta: MentionMeta) -> MentionSpan {
    MentionSpan {
        id: meta.id,
        name: meta.name,
        start: clamp_offset(meta.start),
        end: clamp_offset(meta.end),
    }
}

fn to_meta(span: MentionSpan) -> MentionMeta {
    MentionMeta {
        id: span.id,
        name: span.name,
        start: span.start as usize,
        end: span.end as usize,
    }
}

fn clamp_offset(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
