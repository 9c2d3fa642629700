//! Mention domain model.
//!
//! # Responsibility
//! - Define the metadata linking a display-text span to a stable identifier.
//! - Validate spans and lookup candidates before they reach the codec.
//!
//! # Invariants
//! - `start`/`end` are UTF-16 code-unit offsets, `end` exclusive, matching the
//!   string indexing of the Dart/JS editors that hold the spans.
//! - A valid span satisfies `display[start..end] == "@" + name`.
//! - Candidate names never contain `]`, so their tokens stay parseable.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::ops::Range;
use uuid::Uuid;

/// Metadata for one mention inside a display text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MentionMeta {
    /// Stable identifier persisted in the stored token.
    pub id: String,
    /// Display name, rendered as `@name`.
    pub name: String,
    /// Inclusive UTF-16 offset of the leading `@`.
    pub start: usize,
    /// Exclusive UTF-16 offset after the last name character.
    pub end: usize,
}

impl MentionMeta {
    /// Creates metadata for `@name` starting at UTF-16 offset `start`.
    ///
    /// `end` is derived from the name length and saturates at `usize::MAX`.
    pub fn new(id: impl Into<String>, name: impl Into<String>, start: usize) -> Self {
        let name = name.into();
        let end = start.saturating_add(utf16_len(name.as_str()).saturating_add(1));
        Self {
            id: id.into(),
            name,
            start,
            end,
        }
    }

    /// Returns the display label `@name`.
    pub fn label(&self) -> String {
        format!("@{}", self.name)
    }

    /// Returns the durable stored token `@[name](id)`.
    pub fn token(&self) -> String {
        format!("@[{}]({})", self.name, self.id)
    }

    /// Returns whether this span overlaps the half-open range `start..end`.
    ///
    /// An empty range (an insertion point) overlaps only spans that strictly
    /// contain it.
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        if start == end {
            return self.start < start && start < self.end;
        }
        self.start < end && start < self.end
    }

    /// Checks this span against `display`.
    ///
    /// # Errors
    /// - `EmptySpan` when `start >= end`.
    /// - `OutOfBounds` when `end` exceeds the display length.
    /// - `LabelMismatch` when the covered text is not `@name`.
    pub fn validate_in(&self, display: &str) -> Result<(), MentionValidationError> {
        self.byte_range_in(display).map(|_| ())
    }

    /// Validates like [`MentionMeta::validate_in`] and returns the covered bytes.
    pub(crate) fn byte_range_in(&self, display: &str) -> Result<Range<usize>, MentionValidationError> {
        if self.start >= self.end {
            return Err(MentionValidationError::EmptySpan {
                start: self.start,
                end: self.end,
            });
        }
        let Some(range) = utf16_range_to_bytes(display, self.start, self.end) else {
            return Err(MentionValidationError::OutOfBounds {
                end: self.end,
                len: utf16_len(display),
            });
        };
        if !label_matches(&display[range.clone()], self.name.as_str()) {
            return Err(MentionValidationError::LabelMismatch {
                start: self.start,
                end: self.end,
            });
        }
        Ok(range)
    }
}

/// Display text plus mention metadata, ordered by ascending `start`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedText {
    /// Text as shown and edited, with plain `@name` runs.
    pub display: String,
    /// Mention spans inside `display`.
    pub mentions: Vec<MentionMeta>,
}

impl DecodedText {
    /// Re-encodes this pair into stored text.
    pub fn encode(&self) -> String {
        crate::codec::stored::encode(self.display.as_str(), &self.mentions)
    }
}

/// A `{id, name}` pair picked from user lookup while typing a mention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionCandidate {
    /// Stable user/contact identifier.
    pub id: Uuid,
    /// Name inserted after `@`.
    pub name: String,
}

impl MentionCandidate {
    /// Creates a validated candidate.
    ///
    /// # Errors
    /// - See [`MentionCandidate::validate`].
    pub fn new(id: Uuid, name: impl Into<String>) -> Result<Self, MentionValidationError> {
        let candidate = Self {
            id,
            name: name.into(),
        };
        candidate.validate()?;
        Ok(candidate)
    }

    /// Validates candidate fields.
    ///
    /// # Errors
    /// - `NilId` when `id` is the nil UUID.
    /// - `EmptyName` when `name` is blank.
    /// - `InvalidName` when `name` contains `]` or a line break.
    pub fn validate(&self) -> Result<(), MentionValidationError> {
        if self.id.is_nil() {
            return Err(MentionValidationError::NilId);
        }
        if self.name.trim().is_empty() {
            return Err(MentionValidationError::EmptyName);
        }
        if self.name.contains([']', '\n', '\r']) {
            return Err(MentionValidationError::InvalidName(self.name.clone()));
        }
        Ok(())
    }

    /// Returns the display label `@name`.
    pub fn label(&self) -> String {
        format!("@{}", self.name)
    }

    /// Converts this candidate into span metadata at `start`.
    pub fn to_meta(&self, start: usize) -> MentionMeta {
        MentionMeta::new(self.id.to_string(), self.name.clone(), start)
    }
}

/// Validation error for mention spans and candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MentionValidationError {
    /// Span has `start >= end`.
    EmptySpan { start: usize, end: usize },
    /// Span ends past the display text or splits a surrogate pair.
    OutOfBounds { end: usize, len: usize },
    /// Covered text no longer reads `@name`.
    LabelMismatch { start: usize, end: usize },
    /// Candidate id is the nil UUID.
    NilId,
    /// Candidate name is blank.
    EmptyName,
    /// Candidate name would break the stored token grammar.
    InvalidName(String),
}

impl Display for MentionValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySpan { start, end } => {
                write!(f, "mention span is empty: start ({start}) >= end ({end})")
            }
            Self::OutOfBounds { end, len } => {
                write!(f, "mention span end ({end}) exceeds text length ({len})")
            }
            Self::LabelMismatch { start, end } => {
                write!(f, "text at {start}..{end} no longer matches the mention label")
            }
            Self::NilId => write!(f, "mention id cannot be nil"),
            Self::EmptyName => write!(f, "mention name cannot be empty"),
            Self::InvalidName(name) => write!(
                f,
                "mention name `{name}` cannot contain `]` or line breaks"
            ),
        }
    }
}

impl Error for MentionValidationError {}

/// Length of `text` in UTF-16 code units.
pub(crate) fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Maps a UTF-16 code-unit range onto byte offsets of `text`.
///
/// Returns `None` when `start > end`, when `end` is past the text, or when
/// either offset falls inside a surrogate pair.
pub(crate) fn utf16_range_to_bytes(text: &str, start: usize, end: usize) -> Option<Range<usize>> {
    if start > end {
        return None;
    }
    let mut units = 0usize;
    let mut start_byte = None;
    let boundaries = text
        .char_indices()
        .map(|(idx, ch)| (idx, ch.len_utf16()))
        .chain(std::iter::once((text.len(), 0)));
    for (idx, width) in boundaries {
        if units == start {
            start_byte = Some(idx);
        }
        if units == end {
            return Some(start_byte?..idx);
        }
        if units > end {
            return None;
        }
        units += width;
    }
    None
}

pub(crate) fn label_matches(covered: &str, name: &str) -> bool {
    covered.strip_prefix('@') == Some(name)
}
