//! Mention draft use-case service.
//!
//! # Responsibility
//! - Hold one decode -> edit -> encode cycle for a mention-aware input.
//! - Insert lookup candidates and apply plain-text edits with offset shifts.
//! - Report how many mentions survived on save.
//!
//! # Invariants
//! - Mentions are kept sorted by ascending `start`.
//! - Edits shift spans that start at or after the edited range.
//! - Spans overlapping a plain-text edit are left untouched and become stale.
//! - Offsets are UTF-16 code units; spans whose shifted offsets would overflow
//!   are dropped.

use crate::codec::stored::{decode, splice_mentions};
use crate::model::mention::{
    utf16_len, utf16_range_to_bytes, DecodedText, MentionCandidate, MentionMeta,
    MentionValidationError,
};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error for draft edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    /// Edit range is reversed or past the end of the display text.
    RangeOutOfBounds { start: usize, end: usize, len: usize },
    /// Lookup candidate cannot be encoded as a mention.
    InvalidCandidate(MentionValidationError),
}

impl Display for DraftError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RangeOutOfBounds { start, end, len } => write!(
                f,
                "edit range {start}..{end} is invalid for text of length {len}"
            ),
            Self::InvalidCandidate(err) => write!(f, "invalid mention candidate: {err}"),
        }
    }
}

impl Error for DraftError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidCandidate(err) => Some(err),
            Self::RangeOutOfBounds { .. } => None,
        }
    }
}

impl From<MentionValidationError> for DraftError {
    fn from(value: MentionValidationError) -> Self {
        Self::InvalidCandidate(value)
    }
}

/// Save result for one draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedDraft {
    /// Stored text ready for persistence.
    pub stored: String,
    /// Mentions re-inflated into tokens.
    pub kept: usize,
    /// Mentions skipped because their text was edited away.
    pub dropped: usize,
    /// Why each dropped mention failed validation, in processing order.
    pub skipped: Vec<MentionValidationError>,
}

/// Editing session over one piece of mention-bearing content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MentionDraft {
    display: String,
    mentions: Vec<MentionMeta>,
}

impl MentionDraft {
    /// Starts a draft from persisted text.
    pub fn load(stored: &str) -> Self {
        let DecodedText { display, mentions } = decode(stored);
        Self { display, mentions }
    }

    /// Adopts caller-held display text and spans.
    ///
    /// Spans are not validated here; stale ones are skipped on save.
    pub fn from_parts(display: impl Into<String>, mut mentions: Vec<MentionMeta>) -> Self {
        mentions.sort_by_key(|mention| mention.start);
        Self {
            display: display.into(),
            mentions,
        }
    }

    /// Current display text.
    pub fn display(&self) -> &str {
        self.display.as_str()
    }

    /// Current spans, by ascending `start`.
    pub fn mentions(&self) -> &[MentionMeta] {
        &self.mentions
    }

    /// Consumes the draft into its decoded form.
    pub fn into_decoded(self) -> DecodedText {
        DecodedText {
            display: self.display,
            mentions: self.mentions,
        }
    }

    /// Replaces the typed query at `start..end` with the candidate's `@name`.
    ///
    /// Spans overlapping the query are removed; spans after it shift.
    ///
    /// # Errors
    /// - `InvalidCandidate` when the candidate fails validation.
    /// - `RangeOutOfBounds` when `start..end` is not inside the display text.
    pub fn insert_mention(
        &mut self,
        start: usize,
        end: usize,
        candidate: &MentionCandidate,
    ) -> Result<MentionMeta, DraftError> {
        candidate.validate()?;
        let label = candidate.label();
        self.splice(start, end, label.as_str())?;

        let inserted = candidate.to_meta(start);
        self.mentions.retain(|mention| !mention.overlaps(start, end));
        self.shift_after(start, end, utf16_len(label.as_str()));
        let at = self
            .mentions
            .partition_point(|mention| mention.start < inserted.start);
        self.mentions.insert(at, inserted.clone());

        debug!(
            "event=draft_insert_mention module=draft status=ok mentions={}",
            self.mentions.len()
        );
        Ok(inserted)
    }

    /// Replaces `start..end` with plain `text`.
    ///
    /// # Errors
    /// - `RangeOutOfBounds` when `start..end` is not inside the display text.
    pub fn replace_range(&mut self, start: usize, end: usize, text: &str) -> Result<(), DraftError> {
        self.splice(start, end, text)?;
        self.shift_after(start, end, utf16_len(text));
        Ok(())
    }

    /// Encodes the draft for persistence.
    pub fn save(&self) -> SavedDraft {
        let (stored, skipped) = splice_mentions(self.display.as_str(), &self.mentions);
        let dropped = skipped.len();
        let kept = self.mentions.len() - dropped;
        if dropped > 0 {
            let mismatched = skipped
                .iter()
                .filter(|err| matches!(err, MentionValidationError::LabelMismatch { .. }))
                .count();
            info!(
                "event=draft_save module=draft status=degraded kept={} dropped={} mismatched={}",
                kept, dropped, mismatched
            );
        }
        SavedDraft {
            stored,
            kept,
            dropped,
            skipped,
        }
    }

    fn splice(&mut self, start: usize, end: usize, text: &str) -> Result<(), DraftError> {
        let range = utf16_range_to_bytes(self.display.as_str(), start, end).ok_or_else(|| {
            DraftError::RangeOutOfBounds {
                start,
                end,
                len: utf16_len(self.display.as_str()),
            }
        })?;
        self.display.replace_range(range, text);
        Ok(())
    }

    fn shift_after(&mut self, start: usize, end: usize, inserted: usize) {
        let Some(growth) = start.checked_add(inserted) else {
            return;
        };
        let before = self.mentions.len();
        self.mentions.retain_mut(|mention| {
            if mention.start < end {
                return true;
            }
            // `start >= end` here; caller-supplied `end` may still be reversed.
            let shifted = mention
                .start
                .checked_add(growth)
                .zip(mention.end.checked_add(growth));
            match shifted {
                Some((new_start, new_end)) => {
                    mention.start = new_start - end;
                    mention.end = new_end.saturating_sub(end);
                    true
                }
                None => false,
            }
        });
        if self.mentions.len() < before {
            debug!(
                "event=draft_shift module=draft status=degraded overflowed={}",
                before - self.mentions.len()
            );
        }
    }
}
