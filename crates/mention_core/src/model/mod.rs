//! Mention domain model.
//!
//! # Responsibility
//! - Define the structures exchanged between the codec, drafts and callers.
//!
//! # Invariants
//! - Offsets are UTF-16 code-unit offsets into display text.

pub mod mention;
