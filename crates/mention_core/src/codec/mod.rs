//! Mention encoding between stored and display text.
//!
//! # Responsibility
//! - `stored`: lossless decode/encode of `@[name](id)` tokens.
//! - `render`: lossy formatting for read-only views.

pub mod render;
pub mod stored;
