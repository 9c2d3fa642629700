//! Core use-case services.
//!
//! # Responsibility
//! - Wrap codec calls into editing-session APIs for UI/FFI callers.

pub mod draft;
