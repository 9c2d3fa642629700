//! Flutter-facing bindings for the mention core.

pub mod api;
