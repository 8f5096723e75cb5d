//! Flutter-facing bindings for the study plan core.

pub mod api;
