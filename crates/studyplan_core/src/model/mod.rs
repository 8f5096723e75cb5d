//! Study plan domain model.
//!
//! # Responsibility
//! - Define the canonical study item record shared by plan views.
//! - Define plan-level settings (day count and start date).
//!
//! # Invariants
//! - Every study item is identified by a stable, non-nil `ItemId`.
//! - `day_index` is the only field written by the distribution core.

pub mod item;
pub mod plan;
