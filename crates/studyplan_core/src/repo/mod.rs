//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define plan storage contracts used by the plan service.
//! - Isolate SQLite query details from planning logic.
//!
//! # Invariants
//! - Repository writes enforce item/settings validation before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod plan_repo;
