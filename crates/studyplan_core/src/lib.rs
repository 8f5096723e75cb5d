//! Core domain logic for the study plan tracker.
//! This crate owns day distribution and the plan persistence boundary.

pub mod calendar;
pub mod db;
pub mod distribute;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use calendar::{date_for_day, day_for_date, group_by_day};
pub use distribute::{day_loads, distribute, DistributeError, CANONICAL_ROTATION};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::item::{ItemId, ItemValidationError, StudyItem};
pub use model::plan::{PlanSettings, PlanValidationError};
pub use repo::plan_repo::{PlanRepository, RepoError, RepoResult, SqlitePlanRepository};
pub use service::plan_service::{PlanService, PlanServiceError, PlanServiceResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
