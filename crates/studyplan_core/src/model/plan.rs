//! Plan-level settings.
//!
//! # Invariants
//! - `total_days` is at least 1 for any persisted or distributed plan.

use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation errors for `PlanSettings`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanValidationError {
    ZeroTotalDays,
}

impl Display for PlanValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroTotalDays => write!(f, "plan total_days must be at least 1"),
        }
    }
}

impl Error for PlanValidationError {}

/// Day count and calendar anchor for one study plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanSettings {
    pub total_days: u32,
    /// Calendar date of day index 0.
    pub start_date: NaiveDate,
}

impl PlanSettings {
    pub fn new(total_days: u32, start_date: NaiveDate) -> Self {
        Self {
            total_days,
            start_date,
        }
    }

    pub fn validate(&self) -> Result<(), PlanValidationError> {
        if self.total_days == 0 {
            return Err(PlanValidationError::ZeroTotalDays);
        }
        Ok(())
    }

    /// Returns whether `day_index` falls inside `[0, total_days)`.
    pub fn contains_day(&self, day_index: u32) -> bool {
        day_index < self.total_days
    }
}
