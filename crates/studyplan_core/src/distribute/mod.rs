//! Study item distribution over plan days.
//!
//! # Responsibility
//! - Partition items into per-subject queues.
//! - Build the subject rotation for the run.
//! - Allocate items day by day with even pacing and subject diversity.
//!
//! # Invariants
//! - Every input item appears exactly once in the output with a day index in
//!   `[0, total_days)`.
//! - Same-subject items keep their relative input order across days.
//! - Output depends only on input order and `total_days`.
//! - Prior day assignments, including completed items, are discarded.

pub mod allocator;
pub mod partition;
pub mod rotation;

use crate::model::item::StudyItem;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub use allocator::allocate;
pub use partition::{partition, SubjectQueue, SubjectQueues};
pub use rotation::{build_rotation, CANONICAL_ROTATION};

/// Rejected distribution input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistributeError {
    /// Day count is zero, negative, or wider than `u32`.
    InvalidDayCount(i64),
}

impl Display for DistributeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDayCount(days) => {
                write!(f, "total_days must be between 1 and {}, got {days}", u32::MAX)
            }
        }
    }
}

impl Error for DistributeError {}

/// Assigns a day to every item across `total_days` days.
///
/// Serves both "generate" and "redistribute": any existing `day_index` is
/// cleared before partitioning. An empty input yields an empty output.
///
/// # Errors
/// - Returns `InvalidDayCount` when `total_days <= 0` or exceeds `u32::MAX`.
pub fn distribute(
    items: impl IntoIterator<Item = StudyItem>,
    total_days: i64,
) -> Result<Vec<StudyItem>, DistributeError> {
    let days = u32::try_from(total_days)
        .ok()
        .filter(|days| *days > 0)
        .ok_or(DistributeError::InvalidDayCount(total_days))?;

    let started_at = Instant::now();
    let queues = partition(items.into_iter().map(|mut item| {
        item.clear_day();
        item
    }));
    let rotation = build_rotation(queues.subjects());
    let item_count = queues.total_len();
    let subject_count = queues.subject_count();

    let distributed = allocate(queues, &rotation, days);

    info!(
        "event=distribute module=distribute status=ok items={} subjects={} days={} duration_ms={}",
        item_count,
        subject_count,
        days,
        started_at.elapsed().as_millis()
    );
    Ok(distributed)
}

/// Counts items per day, from day 0 through the last day holding an item.
///
/// Trailing empty days are omitted, so the result never outgrows the item
/// list. Unassigned items and days at or past `total_days` are not counted.
pub fn day_loads(items: &[StudyItem], total_days: u32) -> Vec<usize> {
    let day_in_plan = |item: &StudyItem| item.day_index.filter(|day| *day < total_days);
    let span = items
        .iter()
        .filter_map(day_in_plan)
        .max()
        .map_or(0, |last| last as usize + 1);
    let mut loads = vec![0usize; span];
    for day in items.iter().filter_map(day_in_plan) {
        loads[day as usize] += 1;
    }
    loads
}

#[cfg(test)]
mod tests {
    use super::{day_loads, distribute, DistributeError};
    use crate::model::item::StudyItem;

    #[test]
    fn rejects_non_positive_day_counts() {
        let items = vec![StudyItem::new("Math", "limits")];
        assert_eq!(
            distribute(items.clone(), 0).unwrap_err(),
            DistributeError::InvalidDayCount(0)
        );
        assert_eq!(
            distribute(items, -3).unwrap_err(),
            DistributeError::InvalidDayCount(-3)
        );
    }

    #[test]
    fn rejects_day_counts_wider_than_u32() {
        let too_many = i64::from(u32::MAX) + 1;
        assert_eq!(
            distribute(Vec::new(), too_many).unwrap_err(),
            DistributeError::InvalidDayCount(too_many)
        );
    }

    #[test]
    fn empty_input_is_not_an_error() {
        assert!(distribute(Vec::new(), 30).unwrap().is_empty());
    }

    #[test]
    fn day_loads_ignores_unassigned_and_out_of_range() {
        let mut a = StudyItem::new("Math", "a");
        a.day_index = Some(1);
        let mut b = StudyItem::new("Math", "b");
        b.day_index = Some(9);
        let c = StudyItem::new("Math", "c");

        assert_eq!(day_loads(&[a, b, c], 3), [0, 1]);
    }

    #[test]
    fn day_loads_stays_small_for_huge_day_counts() {
        let items = vec![
            StudyItem::new("Math", "limits"),
            StudyItem::new("English", "essay"),
            StudyItem::new("Math", "series"),
        ];

        let planned = distribute(items, i64::from(u32::MAX)).unwrap();

        assert_eq!(day_loads(&planned, u32::MAX), [1, 1, 1]);
    }
}
