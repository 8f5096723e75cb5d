//! Round-robin day allocator.
//!
//! # Responsibility
//! - Walk the rotation pick by pick, filling each day up to its target.
//! - Stamp every popped item with its day index.
//!
//! # Invariants
//! - The rotation cursor is owned by the whole run and never reset per day.
//! - A day never receives more than `ceil(remaining / remaining_days)` items.
//! - Items of one subject leave their queue in FIFO order.
//! - Output is day-ascending, and in pop order within a day.

use super::partition::SubjectQueues;
use crate::model::item::StudyItem;
use log::debug;

/// Consecutive empty rotation picks tolerated per rotation entry before a
/// day switches to the fallback scan.
const ATTEMPTS_PER_ROTATION_ENTRY: usize = 2;

/// Assigns every queued item to a day in `[0, total_days)`.
///
/// Rotation subjects without a queue are skipped like empty queues. Once the
/// consecutive-miss counter exceeds `2 * rotation.len()`, the rest of that day
/// pops from the first non-empty queue in first-seen subject order.
///
/// With `total_days == 0` no day runs and the result is empty; callers guard
/// against that via `distribute`.
pub fn allocate(
    mut queues: SubjectQueues,
    rotation: &[String],
    total_days: u32,
) -> Vec<StudyItem> {
    let slots = rotation
        .iter()
        .map(|subject| queues.position(subject))
        .collect::<Vec<_>>();
    let max_attempts = slots.len() * ATTEMPTS_PER_ROTATION_ENTRY;

    let mut remaining = queues.total_len();
    let mut output = Vec::with_capacity(remaining);
    let mut cursor = 0usize;
    let mut fallback_days = 0usize;

    for day in 0..total_days {
        if remaining == 0 {
            break;
        }

        let remaining_days = (total_days - day) as usize;
        let daily_target = remaining.div_ceil(remaining_days);
        let mut placed = 0usize;
        let mut attempts = 0usize;
        let mut fallback = slots.is_empty();

        while placed < daily_target && remaining > 0 {
            if !fallback && attempts > max_attempts {
                fallback = true;
            }

            let popped = if fallback {
                match queues.pop_first_available() {
                    Some(item) => Some(item),
                    None => break,
                }
            } else {
                let popped = slots[cursor].and_then(|position| queues.pop_at(position));
                cursor = (cursor + 1) % slots.len();
                popped
            };

            match popped {
                Some(mut item) => {
                    item.day_index = Some(day);
                    output.push(item);
                    placed += 1;
                    remaining -= 1;
                    attempts = 0;
                }
                None => attempts += 1,
            }
        }

        if fallback {
            fallback_days += 1;
        }
    }

    debug!(
        "event=distribute_allocate module=distribute status=ok items={} days={} rotation_len={} fallback_days={} unplaced={}",
        output.len(),
        total_days,
        rotation.len(),
        fallback_days,
        remaining
    );

    output
}
