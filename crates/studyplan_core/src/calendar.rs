//! Day index to calendar date mapping.
//!
//! Planning works on zero-based day indexes only; these helpers anchor them
//! to a plan start date for calendar and print views.

use crate::model::item::StudyItem;
use chrono::{Days, NaiveDate};
use std::collections::BTreeMap;

/// Calendar date of `day_index`, or `None` past the supported date range.
pub fn date_for_day(start: NaiveDate, day_index: u32) -> Option<NaiveDate> {
    start.checked_add_days(Days::new(u64::from(day_index)))
}

/// Day index of `date`, or `None` before `start` or beyond `u32` days.
pub fn day_for_date(start: NaiveDate, date: NaiveDate) -> Option<u32> {
    let offset = date.signed_duration_since(start).num_days();
    u32::try_from(offset).ok()
}

/// Groups items by day, keeping list order per day.
///
/// Only days holding at least one item get an entry. Unassigned items and
/// days at or past `total_days` are skipped.
pub fn group_by_day(items: &[StudyItem], total_days: u32) -> BTreeMap<u32, Vec<&StudyItem>> {
    let mut days: BTreeMap<u32, Vec<&StudyItem>> = BTreeMap::new();
    for item in items {
        if let Some(day) = item.day_index.filter(|day| *day < total_days) {
            days.entry(day).or_default().push(item);
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::{date_for_day, day_for_date, group_by_day};
    use crate::model::item::StudyItem;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn maps_day_index_across_month_end() {
        let start = date(2026, 1, 30);
        assert_eq!(date_for_day(start, 0), Some(start));
        assert_eq!(date_for_day(start, 3), Some(date(2026, 2, 2)));
    }

    #[test]
    fn day_for_date_inverts_date_for_day() {
        let start = date(2026, 2, 27);
        let later = date_for_day(start, 40).expect("in range");
        assert_eq!(day_for_date(start, later), Some(40));
        assert_eq!(day_for_date(start, date(2026, 2, 26)), None);
    }

    #[test]
    fn group_by_day_keeps_order_and_skips_unassigned() {
        let mut first = StudyItem::new("Math", "first");
        first.day_index = Some(1);
        let mut second = StudyItem::new("English", "second");
        second.day_index = Some(1);
        let loose = StudyItem::new("Math", "loose");
        let mut late = StudyItem::new("Math", "late");
        late.day_index = Some(5);
        let items = [first, second, loose, late];

        let days = group_by_day(&items, 2);
        assert_eq!(days.keys().copied().collect::<Vec<_>>(), [1]);
        let topics = days[&1]
            .iter()
            .map(|item| item.topic.as_str())
            .collect::<Vec<_>>();
        assert_eq!(topics, ["first", "second"]);
    }

    #[test]
    fn group_by_day_with_huge_plan_only_holds_occupied_days() {
        let mut early = StudyItem::new("Math", "early");
        early.day_index = Some(0);
        let mut late = StudyItem::new("Math", "late");
        late.day_index = Some(u32::MAX - 1);
        let items = [early, late];

        let days = group_by_day(&items, u32::MAX);

        assert_eq!(days.len(), 2);
        assert_eq!(days[&(u32::MAX - 1)][0].topic, "late");
    }
}
