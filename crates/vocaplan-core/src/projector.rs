//! Date-indexed views of a schedule.
//!
//! All three operations walk the schedule in its natural order (list-major,
//! unit-minor, then offset index), which fixes the order of same-day entries.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::model::{DueUnit, UnitKey};
use crate::schedule::Schedule;

/// Review date → `(unit, offset index)` pairs scheduled on that date.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DateIndexedSchedule {
    buckets: BTreeMap<NaiveDate, Vec<(UnitKey, usize)>>,
}

impl DateIndexedSchedule {
    /// Pairs scheduled on `date`. Empty when nothing is due.
    pub fn get(&self, date: &NaiveDate) -> &[(UnitKey, usize)] {
        self.buckets.get(date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate dates in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &[(UnitKey, usize)])> {
        self.buckets.iter().map(|(d, v)| (d, v.as_slice()))
    }

    /// Number of distinct dates with something scheduled.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total `(date, unit, index)` triples.
    pub fn occurrence_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

/// Invert a schedule into date buckets.
pub fn project(schedule: &Schedule) -> DateIndexedSchedule {
    let mut buckets: BTreeMap<NaiveDate, Vec<(UnitKey, usize)>> = BTreeMap::new();
    for (unit, dates) in schedule.iter() {
        for (index, date) in dates.iter().enumerate() {
            buckets.entry(*date).or_default().push((*unit, index));
        }
    }
    DateIndexedSchedule { buckets }
}

/// Units due on `date`, with 1-based occurrence ranks.
///
/// Ordered by ascending rank so the day's new unit comes first; entries with
/// equal rank keep schedule order.
pub fn due_on(schedule: &Schedule, date: NaiveDate) -> Vec<DueUnit> {
    let mut due: Vec<DueUnit> = schedule
        .iter()
        .flat_map(|(unit, dates)| {
            dates
                .iter()
                .enumerate()
                .filter(move |(_, d)| **d == date)
                .map(move |(index, _)| DueUnit {
                    rank: index as u32 + 1,
                    unit: *unit,
                })
        })
        .collect();
    due.sort_by_key(|d| d.rank);
    due
}

/// The date-based plan: every review date in ascending order with its
/// `(unit, rank)` pairs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DatePlan {
    pub(crate) days: BTreeMap<NaiveDate, Vec<(UnitKey, u32)>>,
}

impl DatePlan {
    pub fn get(&self, date: &NaiveDate) -> &[(UnitKey, u32)] {
        self.days.get(date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &[(UnitKey, u32)])> {
        self.days.iter().map(|(d, v)| (d, v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Reshape a schedule into the date-based plan.
pub fn resequence_by_date(schedule: &Schedule) -> DatePlan {
    let days = project(schedule)
        .buckets
        .into_iter()
        .map(|(date, pairs)| {
            let ranked = pairs
                .into_iter()
                .map(|(unit, index)| (unit, index as u32 + 1))
                .collect();
            (date, ranked)
        })
        .collect();
    DatePlan { days }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{generate_from_str, parse_date};
    use crate::model::Curriculum;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn default_schedule() -> Schedule {
        generate_from_str("2024-01-01", &Curriculum::default()).unwrap()
    }

    #[test]
    fn projection_is_complete() {
        let schedule = default_schedule();
        let projected = project(&schedule);
        assert_eq!(projected.occurrence_count(), 332 * 6);
    }

    #[test]
    fn projection_bucket_order_follows_schedule_order() {
        let projected = project(&default_schedule());
        assert_eq!(
            projected.get(&d("2024-01-02")),
            &[(UnitKey::new(1, 1), 1), (UnitKey::new(1, 2), 0)]
        );
        assert!(projected.get(&d("2023-12-31")).is_empty());
    }

    #[test]
    fn due_on_second_day() {
        let due = due_on(&default_schedule(), d("2024-01-02"));
        assert_eq!(
            due,
            vec![
                DueUnit {
                    rank: 1,
                    unit: UnitKey::new(1, 2)
                },
                DueUnit {
                    rank: 2,
                    unit: UnitKey::new(1, 1)
                },
            ]
        );
    }

    #[test]
    fn due_on_steady_state_day() {
        // Day 16 of the plan: one unit for each of the six offsets.
        let due = due_on(&default_schedule(), d("2024-01-16"));
        let ranks: Vec<u32> = due.iter().map(|u| u.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(due[0].unit, UnitKey::new(2, 6));
        assert_eq!(due[5].unit, UnitKey::new(1, 1));
    }

    #[test]
    fn due_on_out_of_range_is_empty() {
        let schedule = default_schedule();
        assert!(due_on(&schedule, d("2023-12-31")).is_empty());
        assert!(due_on(&schedule, d("2030-01-01")).is_empty());
    }

    #[test]
    fn due_on_matches_projection() {
        let schedule = default_schedule();
        let projected = project(&schedule);
        for (date, pairs) in projected.iter() {
            let due = due_on(&schedule, *date);
            assert_eq!(due.len(), pairs.len());
            for (unit, index) in pairs {
                assert!(due.contains(&DueUnit {
                    rank: *index as u32 + 1,
                    unit: *unit
                }));
            }
        }
    }

    #[test]
    fn resequence_is_sorted_and_ranked() {
        let plan = resequence_by_date(&default_schedule());
        let dates: Vec<NaiveDate> = plan.iter().map(|(d, _)| *d).collect();
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(dates.first(), Some(&d("2024-01-01")));
        assert_eq!(
            plan.get(&d("2024-01-02")),
            &[(UnitKey::new(1, 1), 2), (UnitKey::new(1, 2), 1)]
        );
        let total: usize = plan.iter().map(|(_, p)| p.len()).sum();
        assert_eq!(total, 332 * 6);
    }
}
