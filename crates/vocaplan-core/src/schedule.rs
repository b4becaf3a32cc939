//! The unit-indexed review schedule.
//!
//! A `Schedule` can only be obtained from the generator or from
//! [`Schedule::from_entries`], both of which enforce that every unit carries
//! the same number of non-decreasing review dates. Everything downstream
//! (projection, due lookup, serialization) relies on that.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::ScheduleError;
use crate::model::UnitKey;

/// Unit key → review dates, one per offset, in offset order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub(crate) entries: BTreeMap<UnitKey, Vec<NaiveDate>>,
    pub(crate) offset_count: usize,
}

impl Schedule {
    /// Build a schedule from arbitrary entries, validating its structure.
    pub fn from_entries<I>(entries: I) -> Result<Self, ScheduleError>
    where
        I: IntoIterator<Item = (UnitKey, Vec<NaiveDate>)>,
    {
        let mut map = BTreeMap::new();
        let mut offset_count = None;

        for (unit, dates) in entries {
            if dates.is_empty() {
                return Err(ScheduleError::MalformedSchedule(format!(
                    "{unit} has no review dates"
                )));
            }
            match offset_count {
                None => offset_count = Some(dates.len()),
                Some(expected) if expected != dates.len() => {
                    return Err(ScheduleError::MalformedSchedule(format!(
                        "{unit} has {} review dates, expected {expected}",
                        dates.len()
                    )));
                }
                Some(_) => {}
            }
            if let Some(w) = dates.windows(2).find(|w| w[0] > w[1]) {
                return Err(ScheduleError::MalformedSchedule(format!(
                    "{unit} review dates go backwards ({} after {})",
                    w[1], w[0]
                )));
            }
            if map.insert(unit, dates).is_some() {
                return Err(ScheduleError::MalformedSchedule(format!(
                    "{unit} appears more than once"
                )));
            }
        }

        let offset_count = offset_count.ok_or_else(|| {
            ScheduleError::MalformedSchedule("schedule contains no units".into())
        })?;

        Ok(Self {
            entries: map,
            offset_count,
        })
    }

    /// Number of units in the schedule.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of review dates every unit carries.
    pub fn offset_count(&self) -> usize {
        self.offset_count
    }

    /// Review dates for one unit.
    pub fn get(&self, unit: &UnitKey) -> Option<&[NaiveDate]> {
        self.entries.get(unit).map(Vec::as_slice)
    }

    /// The day a unit is first studied.
    pub fn start_date(&self, unit: &UnitKey) -> Option<NaiveDate> {
        self.get(unit).and_then(|dates| dates.first().copied())
    }

    /// Iterate units in list-major, unit-minor order.
    pub fn iter(&self) -> impl Iterator<Item = (&UnitKey, &[NaiveDate])> {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Earliest date anything is scheduled.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.entries.values().filter_map(|d| d.first()).min().copied()
    }

    /// Latest date anything is scheduled.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.entries.values().filter_map(|d| d.last()).max().copied()
    }
}
