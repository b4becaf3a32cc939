//! Forgetting-curve schedule generation.
//!
//! One new unit is introduced per day in list-major order, and every unit is
//! reviewed on each offset day after its introduction.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};

use crate::error::ScheduleError;
use crate::model::Curriculum;
use crate::schedule::Schedule;

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, ScheduleError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| ScheduleError::InvalidDate(format!("'{s}': {e}")))
}

fn add_days(date: NaiveDate, days: u64) -> Result<NaiveDate, ScheduleError> {
    date.checked_add_days(Days::new(days)).ok_or_else(|| {
        ScheduleError::InvalidDate(format!("{date} + {days} days is out of range"))
    })
}

/// Generate the review schedule for `curriculum` starting on `start`.
pub fn generate(start: NaiveDate, curriculum: &Curriculum) -> Result<Schedule, ScheduleError> {
    curriculum.validate()?;

    // The last unit's last review is the latest date in the schedule.
    let last_unit_day = curriculum.unit_count().saturating_sub(1) as u64;
    let last_offset = curriculum.offsets.last().copied().unwrap_or(0);
    add_days(start, last_unit_day).and_then(|d| add_days(d, u64::from(last_offset)))?;

    let mut entries = BTreeMap::new();
    for (day, unit) in curriculum.unit_keys().enumerate() {
        let unit_start = add_days(start, day as u64)?;
        let dates = curriculum
            .offsets
            .iter()
            .map(|&offset| add_days(unit_start, u64::from(offset)))
            .collect::<Result<Vec<_>, _>>()?;
        entries.insert(unit, dates);
    }

    tracing::debug!(
        units = entries.len(),
        offsets = curriculum.offsets.len(),
        %start,
        "generated schedule"
    );

    Ok(Schedule {
        entries,
        offset_count: curriculum.offsets.len(),
    })
}

/// Like [`generate`], but takes the start date as an ISO string.
pub fn generate_from_str(start: &str, curriculum: &Curriculum) -> Result<Schedule, ScheduleError> {
    generate(parse_date(start)?, curriculum)
}
