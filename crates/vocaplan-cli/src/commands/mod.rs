pub mod due;
pub mod init;
pub mod new;
pub mod search;
pub mod sort;
pub mod today;
pub mod validate;

use anyhow::Result;
use chrono::NaiveDate;

/// Parse a `--date`/`--start` argument, defaulting to today's local date.
pub(crate) fn date_or_today(arg: Option<&str>) -> Result<NaiveDate> {
    match arg {
        Some(s) => Ok(vocaplan_core::parse_date(s)?),
        None => Ok(chrono::Local::now().date_naive()),
    }
}
