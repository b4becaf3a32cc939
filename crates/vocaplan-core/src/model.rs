//! Core data model types for vocaplan.
//!
//! Unit keys, the curriculum shape, due units, and vocabulary words.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ScheduleError;

/// Default number of lists in the curriculum.
pub const DEFAULT_TOTAL_LISTS: u32 = 34;
/// Default number of units in every list except the last.
pub const DEFAULT_UNITS_PER_LIST: u32 = 10;
/// Default number of units in the final list.
pub const DEFAULT_LAST_LIST_UNITS: u32 = 2;
/// Default forgetting-curve review offsets, in days after a unit's start.
pub const DEFAULT_OFFSETS: [u32; 6] = [0, 1, 2, 4, 7, 15];

/// Identifies one unit of the curriculum.
///
/// Ordering is list-major, unit-minor, which is also the order in which
/// units are introduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitKey {
    pub list: u32,
    pub unit: u32,
}

impl UnitKey {
    pub fn new(list: u32, unit: u32) -> Self {
        Self { list, unit }
    }
}

impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "list:{},unit:{}", self.list, self.unit)
    }
}

impl FromStr for UnitKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (list_part, unit_part) = s
            .split_once(',')
            .ok_or_else(|| format!("unit key must look like 'list:N,unit:M': {s}"))?;

        let list = parse_component(list_part, "list", s)?;
        let unit = parse_component(unit_part, "unit", s)?;
        Ok(UnitKey { list, unit })
    }
}

fn parse_component(part: &str, label: &str, whole: &str) -> Result<u32, String> {
    let value = part
        .strip_prefix(label)
        .and_then(|rest| rest.strip_prefix(':'))
        .ok_or_else(|| format!("expected '{label}:' in unit key: {whole}"))?;

    match value.parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("{label} number must be a positive integer in unit key: {whole}")),
    }
}

impl Serialize for UnitKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for UnitKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The shape of the study material and the review offsets applied to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Curriculum {
    /// Number of lists.
    #[serde(default = "default_total_lists")]
    pub total_lists: u32,
    /// Units in every list but the last.
    #[serde(default = "default_units_per_list")]
    pub units_per_list: u32,
    /// Units in the final list.
    #[serde(default = "default_last_list_units")]
    pub last_list_units: u32,
    /// Days after a unit's start on which it is reviewed.
    #[serde(default = "default_offsets")]
    pub offsets: Vec<u32>,
}

fn default_total_lists() -> u32 {
    DEFAULT_TOTAL_LISTS
}

fn default_units_per_list() -> u32 {
    DEFAULT_UNITS_PER_LIST
}

fn default_last_list_units() -> u32 {
    DEFAULT_LAST_LIST_UNITS
}

fn default_offsets() -> Vec<u32> {
    DEFAULT_OFFSETS.to_vec()
}

impl Default for Curriculum {
    fn default() -> Self {
        Self {
            total_lists: DEFAULT_TOTAL_LISTS,
            units_per_list: DEFAULT_UNITS_PER_LIST,
            last_list_units: DEFAULT_LAST_LIST_UNITS,
            offsets: default_offsets(),
        }
    }
}

impl Curriculum {
    /// Check the shape and offsets, returning the first problem found.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.total_lists == 0 {
            return Err(ScheduleError::InvalidCurriculum(
                "total_lists must be at least 1".into(),
            ));
        }
        if self.units_per_list == 0 {
            return Err(ScheduleError::InvalidCurriculum(
                "units_per_list must be at least 1".into(),
            ));
        }
        if self.last_list_units == 0 {
            return Err(ScheduleError::InvalidCurriculum(
                "last_list_units must be at least 1".into(),
            ));
        }
        if self.last_list_units > self.units_per_list {
            return Err(ScheduleError::InvalidCurriculum(format!(
                "last_list_units ({}) exceeds units_per_list ({})",
                self.last_list_units, self.units_per_list
            )));
        }
        if self.offsets.is_empty() {
            return Err(ScheduleError::InvalidCurriculum(
                "at least one review offset is required".into(),
            ));
        }
        if self.offsets.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ScheduleError::InvalidCurriculum(format!(
                "offsets must be strictly ascending: {:?}",
                self.offsets
            )));
        }
        Ok(())
    }

    /// Number of units in the given 1-based list.
    pub fn units_in(&self, list: u32) -> u32 {
        if list == self.total_lists {
            self.last_list_units
        } else {
            self.units_per_list
        }
    }

    /// Total number of units across all lists.
    pub fn unit_count(&self) -> usize {
        match self.total_lists {
            0 => 0,
            lists => {
                (lists as usize - 1) * self.units_per_list as usize + self.last_list_units as usize
            }
        }
    }

    /// All unit keys in introduction order.
    pub fn unit_keys(&self) -> impl Iterator<Item = UnitKey> + '_ {
        (1..=self.total_lists)
            .flat_map(move |list| (1..=self.units_in(list)).map(move |unit| UnitKey { list, unit }))
    }
}

/// A unit due for review on some date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueUnit {
    /// 1-based occurrence rank: 1 is the first exposure.
    pub rank: u32,
    pub unit: UnitKey,
}

/// One vocabulary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_id: Option<String>,
    pub word: String,
    /// Definition in US English.
    #[serde(rename = "meaning_US", default)]
    pub meaning_us: String,
    /// Example sentence.
    #[serde(default)]
    pub sentence: String,
}

/// English ordinal label for a rank: "1st", "2nd", "3rd", "4th", ..., "11th".
pub fn ordinal(rank: u32) -> String {
    let suffix = match (rank % 10, rank % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{rank}{suffix}")
}
