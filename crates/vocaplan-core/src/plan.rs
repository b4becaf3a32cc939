//! Plan files: JSON persistence of the unit-indexed schedule and the
//! date-based plan.
//!
//! Plan file:
//!
//! ```json
//! {
//!     "list:1,unit:1": { "0": "2024-01-01", "1": "2024-01-02", ... },
//!     ...
//! }
//! ```
//!
//! Date-based plan:
//!
//! ```json
//! {
//!     "2024-01-02": [["list:1,unit:1", "1"], ["list:1,unit:2", "0"]],
//!     ...
//! }
//! ```
//!
//! Both are written with four-space indentation and keys in schedule order.

use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::de::{MapAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq, SerializeTuple};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ScheduleError;
use crate::model::UnitKey;
use crate::projector::DatePlan;
use crate::schedule::Schedule;

/// On-disk shape of a plan before structural validation. Entries keep file
/// order and repeated keys are preserved so validation can reject them.
struct RawPlan(Vec<(UnitKey, RawDates)>);

/// Offset index → date pairs of one unit, in file order.
struct RawDates(Vec<(usize, NaiveDate)>);

struct PairsVisitor<K, V>(PhantomData<(K, V)>);

impl<'de, K: Deserialize<'de>, V: Deserialize<'de>> Visitor<'de> for PairsVisitor<K, V> {
    type Value = Vec<(K, V)>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(pair) = map.next_entry()? {
            pairs.push(pair);
        }
        Ok(pairs)
    }
}

impl<'de> Deserialize<'de> for RawPlan {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer
            .deserialize_map(PairsVisitor(PhantomData))
            .map(RawPlan)
    }
}

impl<'de> Deserialize<'de> for RawDates {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer
            .deserialize_map(PairsVisitor(PhantomData))
            .map(RawDates)
    }
}

/// Order one unit's dates by offset index. Indices must be unique and run
/// contiguously from 0.
fn ordered_dates(
    unit: &UnitKey,
    RawDates(mut indexed): RawDates,
) -> Result<Vec<NaiveDate>, ScheduleError> {
    indexed.sort_by_key(|(index, _)| *index);
    if let Some(w) = indexed.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(ScheduleError::MalformedSchedule(format!(
            "{unit} offset index {} appears more than once",
            w[0].0
        )));
    }
    if !indexed.iter().map(|(index, _)| *index).eq(0..indexed.len()) {
        return Err(ScheduleError::MalformedSchedule(format!(
            "{unit} offset indices must run 0..{}, found {:?}",
            indexed.len(),
            indexed.iter().map(|(index, _)| *index).collect::<Vec<_>>()
        )));
    }
    Ok(indexed.into_iter().map(|(_, date)| date).collect())
}

struct ReviewDates<'a>(&'a [NaiveDate]);

impl Serialize for ReviewDates<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (index, date) in self.0.iter().enumerate() {
            map.serialize_entry(&index.to_string(), date)?;
        }
        map.end()
    }
}

impl Serialize for Schedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (unit, dates) in self.iter() {
            map.serialize_entry(unit, &ReviewDates(dates))?;
        }
        map.end()
    }
}

struct DayEntry<'a>(&'a UnitKey, u32);

impl Serialize for DayEntry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(self.0)?;
        tuple.serialize_element(&(self.1 - 1).to_string())?;
        tuple.end()
    }
}

struct DayEntries<'a>(&'a [(UnitKey, u32)]);

impl Serialize for DayEntries<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for (unit, rank) in self.0 {
            seq.serialize_element(&DayEntry(unit, *rank))?;
        }
        seq.end()
    }
}

impl Serialize for DatePlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (date, entries) in self.iter() {
            map.serialize_entry(date, &DayEntries(entries))?;
        }
        map.end()
    }
}

/// Serialize with the four-space indentation plan files use.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .context("failed to serialize JSON")?;
    String::from_utf8(buf).context("serialized JSON is not UTF-8")
}

pub(crate) fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

impl Schedule {
    /// The plan file contents for this schedule.
    pub fn to_json_string(&self) -> Result<String> {
        to_pretty_json(self)
    }

    /// Parse and validate plan file contents.
    ///
    /// Structural problems surface as [`ScheduleError::MalformedSchedule`]
    /// inside the returned error.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let RawPlan(raw) =
            serde_json::from_str(content).context("failed to parse plan JSON")?;

        let mut entries = Vec::with_capacity(raw.len());
        for (unit, indexed) in raw {
            let dates = ordered_dates(&unit, indexed)?;
            entries.push((unit, dates));
        }

        Ok(Schedule::from_entries(entries)?)
    }

    /// Save the plan file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = self.to_json_string().context("failed to serialize plan")?;
        write_file(path, &json)?;
        tracing::info!(path = %path.display(), units = self.len(), "saved plan");
        Ok(())
    }

    /// Load a plan file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read plan from {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("invalid plan file: {}", path.display()))
    }
}

impl DatePlan {
    pub fn to_json_string(&self) -> Result<String> {
        to_pretty_json(self)
    }

    /// Save the date-based plan file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = self
            .to_json_string()
            .context("failed to serialize date-based plan")?;
        write_file(path, &json)?;
        tracing::info!(path = %path.display(), days = self.len(), "saved date-based plan");
        Ok(())
    }
}

/// Where the date-based plan for `plan_path` goes: `<stem>_sorted.json`
/// in the same directory.
pub fn sorted_plan_path(plan_path: &Path) -> PathBuf {
    let stem = plan_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "plan".to_string());
    plan_path.with_file_name(format!("{stem}_sorted.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate_from_str;
    use crate::model::Curriculum;
    use crate::projector::resequence_by_date;

    fn small_schedule() -> Schedule {
        let c = Curriculum {
            total_lists: 2,
            units_per_list: 2,
            last_list_units: 1,
            offsets: vec![0, 1],
        };
        generate_from_str("2024-01-01", &c).unwrap()
    }

    #[test]
    fn plan_json_shape() {
        let json = small_schedule().to_json_string().unwrap();
        let expected = r#"{
    "list:1,unit:1": {
        "0": "2024-01-01",
        "1": "2024-01-02"
    },
    "list:1,unit:2": {
        "0": "2024-01-02",
        "1": "2024-01-03"
    },
    "list:2,unit:1": {
        "0": "2024-01-03",
        "1": "2024-01-04"
    }
}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn plan_keys_keep_natural_order() {
        let schedule = generate_from_str("2024-01-01", &Curriculum::default()).unwrap();
        let json = schedule.to_json_string().unwrap();
        let list2 = json.find("\"list:2,unit:1\"").unwrap();
        let list10 = json.find("\"list:10,unit:1\"").unwrap();
        assert!(list2 < list10);
    }

    #[test]
    fn date_plan_json_shape() {
        let json = resequence_by_date(&small_schedule()).to_json_string().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value["2024-01-02"],
            serde_json::json!([["list:1,unit:1", "1"], ["list:1,unit:2", "0"]])
        );
        assert!(json.find("2024-01-01").unwrap() < json.find("2024-01-04").unwrap());
    }

    #[test]
    fn save_and_load_plan() {
        let schedule = generate_from_str("2024-01-01", &Curriculum::default()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plans").join("gre_default_plan.json");

        schedule.save_json(&path).unwrap();
        let loaded = Schedule::load_json(&path).unwrap();
        assert_eq!(loaded, schedule);
    }

    #[test]
    fn load_rejects_inconsistent_offsets() {
        let content = r#"{
            "list:1,unit:1": {"0": "2024-01-01", "1": "2024-01-02"},
            "list:1,unit:2": {"0": "2024-01-02"}
        }"#;
        let err = Schedule::from_json_str(content).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScheduleError>(),
            Some(ScheduleError::MalformedSchedule(_))
        ));
    }

    #[test]
    fn load_rejects_gapped_indices() {
        let content = r#"{"list:1,unit:1": {"0": "2024-01-01", "2": "2024-01-03"}}"#;
        let err = Schedule::from_json_str(content).unwrap_err();
        assert!(err.to_string().contains("offset indices"));
    }

    #[test]
    fn load_rejects_duplicate_unit_keys() {
        let content = r#"{
            "list:1,unit:1": {"0": "2024-01-01", "1": "2024-01-02"},
            "list:1,unit:2": {"0": "2024-01-02", "1": "2024-01-03"},
            "list:1,unit:1": {"0": "2025-06-01", "1": "2025-06-02"}
        }"#;
        let err = Schedule::from_json_str(content).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScheduleError>(),
            Some(ScheduleError::MalformedSchedule(msg)) if msg.contains("list:1,unit:1")
        ));
    }

    #[test]
    fn load_rejects_duplicate_offset_indices() {
        let content = r#"{"list:1,unit:1": {"0": "2024-01-01", "1": "2024-01-02", "1": "2024-01-09"}}"#;
        let err = Schedule::from_json_str(content).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScheduleError>(),
            Some(ScheduleError::MalformedSchedule(msg)) if msg.contains("offset index 1")
        ));
    }

    #[test]
    fn load_accepts_indices_out_of_file_order() {
        let content = r#"{"list:1,unit:1": {"1": "2024-01-02", "0": "2024-01-01"}}"#;
        let schedule = Schedule::from_json_str(content).unwrap();
        assert_eq!(
            schedule.get(&UnitKey::new(1, 1)).unwrap(),
            &[
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
            ]
        );
    }

    #[test]
    fn load_rejects_bad_keys_and_dates() {
        assert!(Schedule::from_json_str(r#"{"unit:1": {"0": "2024-01-01"}}"#).is_err());
        assert!(Schedule::from_json_str(r#"{"list:1,unit:1": {"0": "yesterday"}}"#).is_err());
        assert!(Schedule::from_json_str("not json").is_err());
    }

    #[test]
    fn sorted_path_naming() {
        assert_eq!(
            sorted_plan_path(Path::new("plans/gre_default_plan.json")),
            PathBuf::from("plans/gre_default_plan_sorted.json")
        );
        assert_eq!(
            sorted_plan_path(Path::new("plan.json")),
            PathBuf::from("plan_sorted.json")
        );
    }
}
