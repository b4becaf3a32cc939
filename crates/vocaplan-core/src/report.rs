//! Today's words: the units due on a date together with their words.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::model::{ordinal, UnitKey, Word};
use crate::plan::{to_pretty_json, write_file};

/// Words fetched for one due unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodayEntry {
    /// 1-based occurrence rank.
    pub rank: u32,
    pub unit: UnitKey,
    pub words: Vec<Word>,
}

/// Everything due on one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodayReport {
    pub date: NaiveDate,
    /// Entries ordered by ascending rank.
    pub entries: Vec<TodayEntry>,
    /// Units whose words could not be fetched.
    pub failed: Vec<UnitKey>,
}

impl TodayReport {
    pub fn word_count(&self) -> usize {
        self.entries.iter().map(|e| e.words.len()).sum()
    }

    /// Serialize as the today's-words file: ordinal rank label → unit → words.
    pub fn to_words_json(&self) -> Result<String> {
        to_pretty_json(&WordsByRank(&self.entries))
    }

    /// Save the today's-words file.
    pub fn save_words_json(&self, path: &Path) -> Result<()> {
        let json = self.to_words_json()?;
        write_file(path, &json)
            .with_context(|| format!("failed to save today's words to {}", path.display()))
    }
}

struct WordsByRank<'a>(&'a [TodayEntry]);

struct UnitWords<'a>(&'a [TodayEntry]);

impl Serialize for WordsByRank<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for group in self.0.chunk_by(|a, b| a.rank == b.rank) {
            map.serialize_entry(&ordinal(group[0].rank), &UnitWords(group))?;
        }
        map.end()
    }
}

impl Serialize for UnitWords<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in self.0 {
            map.serialize_entry(&entry.unit, &entry.words)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(w: &str) -> Word {
        Word {
            word_id: None,
            word: w.into(),
            meaning_us: format!("meaning of {w}"),
            sentence: String::new(),
        }
    }

    fn make_report() -> TodayReport {
        TodayReport {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            entries: vec![
                TodayEntry {
                    rank: 1,
                    unit: UnitKey::new(1, 2),
                    words: vec![word("Plethora")],
                },
                TodayEntry {
                    rank: 2,
                    unit: UnitKey::new(1, 1),
                    words: vec![word("Ephemeral"), word("Obfuscate")],
                },
            ],
            failed: vec![],
        }
    }

    #[test]
    fn words_json_is_keyed_by_ordinal() {
        let json = make_report().to_words_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["1st"]["list:1,unit:2"][0]["word"], "Plethora");
        assert_eq!(
            value["2nd"]["list:1,unit:1"].as_array().unwrap().len(),
            2
        );
        assert!(json.find("1st").unwrap() < json.find("2nd").unwrap());
    }

    #[test]
    fn empty_report_is_empty_object() {
        let report = TodayReport {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            entries: vec![],
            failed: vec![],
        };
        assert_eq!(report.to_words_json().unwrap(), "{}");
        assert_eq!(report.word_count(), 0);
    }

    #[test]
    fn save_words_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("today_words.json");
        let report = make_report();
        report.save_words_json(&path).unwrap();
        assert_eq!(report.word_count(), 3);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Ephemeral"));
    }

    #[test]
    fn save_error_names_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let err = make_report()
            .save_words_json(&blocker.join("today_words.json"))
            .unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("failed to save today's words"));
        assert!(message.contains("failed to create"));
    }
}
