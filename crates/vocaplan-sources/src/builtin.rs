//! Built-in sample word bank.
//!
//! A handful of GRE words so vocaplan works without a word service. All of
//! them belong to `list:1,unit:1`; every other unit is empty.

use async_trait::async_trait;

use vocaplan_core::model::{UnitKey, Word};
use vocaplan_core::traits::{Definition, UnitRequest, VocabularySource};

/// (word, definition, example)
const SAMPLE_WORDS: [(&str, &str, &str); 5] = [
    (
        "Ephemeral",
        "Lasting for a very short time.",
        "Fashions are ephemeral.",
    ),
    (
        "Pernicious",
        "Having a harmful effect, especially in a gradual or subtle way.",
        "The pernicious influences of the mass media.",
    ),
    (
        "Ameliorate",
        "Make (something bad or unsatisfactory) better.",
        "The reform did much to ameliorate living standards.",
    ),
    (
        "Obfuscate",
        "Render obscure, unclear, or unintelligible.",
        "The spelling changes will deform some familiar words and obfuscate their etymological origins.",
    ),
    (
        "Plethora",
        "A large or excessive amount of (something).",
        "A plethora of committees and subcommittees.",
    ),
];

const SAMPLE_UNIT: UnitKey = UnitKey { list: 1, unit: 1 };

/// Word bank compiled into the binary.
pub struct BuiltinSource {
    words: Vec<(UnitKey, Word)>,
}

impl BuiltinSource {
    pub fn new() -> Self {
        let words = SAMPLE_WORDS
            .iter()
            .enumerate()
            .map(|(i, (word, definition, example))| {
                (
                    SAMPLE_UNIT,
                    Word {
                        word_id: Some((i + 1).to_string()),
                        word: word.to_string(),
                        meaning_us: definition.to_string(),
                        sentence: example.to_string(),
                    },
                )
            })
            .collect();
        Self { words }
    }
}

impl Default for BuiltinSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VocabularySource for BuiltinSource {
    fn name(&self) -> &str {
        "builtin"
    }

    async fn acquire_unit(&self, request: &UnitRequest) -> anyhow::Result<Vec<Word>> {
        Ok(self
            .words
            .iter()
            .filter(|(unit, _)| *unit == request.unit)
            .map(|(_, word)| word.clone())
            .collect())
    }

    async fn lookup(&self, word: &str) -> anyhow::Result<Option<Definition>> {
        let needle = word.trim();
        Ok(self
            .words
            .iter()
            .find(|(_, w)| w.word.eq_ignore_ascii_case(needle))
            .map(|(_, w)| Definition {
                word: w.word.clone(),
                definition: w.meaning_us.clone(),
            }))
    }
}
