//! The vocabulary source trait.
//!
//! Implemented by the `vocaplan-sources` crate for the built-in word bank and
//! for remote word services.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::{UnitKey, Word};

/// Word attributes requested for a unit unless the caller asks otherwise.
pub const DEFAULT_ATTRIBUTES: [&str; 4] = ["word_id", "meaning_US", "sentence", "word"];

/// Trait for backends that know the words of each unit.
#[async_trait]
pub trait VocabularySource: Send + Sync {
    /// Human-readable source name (e.g. "builtin").
    fn name(&self) -> &str;

    /// Fetch the words of one unit.
    async fn acquire_unit(&self, request: &UnitRequest) -> anyhow::Result<Vec<Word>>;

    /// Look up a single word's definition.
    async fn lookup(&self, word: &str) -> anyhow::Result<Option<Definition>>;
}

/// Request for the words of one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRequest {
    pub unit: UnitKey,
    /// Word attributes to return.
    pub attributes: Vec<String>,
}

impl UnitRequest {
    pub fn new(unit: UnitKey) -> Self {
        Self {
            unit,
            attributes: DEFAULT_ATTRIBUTES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// A word and its definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    pub word: String,
    pub definition: String,
}
