//! Mock source for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use vocaplan_core::error::SourceError;
use vocaplan_core::model::{UnitKey, Word};
use vocaplan_core::traits::{Definition, UnitRequest, VocabularySource};

/// A mock vocabulary source for exercising the fetcher and CLI flows
/// without a word service.
pub struct MockSource {
    /// Unit → words.
    units: HashMap<UnitKey, Vec<Word>>,
    /// Word → definition.
    definitions: HashMap<String, String>,
    /// Whether unknown units are an error or simply empty.
    strict: bool,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last request received.
    last_request: Mutex<Option<UnitRequest>>,
}

impl MockSource {
    pub fn new(units: HashMap<UnitKey, Vec<Word>>) -> Self {
        Self {
            units,
            definitions: HashMap::new(),
            strict: false,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Unknown units fail with `SourceError::UnitNotFound`.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn with_definition(mut self, word: &str, definition: &str) -> Self {
        self.definitions
            .insert(word.to_lowercase(), definition.to_string());
        self
    }

    /// Get the number of calls made to this source.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last unit request made to this source.
    pub fn last_request(&self) -> Option<UnitRequest> {
        self.last_request
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl VocabularySource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn acquire_unit(&self, request: &UnitRequest) -> anyhow::Result<Vec<Word>> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }

        match self.units.get(&request.unit) {
            Some(words) => Ok(words.clone()),
            None if self.strict => Err(SourceError::UnitNotFound(request.unit.to_string()).into()),
            None => Ok(Vec::new()),
        }
    }

    async fn lookup(&self, word: &str) -> anyhow::Result<Option<Definition>> {
        Ok(self
            .definitions
            .get(&word.to_lowercase())
            .map(|definition| Definition {
                word: word.to_string(),
                definition: definition.clone(),
            }))
    }
}
