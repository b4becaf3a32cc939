//! HTTP word service source.
//!
//! Talks to a word service exposing `POST /db/acquire_unit` and
//! `GET /search/{word}`.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::instrument;

use vocaplan_core::error::SourceError;
use vocaplan_core::model::Word;
use vocaplan_core::traits::{Definition, UnitRequest, VocabularySource};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Definition text the service uses for unknown words.
const NOT_FOUND_DEFINITION: &str = "Not found";

/// Word service reachable over HTTP.
pub struct HttpSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let base = if base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))?;

        Ok(Self {
            base_url: base.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn map_send_error(&self, e: reqwest::Error) -> SourceError {
        if e.is_timeout() {
            SourceError::Timeout(DEFAULT_TIMEOUT_SECS)
        } else if e.is_connect() {
            SourceError::NetworkError(format!(
                "word service not reachable at {}",
                self.base_url
            ))
        } else {
            SourceError::NetworkError(e.to_string())
        }
    }
}

#[derive(Serialize)]
struct AcquireUnitBody<'a> {
    list: String,
    unit: String,
    attribute: &'a [String],
}

#[derive(Deserialize)]
struct SearchResponse {
    word: String,
    #[serde(default)]
    definition: Option<String>,
}

#[async_trait]
impl VocabularySource for HttpSource {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self, request), fields(unit = %request.unit))]
    async fn acquire_unit(&self, request: &UnitRequest) -> anyhow::Result<Vec<Word>> {
        let body = AcquireUnitBody {
            list: request.unit.list.to_string(),
            unit: request.unit.unit.to_string(),
            attribute: &request.attributes,
        };

        let response = self
            .client
            .post(format!("{}/db/acquire_unit", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status().as_u16();
        if status == 404 {
            return Err(SourceError::UnitNotFound(request.unit.to_string()).into());
        }
        if status == 400 || status == 422 {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::BadRequest(body).into());
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::ApiError {
                status,
                message: body,
            }
            .into());
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| SourceError::InvalidPayload(format!("failed to parse response: {e}")))?;

        Ok(decode_unit_payload(payload)?)
    }

    #[instrument(skip(self))]
    async fn lookup(&self, word: &str) -> anyhow::Result<Option<Definition>> {
        let mut url = reqwest::Url::parse(&format!("{}/search/", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("invalid base URL: {}", self.base_url))?
            .pop_if_empty()
            .push(word.trim());

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status().as_u16();
        if status == 404 {
            return Ok(None);
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::ApiError {
                status,
                message: body,
            }
            .into());
        }

        let found: SearchResponse = response
            .json()
            .await
            .map_err(|e| SourceError::InvalidPayload(format!("failed to parse response: {e}")))?;

        Ok(found
            .definition
            .filter(|d| d != NOT_FOUND_DEFINITION)
            .map(|definition| Definition {
                word: found.word,
                definition,
            }))
    }
}

/// Decode the words of a unit from a word service payload.
///
/// Accepts an array of word records, a column-oriented object
/// (`attribute → {row → value}`), or either of those encoded once more as a
/// JSON string.
pub fn decode_unit_payload(payload: Value) -> Result<Vec<Word>, SourceError> {
    let payload = match payload {
        Value::String(inner) => serde_json::from_str(&inner)
            .map_err(|e| SourceError::InvalidPayload(format!("double-encoded payload: {e}")))?,
        other => other,
    };

    match payload {
        Value::Array(rows) => rows
            .into_iter()
            .map(|row| match row {
                Value::Object(record) => record_to_word(&record),
                other => Err(SourceError::InvalidPayload(format!(
                    "expected a word record, got {other}"
                ))),
            })
            .collect(),
        Value::Object(columns) if columns.values().all(Value::is_object) => {
            columns_to_words(&columns)
        }
        Value::Object(record) => Ok(vec![record_to_word(&record)?]),
        Value::Null => Ok(Vec::new()),
        other => Err(SourceError::InvalidPayload(format!(
            "unexpected payload: {other}"
        ))),
    }
}

fn columns_to_words(columns: &Map<String, Value>) -> Result<Vec<Word>, SourceError> {
    let mut rows: BTreeMap<RowId, Map<String, Value>> = BTreeMap::new();
    for (attribute, cells) in columns {
        if let Value::Object(cells) = cells {
            for (row, value) in cells {
                rows.entry(RowId::parse(row))
                    .or_default()
                    .insert(attribute.clone(), value.clone());
            }
        }
    }
    rows.values().map(record_to_word).collect()
}

/// Row labels sort numerically when they are numbers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum RowId {
    Index(u64),
    Label(String),
}

impl RowId {
    fn parse(s: &str) -> Self {
        s.parse().map(RowId::Index).unwrap_or_else(|_| RowId::Label(s.to_string()))
    }
}

fn record_to_word(record: &Map<String, Value>) -> Result<Word, SourceError> {
    let word = record
        .get("word")
        .and_then(value_to_string)
        .ok_or_else(|| SourceError::InvalidPayload("word record without 'word'".into()))?;

    Ok(Word {
        word_id: record.get("word_id").and_then(value_to_string),
        word,
        meaning_us: record
            .get("meaning_US")
            .and_then(value_to_string)
            .unwrap_or_default(),
        sentence: record
            .get("sentence")
            .and_then(value_to_string)
            .unwrap_or_default(),
    })
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
