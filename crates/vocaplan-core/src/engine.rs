//! Fetches the words of due units from a vocabulary source.
//!
//! Requests run concurrently up to `parallelism`, transient source errors are
//! retried with exponential backoff, and results are reported in due order
//! whatever order they complete in.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::NaiveDate;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;

use crate::error::SourceError;
use crate::model::{DueUnit, UnitKey, Word};
use crate::report::{TodayEntry, TodayReport};
use crate::traits::{UnitRequest, VocabularySource};

/// Configuration for the word fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Maximum concurrent unit requests.
    pub parallelism: usize,
    /// Retries on transient source errors.
    pub max_retries: u32,
    /// Delay before the first retry; doubled on each further retry.
    pub retry_delay: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            parallelism: 4,
            max_retries: 3,
            retry_delay: Duration::from_millis(500),
        }
    }
}

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_unit_start(&self, unit: &UnitKey, rank: u32);
    fn on_unit_complete(&self, entry: &TodayEntry);
    fn on_unit_error(&self, unit: &UnitKey, error: &str);
    fn on_fetch_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_unit_start(&self, _: &UnitKey, _: u32) {}
    fn on_unit_complete(&self, _: &TodayEntry) {}
    fn on_unit_error(&self, _: &UnitKey, _: &str) {}
    fn on_fetch_complete(&self, _: usize, _: usize, _: usize, _: Duration) {}
}

/// Pulls words for due units from one source.
pub struct WordFetcher {
    source: Arc<dyn VocabularySource>,
    config: FetchConfig,
}

impl WordFetcher {
    pub fn new(source: Arc<dyn VocabularySource>, config: FetchConfig) -> Self {
        Self { source, config }
    }

    /// Fetch words for every unit in `due`.
    pub async fn fetch(
        &self,
        date: NaiveDate,
        due: &[DueUnit],
        progress: &dyn ProgressReporter,
    ) -> Result<TodayReport> {
        anyhow::ensure!(self.config.parallelism >= 1, "parallelism must be at least 1");

        let start = Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.config.parallelism));
        let mut futures = FuturesUnordered::new();

        for (position, due_unit) in due.iter().copied().enumerate() {
            let source = Arc::clone(&self.source);
            let semaphore = Arc::clone(&semaphore);
            let config = self.config.clone();

            futures.push(async move {
                let inner = async {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|_| anyhow::anyhow!("semaphore closed"))?;
                    progress.on_unit_start(&due_unit.unit, due_unit.rank);
                    fetch_with_retry(source.as_ref(), due_unit.unit, &config).await
                };
                (position, due_unit, inner.await)
            });
        }

        let total = futures.len();
        let mut fetched: Vec<(usize, TodayEntry)> = Vec::with_capacity(total);
        let mut failed: Vec<(usize, UnitKey)> = Vec::new();

        while let Some((position, due_unit, result)) = futures.next().await {
            match result {
                Ok(words) => {
                    let entry = TodayEntry {
                        rank: due_unit.rank,
                        unit: due_unit.unit,
                        words,
                    };
                    progress.on_unit_complete(&entry);
                    fetched.push((position, entry));
                }
                Err(e) => {
                    tracing::warn!("fetching words for {} failed: {e:#}", due_unit.unit);
                    progress.on_unit_error(&due_unit.unit, &format!("{e:#}"));
                    failed.push((position, due_unit.unit));
                }
            }
        }

        fetched.sort_by_key(|(position, _)| *position);
        failed.sort_by_key(|(position, _)| *position);

        let elapsed = start.elapsed();
        progress.on_fetch_complete(total, fetched.len(), failed.len(), elapsed);
        tracing::info!(
            %date,
            units = total,
            failed = failed.len(),
            source = self.source.name(),
            "fetched today's words"
        );

        Ok(TodayReport {
            date,
            entries: fetched.into_iter().map(|(_, e)| e).collect(),
            failed: failed.into_iter().map(|(_, u)| u).collect(),
        })
    }
}

async fn fetch_with_retry(
    source: &dyn VocabularySource,
    unit: UnitKey,
    config: &FetchConfig,
) -> Result<Vec<Word>> {
    let request = UnitRequest::new(unit);
    let mut retry_delay = config.retry_delay;
    let mut last_error = None;

    for retry in 0..=config.max_retries {
        if retry > 0 {
            tokio::time::sleep(retry_delay).await;
            retry_delay = (retry_delay * 2).min(Duration::from_secs(30));
        }
        match source.acquire_unit(&request).await {
            Ok(words) => {
                tracing::debug!(%unit, words = words.len(), "acquired unit");
                return Ok(words);
            }
            Err(e) => {
                let permanent = e
                    .downcast_ref::<SourceError>()
                    .is_some_and(SourceError::is_permanent);
                if permanent {
                    return Err(e);
                }
                tracing::debug!(%unit, retry, "transient source error: {e:#}");
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("unknown error")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;

    use crate::traits::Definition;

    /// Fails the first `failures` calls per unit with the given error kind.
    struct FlakySource {
        failures: u32,
        permanent: bool,
        calls: AtomicU32,
    }

    #[async_trait]
    impl VocabularySource for FlakySource {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn acquire_unit(&self, request: &UnitRequest) -> Result<Vec<Word>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                if self.permanent {
                    return Err(SourceError::UnitNotFound(request.unit.to_string()).into());
                }
                return Err(SourceError::Timeout(1).into());
            }
            Ok(vec![Word {
                word_id: None,
                word: format!("word-{}", request.unit),
                meaning_us: String::new(),
                sentence: String::new(),
            }])
        }

        async fn lookup(&self, _word: &str) -> Result<Option<Definition>> {
            Ok(None)
        }
    }

    fn fast_config() -> FetchConfig {
        FetchConfig {
            parallelism: 2,
            max_retries: 3,
            retry_delay: Duration::from_millis(1),
        }
    }

    fn due(units: &[(u32, u32, u32)]) -> Vec<DueUnit> {
        units
            .iter()
            .map(|&(rank, list, unit)| DueUnit {
                rank,
                unit: UnitKey::new(list, unit),
            })
            .collect()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    #[tokio::test]
    async fn results_keep_due_order() {
        let source = Arc::new(FlakySource {
            failures: 0,
            permanent: false,
            calls: AtomicU32::new(0),
        });
        let fetcher = WordFetcher::new(source, fast_config());
        let due = due(&[(1, 1, 3), (2, 1, 2), (3, 1, 1)]);

        let report = fetcher.fetch(date(), &due, &NoopReporter).await.unwrap();
        let units: Vec<UnitKey> = report.entries.iter().map(|e| e.unit).collect();
        assert_eq!(
            units,
            vec![UnitKey::new(1, 3), UnitKey::new(1, 2), UnitKey::new(1, 1)]
        );
        assert!(report.failed.is_empty());
        assert_eq!(report.entries[0].words[0].word, "word-list:1,unit:3");
    }

    #[tokio::test]
    async fn transient_errors_are_retried() {
        let source = Arc::new(FlakySource {
            failures: 2,
            permanent: false,
            calls: AtomicU32::new(0),
        });
        let fetcher = WordFetcher::new(source.clone(), fast_config());

        let report = fetcher
            .fetch(date(), &due(&[(1, 1, 1)]), &NoopReporter)
            .await
            .unwrap();
        assert_eq!(report.entries.len(), 1);
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let source = Arc::new(FlakySource {
            failures: 1,
            permanent: true,
            calls: AtomicU32::new(0),
        });
        let fetcher = WordFetcher::new(source.clone(), fast_config());

        let report = fetcher
            .fetch(date(), &due(&[(1, 1, 1)]), &NoopReporter)
            .await
            .unwrap();
        assert!(report.entries.is_empty());
        assert_eq!(report.failed, vec![UnitKey::new(1, 1)]);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_are_bounded() {
        let source = Arc::new(FlakySource {
            failures: u32::MAX,
            permanent: false,
            calls: AtomicU32::new(0),
        });
        let fetcher = WordFetcher::new(source.clone(), fast_config());

        let report = fetcher
            .fetch(date(), &due(&[(1, 1, 1)]), &NoopReporter)
            .await
            .unwrap();
        assert_eq!(report.failed.len(), 1);
        assert_eq!(source.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn nothing_due_is_empty_report() {
        let source = Arc::new(FlakySource {
            failures: 0,
            permanent: false,
            calls: AtomicU32::new(0),
        });
        let fetcher = WordFetcher::new(source, fast_config());
        let report = fetcher.fetch(date(), &[], &NoopReporter).await.unwrap();
        assert!(report.entries.is_empty());
        assert!(report.failed.is_empty());
    }
}
