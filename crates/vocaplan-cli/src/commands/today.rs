//! The `vocaplan today` command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use vocaplan_core::engine::{ProgressReporter, WordFetcher};
use vocaplan_core::model::{ordinal, UnitKey};
use vocaplan_core::report::TodayEntry;
use vocaplan_core::traits::VocabularySource;
use vocaplan_core::{due_on, Schedule};
use vocaplan_report::html::write_today_html;
use vocaplan_sources::{create_source, load_config_from};

use super::date_or_today;

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_unit_start(&self, unit: &UnitKey, rank: u32) {
        eprintln!("  Fetching: {unit} ({} review)", ordinal(rank));
    }

    fn on_unit_complete(&self, entry: &TodayEntry) {
        eprintln!("  Done: {} [{} words]", entry.unit, entry.words.len());
    }

    fn on_unit_error(&self, unit: &UnitKey, error: &str) {
        eprintln!("  ERROR: {unit}: {error}");
    }

    fn on_fetch_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {completed}/{total} units fetched, {failed} failed ({:.1}s)",
            elapsed.as_secs_f64()
        );
    }
}

pub async fn execute(
    plan_path: PathBuf,
    date: Option<String>,
    output: PathBuf,
    html: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let schedule = Schedule::load_json(&plan_path)?;
    let date = date_or_today(date.as_deref())?;

    let due = due_on(&schedule, date);
    tracing::debug!(units = schedule.len(), due = due.len(), %date, "loaded plan");
    if due.is_empty() {
        println!("Nothing due on {date}.");
        return Ok(());
    }

    let source: Arc<dyn VocabularySource> = Arc::from(create_source(&config.source)?);
    eprintln!(
        "vocaplan: {} units due on {date}, source: {}",
        due.len(),
        source.name()
    );

    let fetcher = WordFetcher::new(source, config.fetch_config());
    let report = fetcher.fetch(date, &due, &ConsoleReporter).await?;

    report.save_words_json(&output)?;
    println!(
        "{} words from {} units saved to: {}",
        report.word_count(),
        report.entries.len(),
        output.display()
    );

    if let Some(path) = html {
        write_today_html(&report, &path)?;
        println!("HTML page: {}", path.display());
    }

    if !report.failed.is_empty() {
        let failed: Vec<String> = report.failed.iter().map(|u| u.to_string()).collect();
        eprintln!("Warning: no words for {}", failed.join(", "));
    }

    Ok(())
}
