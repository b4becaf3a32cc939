//! The `vocaplan new` command.

use std::path::PathBuf;

use anyhow::Result;

use vocaplan_core::plan::sorted_plan_path;
use vocaplan_core::{generate, resequence_by_date};
use vocaplan_report::html::write_plan_html;
use vocaplan_sources::load_config_from;

use super::date_or_today;

pub fn execute(
    start: Option<String>,
    output: PathBuf,
    sorted: bool,
    html: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let start = date_or_today(start.as_deref())?;

    let schedule = generate(start, &config.curriculum)?;
    schedule.save_json(&output)?;

    let last = schedule
        .last_date()
        .map(|d| d.to_string())
        .unwrap_or_default();
    println!(
        "Plan: {} units x {} reviews, {start} to {last}",
        schedule.len(),
        schedule.offset_count()
    );
    println!("Plan saved to: {}", output.display());

    if sorted || html.is_some() {
        let plan = resequence_by_date(&schedule);
        if sorted {
            let path = sorted_plan_path(&output);
            plan.save_json(&path)?;
            println!("Date-based plan saved to: {}", path.display());
        }
        if let Some(path) = html {
            write_plan_html(&plan, None, &path)?;
            println!("HTML plan: {}", path.display());
        }
    }

    Ok(())
}
