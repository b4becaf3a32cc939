//! The `vocaplan sort` command.

use std::path::PathBuf;

use anyhow::Result;

use vocaplan_core::plan::sorted_plan_path;
use vocaplan_core::{resequence_by_date, Schedule};

pub fn execute(plan_path: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let schedule = Schedule::load_json(&plan_path)?;
    let plan = resequence_by_date(&schedule);

    let path = output.unwrap_or_else(|| sorted_plan_path(&plan_path));
    plan.save_json(&path)?;

    println!("{} study days", plan.len());
    println!("Date-based plan saved to: {}", path.display());
    Ok(())
}
