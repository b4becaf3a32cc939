//! The `vocaplan validate` command.

use std::path::PathBuf;

use anyhow::Result;

use vocaplan_core::{project, Schedule};

pub fn execute(plan_path: PathBuf) -> Result<()> {
    let schedule = Schedule::load_json(&plan_path)?;
    let projected = project(&schedule);

    println!(
        "Plan: {} ({} units x {} reviews)",
        plan_path.display(),
        schedule.len(),
        schedule.offset_count()
    );
    if let (Some(first), Some(last)) = (schedule.first_date(), schedule.last_date()) {
        println!("Span: {first} to {last} ({} study days)", projected.len());
    }
    println!("Plan valid.");

    Ok(())
}
