//! The `vocaplan due` command.

use std::path::PathBuf;

use anyhow::Result;

use vocaplan_core::model::ordinal;
use vocaplan_core::{due_on, DueUnit, Schedule};

use super::date_or_today;

pub fn execute(plan_path: PathBuf, date: Option<String>, format: String) -> Result<()> {
    let schedule = Schedule::load_json(&plan_path)?;
    let date = date_or_today(date.as_deref())?;
    let due = due_on(&schedule, date);

    match format.as_str() {
        "text" => print_table(date, &due),
        "json" => {
            let items: Vec<serde_json::Value> = due
                .iter()
                .map(|d| {
                    serde_json::json!({
                        "rank": d.rank,
                        "ordinal": ordinal(d.rank),
                        "unit": d.unit.to_string(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        other => anyhow::bail!("unknown format: '{other}' (expected text or json)"),
    }

    Ok(())
}

fn print_table(date: chrono::NaiveDate, due: &[DueUnit]) {
    use comfy_table::{Cell, Table};

    if due.is_empty() {
        println!("Nothing due on {date}.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Review", "List", "Unit", "Key"]);
    for d in due {
        table.add_row(vec![
            Cell::new(ordinal(d.rank)),
            Cell::new(d.unit.list),
            Cell::new(d.unit.unit),
            Cell::new(d.unit),
        ]);
    }

    println!("Due on {date}: {} units", due.len());
    println!("{table}");
}
