//! HTML export generator.
//!
//! Produces self-contained HTML files with all CSS inlined.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use vocaplan_core::model::ordinal;
use vocaplan_core::report::TodayReport;
use vocaplan_core::DatePlan;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn page_start(html: &mut String, title: &str) {
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{}</title>\n", html_escape(title)));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");
}

fn page_end(html: &mut String) {
    html.push_str("</body>\n</html>");
}

/// Generate the today's-words page.
pub fn generate_today_html(report: &TodayReport) -> String {
    let mut html = String::new();
    page_start(&mut html, &format!("Today's vocabulary — {}", report.date));

    html.push_str("<header>\n");
    html.push_str("<h1>Today's Vocabulary</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">{} | {} units | {} words</p>\n",
        report.date,
        report.entries.len(),
        report.word_count()
    ));
    html.push_str(
        "<p class=\"meta\">\"5th · list:5,unit:2\" means this is the 5th time you study unit 2 of list 5.</p>\n",
    );
    html.push_str("</header>\n");

    if report.entries.is_empty() {
        html.push_str("<p class=\"empty\">Nothing is scheduled for this day.</p>\n");
    }

    for entry in &report.entries {
        let class = if entry.rank == 1 { "new" } else { "review" };
        html.push_str(&format!("<section class=\"unit {class}\">\n"));
        html.push_str(&format!(
            "<h2>{} · {}</h2>\n",
            ordinal(entry.rank),
            html_escape(&entry.unit.to_string())
        ));

        if entry.words.is_empty() {
            html.push_str("<p class=\"empty\">No words available for this unit.</p>\n");
        } else {
            html.push_str("<table>\n");
            html.push_str("<thead><tr><th>Word</th><th>Meaning</th><th>Sentence</th></tr></thead>\n");
            html.push_str("<tbody>\n");
            for word in &entry.words {
                html.push_str(&format!(
                    "<tr><td class=\"word\">{}</td><td>{}</td><td>{}</td></tr>\n",
                    html_escape(&word.word),
                    html_escape(&word.meaning_us),
                    html_escape(&word.sentence),
                ));
            }
            html.push_str("</tbody></table>\n");
        }
        html.push_str("</section>\n");
    }

    if !report.failed.is_empty() {
        html.push_str("<section class=\"failed\">\n<h2>Unavailable</h2>\n<ul>\n");
        for unit in &report.failed {
            html.push_str(&format!("<li>{}</li>\n", html_escape(&unit.to_string())));
        }
        html.push_str("</ul>\n</section>\n");
    }

    page_end(&mut html);
    html
}

/// Generate the date-based plan page. `today`, if given, is highlighted.
pub fn generate_plan_html(plan: &DatePlan, today: Option<NaiveDate>) -> String {
    let mut html = String::new();
    page_start(&mut html, "Your plan (date based)");

    html.push_str("<header>\n<h1>Your Plan</h1>\n");
    if let (Some((first, _)), Some((last, _))) = (plan.iter().next(), plan.iter().last()) {
        html.push_str(&format!(
            "<p class=\"meta\">{first} to {last} | {} study days</p>\n",
            plan.len()
        ));
    }
    html.push_str("</header>\n");

    html.push_str("<table class=\"calendar\">\n");
    html.push_str("<thead><tr><th>Date</th><th>New</th><th>Reviews</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for (date, entries) in plan.iter() {
        let row_class = if Some(*date) == today { " class=\"today\"" } else { "" };
        let new_units: Vec<String> = entries
            .iter()
            .filter(|(_, rank)| *rank == 1)
            .map(|(unit, _)| html_escape(&unit.to_string()))
            .collect();
        let reviews: Vec<String> = entries
            .iter()
            .filter(|(_, rank)| *rank > 1)
            .map(|(unit, rank)| format!("{} ({})", html_escape(&unit.to_string()), ordinal(*rank)))
            .collect();
        html.push_str(&format!(
            "<tr{row_class}><td>{date}</td><td>{}</td><td>{}</td></tr>\n",
            new_units.join(", "),
            reviews.join(", ")
        ));
    }
    html.push_str("</tbody></table>\n");

    page_end(&mut html);
    html
}

fn write_html(html: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))
}

/// Write the today's-words page to a file.
pub fn write_today_html(report: &TodayReport, path: &Path) -> Result<()> {
    write_html(&generate_today_html(report), path)
}

/// Write the date-based plan page to a file.
pub fn write_plan_html(plan: &DatePlan, today: Option<NaiveDate>, path: &Path) -> Result<()> {
    write_html(&generate_plan_html(plan, today), path)
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --new: #dcfce7; --today: #fef3c7; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --new: #064e3b; --today: #78350f; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.empty { font-style: italic; color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
.unit.new h2 { border-left: 6px solid #22c55e; padding-left: 0.5rem; }
.unit.review h2 { border-left: 6px solid #eab308; padding-left: 0.5rem; }
td.word { font-weight: bold; }
tr.today { background: var(--today); }
.failed { color: #ef4444; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use vocaplan_core::model::{Curriculum, UnitKey, Word};
    use vocaplan_core::report::TodayEntry;
    use vocaplan_core::{generate_from_str, parse_date, resequence_by_date};

    fn make_today_report() -> TodayReport {
        TodayReport {
            date: parse_date("2024-01-02").unwrap(),
            entries: vec![
                TodayEntry {
                    rank: 1,
                    unit: UnitKey::new(1, 2),
                    words: vec![Word {
                        word_id: None,
                        word: "Obfuscate".into(),
                        meaning_us: "Render <obscure>.".into(),
                        sentence: String::new(),
                    }],
                },
                TodayEntry {
                    rank: 2,
                    unit: UnitKey::new(1, 1),
                    words: vec![],
                },
            ],
            failed: vec![UnitKey::new(3, 3)],
        }
    }

    #[test]
    fn today_page_contains_required_elements() {
        let html = generate_today_html(&make_today_report());

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("1st · list:1,unit:2"));
        assert!(html.contains("2nd · list:1,unit:1"));
        assert!(html.contains("Obfuscate"));
        assert!(html.contains("Render &lt;obscure&gt;."));
        assert!(html.contains("list:3,unit:3"));
    }

    #[test]
    fn plan_page_highlights_today() {
        let schedule = generate_from_str("2024-01-01", &Curriculum::default()).unwrap();
        let plan = resequence_by_date(&schedule);
        let today = parse_date("2024-01-02").unwrap();

        let html = generate_plan_html(&plan, Some(today));
        assert!(html.contains("<tr class=\"today\"><td>2024-01-02</td>"));
        assert!(html.contains("list:1,unit:1 (2nd)"));
        assert!(html.contains("2024-01-01 to 2024-12-12"));
    }

    #[test]
    fn write_pages_to_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("today.html");

        write_today_html(&make_today_report(), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Today's Vocabulary"));
    }

    #[test]
    fn write_error_names_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let err = write_today_html(&make_today_report(), &blocker.join("today.html")).unwrap_err();
        assert!(err.to_string().contains("failed to create"));
        assert!(err.to_string().contains("blocker"));
    }
}
