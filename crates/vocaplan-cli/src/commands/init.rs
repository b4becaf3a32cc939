//! The `vocaplan init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    let path = std::path::Path::new("vocaplan.toml");
    if path.exists() {
        println!("vocaplan.toml already exists, skipping.");
    } else {
        std::fs::write(path, SAMPLE_CONFIG)?;
        println!("Created vocaplan.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit vocaplan.toml to point [source] at your word service");
    println!("  2. Run: vocaplan new --start 2024-01-01");
    println!("  3. Run: vocaplan today --plan plan.json");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# vocaplan configuration

parallelism = 4
max_retries = 3
retry_delay_ms = 500

[source]
type = "builtin"
# type = "http"
# base_url = "http://127.0.0.1:5000"

[curriculum]
total_lists = 34
units_per_list = 10
last_list_units = 2
offsets = [0, 1, 2, 4, 7, 15]
"#;
