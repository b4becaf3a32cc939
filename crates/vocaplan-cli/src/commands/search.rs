//! The `vocaplan search` command.

use std::path::PathBuf;

use anyhow::Result;

use vocaplan_sources::{create_source, load_config_from};

pub async fn execute(word: String, config_path: Option<PathBuf>) -> Result<()> {
    let word = word.trim();
    anyhow::ensure!(!word.is_empty(), "word must not be empty");

    let config = load_config_from(config_path.as_deref())?;
    let source = create_source(&config.source)?;

    match source.lookup(word).await? {
        Some(found) => println!("{}: {}", found.word, found.definition),
        None => println!("{word}: Not found"),
    }

    Ok(())
}
