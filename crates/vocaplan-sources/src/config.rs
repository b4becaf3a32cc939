//! vocaplan configuration and source factory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use vocaplan_core::engine::FetchConfig;
use vocaplan_core::model::Curriculum;
use vocaplan_core::traits::VocabularySource;

use crate::builtin::BuiltinSource;
use crate::http::{HttpSource, DEFAULT_BASE_URL};

/// Environment variable that points vocaplan at an HTTP word service.
pub const SOURCE_URL_ENV: &str = "VOCAPLAN_SOURCE_URL";

/// Where the words of each unit come from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    #[default]
    Builtin,
    Http {
        #[serde(default = "default_base_url")]
        base_url: String,
    },
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Top-level vocaplan configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocaplanConfig {
    /// Vocabulary source.
    #[serde(default)]
    pub source: SourceConfig,
    /// Curriculum shape used for new plans.
    #[serde(default)]
    pub curriculum: Curriculum,
    /// Max concurrent unit requests.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Max retries on transient source errors.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Delay before the first retry in milliseconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
}

fn default_parallelism() -> usize {
    4
}
fn default_retries() -> u32 {
    3
}
fn default_retry_delay() -> u64 {
    500
}

impl Default for VocaplanConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            curriculum: Curriculum::default(),
            parallelism: default_parallelism(),
            max_retries: default_retries(),
            retry_delay_ms: default_retry_delay(),
        }
    }
}

impl VocaplanConfig {
    /// Fetcher settings derived from this config.
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            parallelism: self.parallelism,
            max_retries: self.max_retries,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Apply the source URL override and resolve `${VAR}` references.
fn apply_overrides(mut config: VocaplanConfig, source_url: Option<String>) -> VocaplanConfig {
    if let Some(url) = source_url.filter(|u| !u.trim().is_empty()) {
        config.source = SourceConfig::Http { base_url: url };
    }
    if let SourceConfig::Http { base_url } = &config.source {
        config.source = SourceConfig::Http {
            base_url: resolve_env_vars(base_url),
        };
    }
    config
}

/// Load config from an explicit path, or search the well-known paths:
/// 1. `vocaplan.toml` in the current directory
/// 2. `~/.config/vocaplan/config.toml`
///
/// `VOCAPLAN_SOURCE_URL` switches the source to HTTP with that base URL.
pub fn load_config_from(path: Option<&Path>) -> Result<VocaplanConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("vocaplan.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            parse_config_file(&path)?
        }
        None => VocaplanConfig::default(),
    };

    Ok(apply_overrides(config, std::env::var(SOURCE_URL_ENV).ok()))
}

fn parse_config_file(path: &Path) -> Result<VocaplanConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let config = toml::from_str::<VocaplanConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))?;
    config
        .curriculum
        .validate()
        .with_context(|| format!("invalid [curriculum] in {}", path.display()))?;
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("vocaplan"))
}

/// Create a source instance from its configuration.
pub fn create_source(config: &SourceConfig) -> Result<Box<dyn VocabularySource>> {
    match config {
        SourceConfig::Builtin => Ok(Box::new(BuiltinSource::new())),
        SourceConfig::Http { base_url } => Ok(Box::new(HttpSource::new(base_url)?)),
    }
}
