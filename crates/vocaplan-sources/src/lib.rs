//! vocaplan-sources — vocabulary sources.
//!
//! Implements the `VocabularySource` trait for the built-in word bank and
//! for HTTP word services, plus the TOML configuration that selects one.

pub mod builtin;
pub mod config;
pub mod http;
pub mod mock;

pub use config::{create_source, load_config_from, SourceConfig, VocaplanConfig};
pub use vocaplan_core::error::SourceError;
