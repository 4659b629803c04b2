//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every section has defaults so a partial file is enough.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

use crate::round::RoundPolicy;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub desk: DeskConfig,
    #[serde(default)]
    pub rounds: RoundsConfig,
    #[serde(default)]
    pub exposure: ExposureConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DeskConfig {
    pub name: String,
    /// JSON book file holding rounds and wagers.
    pub store_path: String,
    pub currency: String,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            name: "MATKA-DESK".to_string(),
            store_path: crate::storage::DEFAULT_BOOK_FILE.to_string(),
            currency: "INR".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RoundsConfig {
    /// `false` restores the legacy behaviour of accepting a close
    /// declaration on a round with no opening number.
    pub require_open_before_close: bool,
}

impl Default for RoundsConfig {
    fn default() -> Self {
        Self {
            require_open_before_close: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExposureConfig {
    /// How many of the hottest keys per category the report lists.
    pub top_n: usize,
}

impl Default for ExposureConfig {
    fn default() -> Self {
        Self { top_n: 10 }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Parse configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        if config.desk.store_path.trim().is_empty() {
            return Err(crate::types::MatkaError::Config("desk.store_path is empty".to_string()).into());
        }
        Ok(config)
    }

    pub fn round_policy(&self) -> RoundPolicy {
        RoundPolicy {
            require_open_before_close: self.rounds.require_open_before_close,
        }
    }
}
