//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! API keys are referenced by env-var name in the config and resolved
//! at runtime, so no key ever lives in the file or the binary.

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::fs;
use tracing::warn;

use crate::analysis::DEFAULT_BLOCKED_BOOKMAKERS;
use crate::types::OddsError;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub odds_api: OddsApiConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OddsApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Env var holding the primary API key.
    pub api_key_env: String,
    /// Env vars holding extra keys, tried in order once the primary is
    /// rejected or exhausted.
    #[serde(default)]
    pub fallback_key_envs: Vec<String>,
    #[serde(default = "default_regions")]
    pub regions: String,
    #[serde(default = "default_markets")]
    pub markets: String,
    #[serde(default = "default_odds_format")]
    pub odds_format: String,
    #[serde(default)]
    pub bookmakers: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScanConfig {
    /// Sport keys to scan. `"upcoming"` spans all sports.
    #[serde(default = "default_sports")]
    pub sports: Vec<String>,
    /// Print the sports catalog grouped by category before scanning.
    #[serde(default)]
    pub show_catalog: bool,
    /// Maximum ranked markets to print (0 = all).
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    #[serde(default = "default_blocked_bookmakers")]
    pub blocked_bookmakers: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            sports: default_sports(),
            show_catalog: false,
            top_n: default_top_n(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            blocked_bookmakers: default_blocked_bookmakers(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.the-odds-api.com".to_string()
}

fn default_regions() -> String {
    "us".to_string()
}

fn default_markets() -> String {
    "h2h".to_string()
}

fn default_odds_format() -> String {
    "decimal".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_sports() -> Vec<String> {
    vec!["upcoming".to_string()]
}

fn default_top_n() -> usize {
    25
}

fn default_blocked_bookmakers() -> Vec<String> {
    DEFAULT_BLOCKED_BOOKMAKERS.iter().map(|s| s.to_string()).collect()
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
        if config.scan.sports.is_empty() {
            return Err(OddsError::Config("scan.sports must list at least one sport key".into()).into());
        }
        Ok(config)
    }

    /// Resolve an environment variable name to its value.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }
}

impl OddsApiConfig {
    /// Resolve the primary key (required) and any fallback keys that are
    /// set. Unset fallbacks are skipped with a warning.
    pub fn resolve_keys(&self) -> Result<Vec<SecretString>> {
        let mut keys = vec![SecretString::new(AppConfig::resolve_env(&self.api_key_env)?)];

        for env in &self.fallback_key_envs {
            match std::env::var(env) {
                Ok(value) if !value.trim().is_empty() => keys.push(SecretString::new(value)),
                _ => warn!(env = %env, "Fallback API key not set, skipping"),
            }
        }

        Ok(keys)
    }
}
