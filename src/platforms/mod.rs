//! Odds provider integrations.
//!
//! Defines the `OddsSource` trait and provides an implementation for
//! The Odds API (v4). Providers hand back raw JSON events; validation
//! into typed records happens in the scanner.

pub mod odds_api;

use anyhow::Result;
use async_trait::async_trait;

use crate::types::Sport;

/// Abstraction over sportsbook odds feeds.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OddsSource: Send + Sync {
    /// Fetch the provider's sports catalog.
    async fn fetch_sports(&self) -> Result<Vec<Sport>>;

    /// Fetch raw odds events for one sport key (`"upcoming"` covers
    /// the next events across all sports).
    async fn fetch_events(&self, sport_key: &str) -> Result<Vec<serde_json::Value>>;
}
