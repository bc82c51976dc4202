//! The Odds API (v4) integration.
//!
//! API docs: https://the-odds-api.com/liveapi/guides/v4/
//! Base URL: https://api.the-odds-api.com
//! Auth: `apiKey` query parameter. Usage is metered per request; the
//! remaining quota is reported in the `x-requests-remaining` header.
//!
//! Several keys may be configured. When the active key is rejected
//! (401) or out of quota (429) the client moves on to the next one.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

use super::OddsSource;
use crate::config::OddsApiConfig;
use crate::types::{OddsError, Sport};

const PROVIDER_NAME: &str = "the-odds-api";

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct OddsApiClient {
    http: Client,
    base_url: String,
    regions: String,
    markets: String,
    odds_format: String,
    bookmakers: Vec<String>,
    keys: Vec<SecretString>,
    /// Index of the key that last succeeded.
    active_key: AtomicUsize,
}

impl OddsApiClient {
    /// Create a client from config and an ordered set of API keys.
    pub fn new(cfg: &OddsApiConfig, keys: Vec<SecretString>) -> Result<Self> {
        if keys.is_empty() {
            return Err(OddsError::Config("no Odds API key configured".to_string()).into());
        }

        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(cfg.timeout_secs))
            .user_agent("ODDSDELTA/0.1.0")
            .build()
            .context("Failed to build HTTP client for The Odds API")?;

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            regions: cfg.regions.clone(),
            markets: cfg.markets.clone(),
            odds_format: cfg.odds_format.clone(),
            bookmakers: cfg.bookmakers.clone(),
            keys,
            active_key: AtomicUsize::new(0),
        })
    }

    /// Number of API keys in the rotation.
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    // -- Internal helpers ------------------------------------------------

    /// Path and query for the odds endpoint, without the API key.
    fn odds_path(&self, sport_key: &str) -> String {
        let mut path = format!(
            "/v4/sports/{}/odds?regions={}&markets={}&oddsFormat={}",
            urlencoding::encode(sport_key),
            urlencoding::encode(&self.regions),
            urlencoding::encode(&self.markets),
            urlencoding::encode(&self.odds_format),
        );
        if !self.bookmakers.is_empty() {
            path.push_str("&bookmakers=");
            path.push_str(&urlencoding::encode(&self.bookmakers.join(",")));
        }
        path
    }

    /// GET `path`, rotating through keys on 401/429.
    async fn get(&self, path: &str) -> Result<Response> {
        let start = self.active_key.load(Ordering::Relaxed);
        let separator = if path.contains('?') { '&' } else { '?' };
        let mut last_status = StatusCode::UNAUTHORIZED;

        for attempt in 0..self.keys.len() {
            let idx = (start + attempt) % self.keys.len();
            let url = format!(
                "{}{path}{separator}apiKey={}",
                self.base_url,
                urlencoding::encode(self.keys[idx].expose_secret()),
            );

            debug!(path, key_index = idx, "Requesting The Odds API");

            let resp = self
                .http
                .get(&url)
                .send()
                .await
                .context("The Odds API request failed")?;

            let status = resp.status();
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::TOO_MANY_REQUESTS {
                warn!(key_index = idx, status = %status, "Odds API key rejected, rotating");
                last_status = status;
                continue;
            }

            self.active_key.store(idx, Ordering::Relaxed);

            if let Some(remaining) = resp
                .headers()
                .get("x-requests-remaining")
                .and_then(|v| v.to_str().ok())
            {
                debug!(key_index = idx, remaining, "Odds API quota");
            }

            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(OddsError::Api {
                    status: status.as_u16(),
                    message: body,
                }
                .into());
            }

            return Ok(resp);
        }

        Err(OddsError::Api {
            status: last_status.as_u16(),
            message: format!("all {} API keys rejected", self.keys.len()),
        }
        .into())
    }
}

// ---------------------------------------------------------------------------
// OddsSource trait implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl OddsSource for OddsApiClient {
    async fn fetch_sports(&self) -> Result<Vec<Sport>> {
        let sports: Vec<Sport> = self
            .get("/v4/sports")
            .await?
            .json()
            .await
            .context("Failed to parse The Odds API sports response")?;

        info!(provider = PROVIDER_NAME, count = sports.len(), "Sports catalog fetched");
        Ok(sports)
    }

    async fn fetch_events(&self, sport_key: &str) -> Result<Vec<serde_json::Value>> {
        let events: Vec<serde_json::Value> = self
            .get(&self.odds_path(sport_key))
            .await?
            .json()
            .await
            .with_context(|| format!("Failed to parse odds response for {sport_key}"))?;

        info!(
            provider = PROVIDER_NAME,
            sport = sport_key,
            count = events.len(),
            "Odds fetched"
        );
        Ok(events)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
