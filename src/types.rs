//! Shared types for the ODDSDELTA scanner.
//!
//! The raw provider records (`RawEvent` and friends) live at the ingestion
//! boundary; everything past `RawEvent::from_value` works on validated,
//! typed data. `PriceQuote` is the atomic unit the analysis core consumes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Price quotes
// ---------------------------------------------------------------------------

/// A single price offered by one bookmaker for one outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub price: Decimal,
    pub bookmaker: String,
}

impl PriceQuote {
    pub fn new(price: Decimal, bookmaker: impl Into<String>) -> Self {
        Self {
            price,
            bookmaker: bookmaker.into(),
        }
    }

    /// Build a quote from a raw JSON price, rejecting values the core
    /// cannot divide by.
    pub fn from_f64(price: f64, bookmaker: &str) -> Result<Self, OddsError> {
        if !price.is_finite() {
            return Err(OddsError::MalformedQuote {
                bookmaker: bookmaker.to_string(),
                reason: format!("non-finite price {price}"),
            });
        }
        // f64 Display is the shortest round-trip form, so 2.3 stays 2.3
        let price: Decimal = price.to_string().parse().map_err(|_| OddsError::MalformedQuote {
            bookmaker: bookmaker.to_string(),
            reason: format!("price {price} out of decimal range"),
        })?;
        Ok(Self::new(price, bookmaker))
    }
}

impl fmt::Display for PriceQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.price.normalize(), self.bookmaker)
    }
}

// ---------------------------------------------------------------------------
// Sports catalog
// ---------------------------------------------------------------------------

/// An entry in the provider's sports catalog (`/v4/sports`).
///
/// Used for display and for picking which sport keys to scan; never
/// feeds into price analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sport {
    pub key: String,
    pub group: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub has_outrights: bool,
}

impl Sport {
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} with key {} - {}", self.title, self.key, self.description)
    }
}

// ---------------------------------------------------------------------------
// Raw provider records (odds endpoint)
// ---------------------------------------------------------------------------

/// One event as returned by `/v4/sports/{sport}/odds`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEvent {
    pub id: String,
    pub sport_key: String,
    pub sport_title: String,
    pub commence_time: DateTime<Utc>,
    #[serde(default)]
    pub home_team: Option<String>,
    #[serde(default)]
    pub away_team: Option<String>,
    pub bookmakers: Vec<RawBookmaker>,
}

/// A bookmaker's block of markets for one event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBookmaker {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub last_update: Option<DateTime<Utc>>,
    pub markets: Vec<RawMarket>,
}

/// One bet type ("h2h", "spreads", "totals", ...) from one bookmaker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMarket {
    pub key: String,
    #[serde(default)]
    pub last_update: Option<DateTime<Utc>>,
    pub outcomes: Vec<RawOutcome>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOutcome {
    pub name: String,
    pub price: f64,
    /// Handicap / total line for spreads and totals markets.
    #[serde(default)]
    pub point: Option<f64>,
}

impl RawEvent {
    /// Decode and validate one event from the provider's JSON.
    ///
    /// Missing or mistyped fields surface as `MalformedEvent` rather than
    /// a bare serde error, so the caller can skip the event and continue.
    pub fn from_value(value: serde_json::Value) -> Result<Self, OddsError> {
        let hint = value
            .get("id")
            .and_then(|v| v.as_str())
            .unwrap_or("<unknown>")
            .to_string();

        let event: RawEvent = serde_json::from_value(value).map_err(|e| OddsError::MalformedEvent {
            event_id: hint,
            reason: e.to_string(),
        })?;

        event.validate()?;
        Ok(event)
    }

    fn validate(&self) -> Result<(), OddsError> {
        let malformed = |reason: &str| OddsError::MalformedEvent {
            event_id: self.id.clone(),
            reason: reason.to_string(),
        };

        if self.id.trim().is_empty() {
            return Err(malformed("empty event id"));
        }
        if self.sport_key.trim().is_empty() {
            return Err(malformed("empty sport key"));
        }
        if let Some(b) = self.bookmakers.iter().find(|b| b.title.trim().is_empty()) {
            return Err(malformed(&format!("bookmaker '{}' has no title", b.key)));
        }
        Ok(())
    }

    /// Human-readable label used in market summaries.
    pub fn label(&self) -> String {
        match (&self.home_team, &self.away_team) {
            (Some(home), Some(away)) => format!("{} - {home} vs {away}", self.sport_title),
            _ => self.sport_title.clone(),
        }
    }
}

impl fmt::Display for RawEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sport_title)
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for ODDSDELTA.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OddsError {
    #[error("Malformed quote from {bookmaker}: {reason}")]
    MalformedQuote { bookmaker: String, reason: String },

    #[error("Malformed event {event_id}: {reason}")]
    MalformedEvent { event_id: String, reason: String },

    #[error("No eligible quotes for outcome: {0}")]
    EmptyOutcome(String),

    #[error("Odds API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
