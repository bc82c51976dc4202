//! Mock odds source for integration testing.
//!
//! Provides a deterministic `OddsSource` implementation that serves
//! canned sports and events per sport key, all in-memory with no
//! network access.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use oddsdelta::platforms::OddsSource;
use oddsdelta::types::Sport;

/// A mock odds feed. Events and failures are controllable from test code.
#[derive(Clone, Default)]
pub struct MockOddsSource {
    sports: Vec<Sport>,
    events: HashMap<String, Vec<Value>>,
    /// Sport keys that fail on fetch.
    failing: Arc<Mutex<Vec<String>>>,
    /// Every sport key requested so far.
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockOddsSource {
    pub fn new() -> Self {
        Self {
            sports: default_sports(),
            ..Self::default()
        }
    }

    /// Serve `events` for `sport_key`.
    pub fn with_events(mut self, sport_key: &str, events: Vec<Value>) -> Self {
        self.events.insert(sport_key.to_string(), events);
        self
    }

    /// Make fetches for `sport_key` fail.
    pub fn fail_sport(&self, sport_key: &str) {
        self.failing.lock().unwrap().push(sport_key.to_string());
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl OddsSource for MockOddsSource {
    async fn fetch_sports(&self) -> Result<Vec<Sport>> {
        Ok(self.sports.clone())
    }

    async fn fetch_events(&self, sport_key: &str) -> Result<Vec<Value>> {
        self.requests.lock().unwrap().push(sport_key.to_string());
        if self.failing.lock().unwrap().iter().any(|k| k == sport_key) {
            return Err(anyhow!("mock failure for {sport_key}"));
        }
        Ok(self.events.get(sport_key).cloned().unwrap_or_default())
    }
}

fn default_sports() -> Vec<Sport> {
    let sport = |key: &str, group: &str, title: &str, description: &str, active: bool| Sport {
        key: key.to_string(),
        group: group.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        active,
        has_outrights: false,
    };

    vec![
        sport("americanfootball_cfl", "American Football", "CFL", "Canadian Football League", true),
        sport("basketball_nba", "Basketball", "NBA", "US Basketball", true),
        sport("americanfootball_nfl", "American Football", "NFL", "US Football", true),
        sport("cricket_test_match", "Cricket", "Test Matches", "International Test Matches", false),
    ]
}

// ---------------------------------------------------------------------------
// Event builders
// ---------------------------------------------------------------------------

/// One bookmaker offering a single h2h market.
pub fn h2h_book(title: &str, outcomes: &[(&str, f64)]) -> Value {
    let outcomes: Vec<Value> = outcomes
        .iter()
        .map(|(name, price)| json!({"name": name, "price": price}))
        .collect();
    json!({
        "key": title.to_lowercase().replace(' ', "_"),
        "title": title,
        "last_update": "2026-10-19T12:00:00Z",
        "markets": [{"key": "h2h", "last_update": "2026-10-19T12:00:00Z", "outcomes": outcomes}]
    })
}

pub fn event(id: &str, sport_key: &str, home: &str, away: &str, bookmakers: Vec<Value>) -> Value {
    json!({
        "id": id,
        "sport_key": sport_key,
        "sport_title": sport_key.to_uppercase(),
        "commence_time": "2026-10-20T23:30:00Z",
        "home_team": home,
        "away_team": away,
        "bookmakers": bookmakers,
    })
}
