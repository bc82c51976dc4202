//! Odds scanner.
//!
//! Fetches raw events for every configured sport key concurrently,
//! validates them at the boundary, and builds one `EventAggregator` per
//! event. A failing sport or a malformed event is logged and skipped;
//! the rest of the scan carries on.

use anyhow::Result;
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::aggregator::EventAggregator;
use crate::analysis::BlockList;
use crate::platforms::OddsSource;
use crate::types::{RawEvent, Sport};

pub struct OddsScanner {
    source: Box<dyn OddsSource>,
    blocklist: Arc<BlockList>,
}

impl OddsScanner {
    pub fn new(source: Box<dyn OddsSource>, blocklist: BlockList) -> Self {
        Self {
            source,
            blocklist: Arc::new(blocklist),
        }
    }

    pub fn blocklist(&self) -> &BlockList {
        &self.blocklist
    }

    /// Active sports from the provider catalog.
    pub async fn scan_catalog(&self) -> Result<Vec<Sport>> {
        let sports = self.source.fetch_sports().await?;
        let total = sports.len();
        let active: Vec<Sport> = sports.into_iter().filter(Sport::is_active).collect();
        debug!(total, active = active.len(), "Catalog filtered to active sports");
        Ok(active)
    }

    /// Fetch and aggregate events for every sport key.
    ///
    /// Sport keys are fetched concurrently. Events seen under more than
    /// one key (e.g. `"upcoming"` plus a specific sport) are kept once.
    /// Fails only when every sport fetch fails.
    pub async fn scan_events(&self, sport_keys: &[String]) -> Result<Vec<EventAggregator>> {
        info!(sports = ?sport_keys, "Starting odds scan...");

        let results = join_all(sport_keys.iter().map(|key| self.source.fetch_events(key))).await;

        let mut seen = HashSet::new();
        let mut events = Vec::new();
        let mut last_error = None;
        let mut succeeded = 0usize;

        for (sport_key, result) in sport_keys.iter().zip(results) {
            match result {
                Ok(raw) => {
                    succeeded += 1;
                    let count_before = events.len();
                    for event in self.build_events(sport_key, raw) {
                        if seen.insert(event.event_id().to_string()) {
                            events.push(event);
                        }
                    }
                    debug!(
                        sport = %sport_key,
                        new = events.len() - count_before,
                        total = events.len(),
                        "Sport scanned"
                    );
                }
                Err(e) => {
                    warn!(sport = %sport_key, error = %e, "Odds fetch failed, continuing");
                    last_error = Some(e);
                }
            }
        }

        if succeeded == 0 {
            if let Some(e) = last_error {
                return Err(e.context("Every sport fetch failed"));
            }
        }

        info!(events = events.len(), "Odds scan complete");
        Ok(events)
    }

    /// Validate raw events and aggregate the well-formed ones.
    pub fn build_events(&self, sport_key: &str, raw: Vec<serde_json::Value>) -> Vec<EventAggregator> {
        raw.into_iter()
            .filter_map(|value| match RawEvent::from_value(value) {
                Ok(event) => Some(EventAggregator::build(event, Arc::clone(&self.blocklist))),
                Err(e) => {
                    warn!(sport = %sport_key, error = %e, "Skipping malformed event");
                    None
                }
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
