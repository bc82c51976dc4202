//! Per-event aggregation.
//!
//! Folds every bookmaker's market blocks for a single event into one
//! `MarketAnalyzer` per bet type. Built once; read-only afterwards.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::analysis::{BlockList, Insertion, MarketAnalyzer};
use crate::types::{PriceQuote, RawBookmaker, RawEvent};

/// Quote counts gathered while building an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub recorded: usize,
    pub blocked: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone)]
pub struct EventAggregator {
    event_id: String,
    sport_key: String,
    sport_title: String,
    commence_time: DateTime<Utc>,
    label: String,
    bookmakers: Vec<RawBookmaker>,
    markets: BTreeMap<String, MarketAnalyzer>,
    stats: IngestStats,
}

impl EventAggregator {
    /// Build the per-bet-type analyzers for one validated event.
    ///
    /// Malformed quotes are logged and skipped; they never abort the event.
    pub fn build(event: RawEvent, blocklist: Arc<BlockList>) -> Self {
        let label = event.label();
        let mut aggregator = Self {
            event_id: event.id,
            sport_key: event.sport_key,
            sport_title: event.sport_title,
            commence_time: event.commence_time,
            label,
            bookmakers: Vec::new(),
            markets: BTreeMap::new(),
            stats: IngestStats::default(),
        };

        for bookmaker in &event.bookmakers {
            aggregator.ingest_bookmaker(bookmaker, &blocklist);
        }
        aggregator.bookmakers = event.bookmakers;

        debug!(
            event_id = %aggregator.event_id,
            event = %aggregator.label(),
            sport = %aggregator.sport_title(),
            commence_time = %aggregator.commence_time(),
            markets = aggregator.markets.len(),
            recorded = aggregator.stats.recorded,
            blocked = aggregator.stats.blocked,
            rejected = aggregator.stats.rejected,
            "Event aggregated"
        );

        aggregator
    }

    fn ingest_bookmaker(&mut self, bookmaker: &RawBookmaker, blocklist: &Arc<BlockList>) {
        for market in &bookmaker.markets {
            for outcome in &market.outcomes {
                let result = PriceQuote::from_f64(outcome.price, &bookmaker.title).and_then(|q| {
                    self.market_or_create(&market.key, blocklist)
                        .add_outcome(&outcome.name, q.price, &q.bookmaker)
                });

                match result {
                    Ok(Insertion::Recorded) => self.stats.recorded += 1,
                    Ok(Insertion::Blocked) => self.stats.blocked += 1,
                    Err(e) => {
                        self.stats.rejected += 1;
                        warn!(
                            event_id = %self.event_id,
                            bet_type = %market.key,
                            outcome = %outcome.name,
                            error = %e,
                            "Skipping malformed quote"
                        );
                    }
                }
            }
        }
    }

    /// Analyzer for `bet_type`, created on first sight.
    fn market_or_create(&mut self, bet_type: &str, blocklist: &Arc<BlockList>) -> &mut MarketAnalyzer {
        let label = &self.label;
        self.markets
            .entry(bet_type.to_string())
            .or_insert_with(|| MarketAnalyzer::new(label.clone(), bet_type, Arc::clone(blocklist)))
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn sport_key(&self) -> &str {
        &self.sport_key
    }

    pub fn sport_title(&self) -> &str {
        &self.sport_title
    }

    pub fn commence_time(&self) -> DateTime<Utc> {
        self.commence_time
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn bookmakers(&self) -> &[RawBookmaker] {
        &self.bookmakers
    }

    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    /// Bet type → analyzer, in bet-type order.
    pub fn markets(&self) -> &BTreeMap<String, MarketAnalyzer> {
        &self.markets
    }

    pub fn market(&self, bet_type: &str) -> Option<&MarketAnalyzer> {
        self.markets.get(bet_type)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
