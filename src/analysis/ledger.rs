//! Per-outcome price ledger.
//!
//! Groups every bookmaker quote for a single (event, bet type) by outcome
//! label. Each outcome's quotes stay sorted ascending by price so the
//! worst and best price are always the first and last entries.

use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::debug;

use crate::types::{OddsError, PriceQuote};

/// Bookmakers excluded from analysis by default.
pub const DEFAULT_BLOCKED_BOOKMAKERS: &[&str] = &["MyBookie.ag", "Bovada"];

// ---------------------------------------------------------------------------
// Block list
// ---------------------------------------------------------------------------

/// Set of bookmaker names whose quotes are never recorded.
///
/// Matching is case-insensitive on the bookmaker's display title.
#[derive(Debug, Clone, Default)]
pub struct BlockList {
    names: HashSet<String>,
}

impl BlockList {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|n| n.as_ref().trim().to_lowercase())
                .filter(|n| !n.is_empty())
                .collect(),
        }
    }

    /// An empty block list: every bookmaker is eligible.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn contains(&self, bookmaker: &str) -> bool {
        self.names.contains(&bookmaker.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Result of offering a quote to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    Recorded,
    Blocked,
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct OutcomeLedger {
    blocklist: Arc<BlockList>,
    outcomes: BTreeMap<String, Vec<PriceQuote>>,
}

impl OutcomeLedger {
    pub fn new(blocklist: Arc<BlockList>) -> Self {
        Self {
            blocklist,
            outcomes: BTreeMap::new(),
        }
    }

    /// Record a quote for `outcome`, creating the outcome on first sight.
    ///
    /// Quotes from block-listed bookmakers are dropped and reported as
    /// `Insertion::Blocked`. A zero price is rejected with `MalformedQuote`
    /// since arbitrage divides by it.
    pub fn add_outcome(
        &mut self,
        outcome: &str,
        price: Decimal,
        bookmaker: &str,
    ) -> Result<Insertion, OddsError> {
        if self.blocklist.contains(bookmaker) {
            debug!(bookmaker, outcome, "Dropping quote from blocked bookmaker");
            return Ok(Insertion::Blocked);
        }

        if price.is_zero() {
            return Err(OddsError::MalformedQuote {
                bookmaker: bookmaker.to_string(),
                reason: format!("zero price for outcome '{outcome}'"),
            });
        }

        let quotes = self.outcomes.entry(outcome.to_string()).or_default();
        quotes.push(PriceQuote::new(price, bookmaker));
        quotes.sort_by(|a, b| {
            a.price
                .cmp(&b.price)
                .then_with(|| a.bookmaker.cmp(&b.bookmaker))
        });

        Ok(Insertion::Recorded)
    }

    /// All quotes for an outcome, ascending by price.
    pub fn quotes(&self, outcome: &str) -> &[PriceQuote] {
        self.outcomes.get(outcome).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn best_quote(&self, outcome: &str) -> Result<&PriceQuote, OddsError> {
        self.quotes(outcome)
            .last()
            .ok_or_else(|| OddsError::EmptyOutcome(outcome.to_string()))
    }

    pub fn worst_quote(&self, outcome: &str) -> Result<&PriceQuote, OddsError> {
        self.quotes(outcome)
            .first()
            .ok_or_else(|| OddsError::EmptyOutcome(outcome.to_string()))
    }

    /// Highest price recorded for `outcome`.
    pub fn best_price(&self, outcome: &str) -> Result<Decimal, OddsError> {
        self.best_quote(outcome).map(|q| q.price)
    }

    /// Lowest price recorded for `outcome`.
    pub fn worst_price(&self, outcome: &str) -> Result<Decimal, OddsError> {
        self.worst_quote(outcome).map(|q| q.price)
    }

    /// Outcome labels in sorted order.
    pub fn outcomes(&self) -> impl Iterator<Item = &str> {
        self.outcomes.keys().map(String::as_str)
    }

    pub fn contains(&self, outcome: &str) -> bool {
        self.outcomes.contains_key(outcome)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
