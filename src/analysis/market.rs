//! Market-level spread and arbitrage analysis.
//!
//! A `MarketAnalyzer` owns the ledger for one (event, bet type) pair and
//! derives two numbers from it:
//!
//! - **Biggest delta**: the widest gap between the best and worst price
//!   offered for any single outcome.
//! - **Arbitrage ratio**: `1 - Σ 1/best_price` over all outcomes, using
//!   decimal odds. `Σ 1/best_price` is the implied probability of the
//!   best available book; the ratio is zero for a fair book and markets
//!   are ranked ascending by it.

use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

use super::ledger::{BlockList, Insertion, OutcomeLedger};
use crate::types::{OddsError, PriceQuote};

/// Largest best-vs-worst spread in a market.
///
/// `outcome` is `None` when no outcome had any eligible quote, in which
/// case `value` is zero and the reading carries no information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delta {
    pub value: Decimal,
    pub outcome: Option<String>,
}

impl Delta {
    fn no_data() -> Self {
        Self {
            value: Decimal::ZERO,
            outcome: None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        self.outcome.is_none()
    }
}

/// Best and worst quote for one outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeSpread<'a> {
    pub outcome: &'a str,
    pub worst: &'a PriceQuote,
    pub best: &'a PriceQuote,
}

impl OutcomeSpread<'_> {
    /// Saturates at `Decimal::MAX` for prices at opposite ends of the range.
    pub fn delta(&self) -> Decimal {
        self.best.price.saturating_sub(self.worst.price).abs()
    }
}

#[derive(Debug, Clone)]
pub struct MarketAnalyzer {
    event_label: String,
    bet_type: String,
    ledger: OutcomeLedger,
}

impl MarketAnalyzer {
    pub fn new(
        event_label: impl Into<String>,
        bet_type: impl Into<String>,
        blocklist: Arc<BlockList>,
    ) -> Self {
        Self {
            event_label: event_label.into(),
            bet_type: bet_type.into(),
            ledger: OutcomeLedger::new(blocklist),
        }
    }

    pub fn event_label(&self) -> &str {
        &self.event_label
    }

    pub fn bet_type(&self) -> &str {
        &self.bet_type
    }

    pub fn ledger(&self) -> &OutcomeLedger {
        &self.ledger
    }

    pub fn add_outcome(
        &mut self,
        outcome: &str,
        price: Decimal,
        bookmaker: &str,
    ) -> Result<Insertion, OddsError> {
        self.ledger.add_outcome(outcome, price, bookmaker)
    }

    /// Best/worst pair for every populated outcome.
    pub fn spreads(&self) -> Vec<OutcomeSpread<'_>> {
        self.ledger
            .outcomes()
            .filter_map(|outcome| {
                let worst = self.ledger.worst_quote(outcome).ok()?;
                let best = self.ledger.best_quote(outcome).ok()?;
                Some(OutcomeSpread { outcome, worst, best })
            })
            .collect()
    }

    /// Widest `|best - worst|` across outcomes.
    pub fn biggest_delta(&self) -> Delta {
        self.spreads()
            .into_iter()
            .fold(Delta::no_data(), |acc, spread| {
                let delta = spread.delta();
                if acc.is_no_data() || delta > acc.value {
                    Delta {
                        value: delta,
                        outcome: Some(spread.outcome.to_string()),
                    }
                } else {
                    acc
                }
            })
    }

    /// `1 - Σ 1/best_price`, or `None` when no outcome has a quote or
    /// the sum does not fit in a `Decimal`.
    ///
    /// Only meaningful when the outcomes are mutually exclusive and
    /// exhaustive (win/draw/lose); the formula runs regardless.
    pub fn arbitrage(&self) -> Option<Decimal> {
        let spreads = self.spreads();
        if spreads.is_empty() {
            return None;
        }

        let ratio = spreads
            .iter()
            .try_fold(Decimal::ZERO, |implied, s| {
                Decimal::ONE
                    .checked_div(s.best.price)
                    .and_then(|inverse| implied.checked_add(inverse))
            })
            .and_then(|implied| Decimal::ONE.checked_sub(implied));

        if ratio.is_none() {
            warn!(
                event = %self.event_label,
                bet_type = %self.bet_type,
                "Arbitrage ratio overflowed, treating market as no data"
            );
        }
        ratio
    }
}

impl fmt::Display for MarketAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} - {}", self.event_label, self.bet_type)?;
        for spread in self.spreads() {
            writeln!(f, "\t{}: {} to {}", spread.outcome, spread.worst, spread.best)?;
        }
        let delta = self.biggest_delta();
        if delta.is_no_data() {
            write!(f, "\tBest Delta: no data")
        } else {
            write!(f, "\tBest Delta: {}", delta.value.normalize())
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
