//! Cross-event ranking of markets by arbitrage ratio.

use rust_decimal::Decimal;
use std::cmp::Ordering;

use super::aggregator::EventAggregator;
use crate::analysis::{Delta, MarketAnalyzer};

/// One ranked market. Borrows the analyzer from its event.
#[derive(Debug, Clone)]
pub struct RankedMarket<'a> {
    /// `None` when the market had no eligible quotes.
    pub arbitrage: Option<Decimal>,
    pub delta: Delta,
    pub market: &'a MarketAnalyzer,
}

pub struct RankingPipeline;

impl RankingPipeline {
    /// Rank every market of every event.
    ///
    /// Order: arbitrage ascending (most negative first), then delta
    /// descending. Markets without data go last.
    pub fn rank<'a, I>(events: I) -> Vec<RankedMarket<'a>>
    where
        I: IntoIterator<Item = &'a EventAggregator>,
    {
        let mut ranked: Vec<RankedMarket<'a>> = events
            .into_iter()
            .flat_map(|event| event.markets().values())
            .map(|market| RankedMarket {
                arbitrage: market.arbitrage(),
                delta: market.biggest_delta(),
                market,
            })
            .collect();

        ranked.sort_by(Self::compare);
        ranked
    }

    fn compare(a: &RankedMarket<'_>, b: &RankedMarket<'_>) -> Ordering {
        let by_arb = match (a.arbitrage, b.arbitrage) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_arb.then_with(|| b.delta.value.cmp(&a.delta.value))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
