//! Plain-text rendering of the catalog and the ranked markets.

use rust_decimal::Decimal;

use super::ranking::RankedMarket;
use crate::types::Sport;

/// Sports grouped by category, in first-seen group order.
pub fn render_catalog(sports: &[Sport]) -> String {
    let mut groups: Vec<(&str, Vec<&Sport>)> = Vec::new();
    for sport in sports {
        match groups.iter_mut().find(|(g, _)| *g == sport.group) {
            Some((_, members)) => members.push(sport),
            None => groups.push((sport.group.as_str(), vec![sport])),
        }
    }

    let mut out = String::new();
    for (group, members) in groups {
        out.push_str(&format!("{group}:\n"));
        for sport in members {
            out.push_str(&format!("\t{sport}\n"));
        }
    }
    out
}

/// Ranked markets, each followed by its arbitrage ratio.
///
/// `top_n` of zero prints everything.
pub fn render_ranking(ranked: &[RankedMarket<'_>], top_n: usize) -> String {
    let limit = if top_n == 0 { ranked.len() } else { top_n.min(ranked.len()) };

    let mut out = String::new();
    for entry in &ranked[..limit] {
        out.push_str(&format!("{}\n", entry.market));
        out.push_str(&format!("\tArbitrage: {}\n", format_arbitrage(entry.arbitrage)));
    }
    out
}

fn format_arbitrage(arbitrage: Option<Decimal>) -> String {
    match arbitrage {
        Some(a) => a.round_dp(6).normalize().to_string(),
        None => "no data".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
