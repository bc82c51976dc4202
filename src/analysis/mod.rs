//! Price analysis core.
//!
//! Synchronous, allocation-light building blocks: the per-outcome
//! `OutcomeLedger` and the `MarketAnalyzer` that derives spread and
//! arbitrage figures from it. Nothing here performs I/O.

pub mod ledger;
pub mod market;

pub use ledger::{BlockList, Insertion, OutcomeLedger, DEFAULT_BLOCKED_BOOKMAKERS};
pub use market::{Delta, MarketAnalyzer, OutcomeSpread};
