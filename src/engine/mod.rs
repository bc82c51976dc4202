//! Core engine: fetch → aggregate → rank → report.

pub mod aggregator;
pub mod ranking;
pub mod report;
pub mod scanner;

pub use aggregator::{EventAggregator, IngestStats};
pub use ranking::{RankedMarket, RankingPipeline};
pub use scanner::OddsScanner;
