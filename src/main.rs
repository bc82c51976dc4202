//! ODDSDELTA: Sportsbook price spread and arbitrage scanner
//!
//! Entry point. Loads configuration, initialises structured logging,
//! fetches odds for the configured sports, ranks every market by its
//! arbitrage ratio and prints the report.
//!
//! Usage: `oddsdelta [sport_key ...]`. Sport keys on the command line
//! replace `scan.sports` from the config.

use anyhow::Result;
use tracing::{info, warn};

use oddsdelta::analysis::BlockList;
use oddsdelta::config;
use oddsdelta::engine::report::{render_catalog, render_ranking};
use oddsdelta::engine::{OddsScanner, RankingPipeline};
use oddsdelta::platforms::odds_api::OddsApiClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = config::AppConfig::load("config.toml")?;

    init_logging();

    let sport_keys: Vec<String> = {
        let args: Vec<String> = std::env::args().skip(1).collect();
        if args.is_empty() {
            cfg.scan.sports.clone()
        } else {
            args
        }
    };

    info!(
        sports = ?sport_keys,
        markets = %cfg.odds_api.markets,
        regions = %cfg.odds_api.regions,
        blocked = ?cfg.analysis.blocked_bookmakers,
        "ODDSDELTA starting up"
    );

    // -- Initialise components -------------------------------------------

    let keys = cfg.odds_api.resolve_keys()?;
    let client = OddsApiClient::new(&cfg.odds_api, keys)?;
    info!(keys = client.key_count(), "Odds API client ready");

    let scanner = OddsScanner::new(
        Box::new(client),
        BlockList::new(&cfg.analysis.blocked_bookmakers),
    );
    if scanner.blocklist().is_empty() {
        warn!("No bookmakers blocked, every quote is eligible");
    } else {
        info!(blocked = scanner.blocklist().len(), "Bookmaker block list loaded");
    }

    // -- Catalog ---------------------------------------------------------

    if cfg.scan.show_catalog {
        match scanner.scan_catalog().await {
            Ok(sports) => print!("{}", render_catalog(&sports)),
            Err(e) => warn!(error = %e, "Catalog fetch failed, continuing to odds scan"),
        }
    }

    // -- Scan → rank → report --------------------------------------------

    let events = scanner.scan_events(&sport_keys).await?;
    let ranked = RankingPipeline::rank(&events);

    let no_data = ranked.iter().filter(|r| r.arbitrage.is_none()).count();
    info!(
        events = events.len(),
        markets = ranked.len(),
        no_data,
        "Ranking complete"
    );

    print!("{}", render_ranking(&ranked, cfg.scan.top_n));

    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("oddsdelta=info"));

    let json_logging = std::env::var("ODDSDELTA_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
