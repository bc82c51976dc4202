//! End-to-end pipeline tests: mock feed → scanner → ranking → report.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio_test::{assert_err, assert_ok};

use oddsdelta::analysis::{BlockList, DEFAULT_BLOCKED_BOOKMAKERS};
use oddsdelta::engine::report::{render_catalog, render_ranking};
use oddsdelta::engine::{OddsScanner, RankingPipeline};

use crate::mock_source::{event, h2h_book, MockOddsSource};

fn scanner(source: MockOddsSource) -> OddsScanner {
    OddsScanner::new(Box::new(source), BlockList::new(DEFAULT_BLOCKED_BOOKMAKERS))
}

fn keys(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

#[tokio::test]
async fn test_two_bookmaker_scenario() {
    let source = MockOddsSource::new().with_events(
        "upcoming",
        vec![event(
            "evt-1",
            "basketball_nba",
            "A",
            "B",
            vec![
                h2h_book("X", &[("A", 2.1), ("B", 1.9)]),
                h2h_book("Y", &[("A", 2.3), ("B", 1.95)]),
            ],
        )],
    );

    let events = assert_ok!(scanner(source).scan_events(&keys(&["upcoming"])).await);
    assert_eq!(events.len(), 1);

    let market = events[0].market("h2h").unwrap();
    let spreads = market.spreads();
    assert_eq!(spreads[0].outcome, "A");
    assert_eq!(spreads[0].delta(), dec!(0.2));
    assert_eq!(spreads[0].best.bookmaker, "Y");
    assert_eq!(spreads[1].outcome, "B");
    assert_eq!(spreads[1].delta(), dec!(0.05));

    let delta = market.biggest_delta();
    assert_eq!(delta.value, dec!(0.2));
    assert_eq!(delta.outcome.as_deref(), Some("A"));

    let expected = Decimal::ONE - (Decimal::ONE / dec!(2.3) + Decimal::ONE / dec!(1.95));
    assert_eq!(market.arbitrage(), Some(expected));

    let ranked = RankingPipeline::rank(&events);
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].arbitrage, Some(expected));
    assert_eq!(ranked[0].delta.value, dec!(0.2));
}

#[tokio::test]
async fn test_blocked_bookmakers_never_reach_the_ranking() {
    let source = MockOddsSource::new().with_events(
        "soccer_epl",
        vec![event(
            "evt-1",
            "soccer_epl",
            "Arsenal",
            "Chelsea",
            vec![
                h2h_book("FanDuel", &[("Arsenal", 2.0), ("Chelsea", 3.6), ("Draw", 3.4)]),
                // Would create an arbitrage if counted
                h2h_book("Bovada", &[("Arsenal", 9.0), ("Chelsea", 9.0), ("Draw", 9.0)]),
                h2h_book("MyBookie.ag", &[("Arsenal", 1.01)]),
            ],
        )],
    );

    let events = assert_ok!(scanner(source).scan_events(&keys(&["soccer_epl"])).await);
    let ranked = RankingPipeline::rank(&events);
    assert_eq!(ranked.len(), 1);

    let entry = &ranked[0];
    let fanduel_only = Decimal::ONE
        - (Decimal::ONE / dec!(2.0) + Decimal::ONE / dec!(3.6) + Decimal::ONE / dec!(3.4));
    assert_eq!(entry.arbitrage, Some(fanduel_only));
    assert_eq!(entry.delta.value, Decimal::ZERO);
    for spread in entry.market.spreads() {
        assert_eq!(spread.best.bookmaker, "FanDuel");
        assert_eq!(spread.worst.bookmaker, "FanDuel");
    }

    let stats = events[0].stats();
    assert_eq!(stats.recorded, 3);
    assert_eq!(stats.blocked, 4);
}

#[tokio::test]
async fn test_ranking_across_sports() {
    let source = MockOddsSource::new()
        .with_events(
            "basketball_nba",
            vec![
                // 1 - (1/2.5 + 1/2.5) = 0.2
                event("nba-1", "basketball_nba", "A", "B", vec![h2h_book("X", &[("A", 2.5), ("B", 2.5)])]),
                // 1 - (1/1.8 + 1/1.9) < 0, best prices split across books
                event(
                    "nba-2",
                    "basketball_nba",
                    "C",
                    "D",
                    vec![
                        h2h_book("X", &[("C", 1.8), ("D", 1.6)]),
                        h2h_book("Y", &[("C", 1.5), ("D", 1.9)]),
                    ],
                ),
            ],
        )
        .with_events(
            "soccer_epl",
            vec![event(
                "epl-1",
                "soccer_epl",
                "E",
                "F",
                vec![h2h_book("X", &[("E", 2.0), ("F", 2.0)])],
            )],
        );

    let events = assert_ok!(
        scanner(source)
            .scan_events(&keys(&["basketball_nba", "soccer_epl"]))
            .await
    );
    assert_eq!(events.len(), 3);

    let ranked = RankingPipeline::rank(&events);
    let order: Vec<_> = ranked.iter().map(|r| r.market.event_label()).collect();
    assert_eq!(
        order,
        vec!["BASKETBALL_NBA - C vs D", "SOCCER_EPL - E vs F", "BASKETBALL_NBA - A vs B"]
    );
    assert!(ranked[0].arbitrage.unwrap() < Decimal::ZERO);
    assert!(ranked
        .windows(2)
        .all(|w| w[0].arbitrage.unwrap() <= w[1].arbitrage.unwrap()));

    let report = render_ranking(&ranked, 2);
    assert!(report.starts_with("BASKETBALL_NBA - C vs D - h2h\n"));
    assert!(report.contains("\tC: 1.5 (Y) to 1.8 (X)\n"));
    assert!(report.contains("\tD: 1.6 (X) to 1.9 (Y)\n"));
    assert!(report.contains("\tBest Delta: 0.3\n"));
    assert!(!report.contains("A vs B"));
}

#[tokio::test]
async fn test_failed_sport_does_not_abort_scan() {
    let source = MockOddsSource::new()
        .with_events(
            "basketball_nba",
            vec![event("nba-1", "basketball_nba", "A", "B", vec![h2h_book("X", &[("A", 1.9), ("B", 1.9)])])],
        );
    source.fail_sport("soccer_epl");
    let probe = source.clone();

    let events = assert_ok!(
        scanner(source)
            .scan_events(&keys(&["soccer_epl", "basketball_nba"]))
            .await
    );
    assert_eq!(events.len(), 1);
    assert_eq!(probe.requests(), vec!["soccer_epl", "basketball_nba"]);
}

#[tokio::test]
async fn test_every_sport_failing_is_an_error() {
    let source = MockOddsSource::new();
    source.fail_sport("upcoming");
    assert_err!(scanner(source).scan_events(&keys(&["upcoming"])).await);
}

#[tokio::test]
async fn test_malformed_quotes_and_events_are_skipped() {
    let mut broken = event("bad", "basketball_nba", "A", "B", vec![]);
    broken.as_object_mut().unwrap().remove("commence_time");

    let source = MockOddsSource::new().with_events(
        "basketball_nba",
        vec![
            broken,
            event(
                "good",
                "basketball_nba",
                "A",
                "B",
                vec![
                    h2h_book("X", &[("A", 0.0), ("B", 1.8)]),
                    h2h_book("Y", &[("A", 2.4), ("B", 1.7)]),
                ],
            ),
        ],
    );

    let events = assert_ok!(scanner(source).scan_events(&keys(&["basketball_nba"])).await);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_id(), "good");
    assert_eq!(events[0].stats().rejected, 1);

    let market = events[0].market("h2h").unwrap();
    assert_eq!(market.ledger().quotes("A").len(), 1);
    assert_eq!(market.biggest_delta().value, dec!(0.1));
}

#[tokio::test]
async fn test_catalog_lists_active_sports_by_group() {
    let scanner = scanner(MockOddsSource::new());
    let sports = assert_ok!(scanner.scan_catalog().await);
    assert_eq!(sports.len(), 3);

    let rendered = render_catalog(&sports);
    let expected = "American Football:\n\
                    \tCFL with key americanfootball_cfl - Canadian Football League\n\
                    \tNFL with key americanfootball_nfl - US Football\n\
                    Basketball:\n\
                    \tNBA with key basketball_nba - US Basketball\n";
    assert_eq!(rendered, expected);
}
