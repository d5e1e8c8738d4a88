//! End-to-end ranking: account file and mock HTTP sources in, ordered endpoints out.

use hopper_core::{
    pools::{flatten_endpoints, PoolSelector, ScoringVariant},
    scoring::UNKNOWN_DIFFICULTY_VALUE,
};

use crate::mock_infrastructure::{
    account_file, mock_cache, stats_payload, StatsMockBuilder, TEST_NOW,
};

/// `I(p)` at the progress one fresh round reaches after 100s at difficulty 1000 with no
/// observed pool rate.
const FRESH_ROUND_VALUE: f64 = 0.321_083_979_992_538_51;

fn assert_close(actual: f64, expected: f64) {
    assert!(((actual - expected) / expected).abs() < 1e-8, "expected {expected}, got {actual}");
}

#[tokio::test]
async fn test_flat_only_configuration_skips_network() {
    let mock = StatsMockBuilder::new().await;
    let (cache, _clock) = mock_cache(&mock);
    let accounts = account_file(&["eligius 1HopperAddress x"]);

    let selector = PoolSelector::load(accounts.path(), cache).unwrap();
    let ranked = selector.rank().await;

    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].variant(), ScoringVariant::Flat);
    assert!((ranked[0].utility - (1.0 - 0.000_000_409_6)).abs() < 1e-15);
}

#[tokio::test]
async fn test_fresh_round_scores_through_http() {
    let mut mock = StatsMockBuilder::new().await;
    mock.mock_difficulty("1000", 1);
    mock.mock_stats(&stats_payload(&[("bitclockers", 0.0, &[(TEST_NOW - 100.0, 1.0)])]), 1);
    let (cache, _clock) = mock_cache(&mock);
    let accounts = account_file(&["bitclockers worker pass 1"]);

    let selector = PoolSelector::load(accounts.path(), cache).unwrap();
    let ranked = selector.rank().await;

    assert_close(ranked[0].utility, FRESH_ROUND_VALUE * (1.0 - 0.02 - 0.01));
    mock.assert_all();
}

#[tokio::test]
async fn test_unreachable_difficulty_keeps_pools_ranked() {
    let mut mock = StatsMockBuilder::new().await;
    mock.fail_difficulty(500, 3);
    mock.mock_stats(&stats_payload(&[("mtred", 0.0, &[(TEST_NOW - 100.0, 0.5)])]), 1);
    let (cache, _clock) = mock_cache(&mock);
    let accounts = account_file(&["mtred a x", "eligius b y"]);

    let selector = PoolSelector::load(accounts.path(), cache).unwrap();
    let ranked = selector.rank().await;

    // Unknown difficulty credits each round at full value, which stays below a flat pool.
    assert_eq!(ranked[0].name(), "eligius");
    assert_eq!(ranked[1].name(), "mtred");
    assert_close(ranked[1].utility, 0.5 * UNKNOWN_DIFFICULTY_VALUE);
    mock.assert_all();
}

#[tokio::test]
async fn test_endpoint_list_follows_rank_then_catalog_order() {
    let mut mock = StatsMockBuilder::new().await;
    mock.mock_difficulty("1000000", 1);
    mock.mock_stats(
        &stats_payload(&[
            ("mtred", 0.0, &[(TEST_NOW - 5_000.0, 0.5)]),
            ("btcguild", 0.0, &[(TEST_NOW - 10.0, 0.5)]),
            ("arsbitcoin", 0.0, &[]),
        ]),
        1,
    );
    let (cache, _clock) = mock_cache(&mock);
    let accounts = account_file(&[
        "# pool      user    password  donation%",
        "mtred       m-user  m-pass",
        "arsbitcoin  a-user  a-pass",
        "btcguild    g-user  g-pass    0.5",
    ]);

    let selector = PoolSelector::load(accounts.path(), cache).unwrap();
    let ranked = selector.rank().await;
    let order: Vec<_> = ranked.iter().map(|pool| pool.name()).collect();
    assert_eq!(order, vec!["btcguild", "mtred", "arsbitcoin"]);

    let endpoints = flatten_endpoints(&ranked);
    let listed: Vec<_> = endpoints.iter().map(|e| (e.endpoint, e.username.as_str())).collect();
    assert_eq!(
        listed,
        vec![
            ("uscentral.btcguild.com:8332", "g-user"),
            ("useast.btcguild.com:8332", "g-user"),
            ("de1.btcguild.com:8332", "g-user"),
            ("de2.btcguild.com:8332", "g-user"),
            ("173.193.21.69:8337", "m-user"),
            ("arsbitcoin.com:8344", "a-user"),
        ]
    );
    mock.assert_all();
}

#[tokio::test]
async fn test_tied_pools_keep_account_file_order() {
    let mut mock = StatsMockBuilder::new().await;
    mock.mock_difficulty("1000", 1);
    mock.mock_stats(&stats_payload(&[]), 1);
    let (cache, _clock) = mock_cache(&mock);
    let accounts = account_file(&["mineco.in a x", "bitcoins.lc b y", "arsbitcoin c z"]);

    let selector = PoolSelector::load(accounts.path(), cache).unwrap();
    let endpoints = selector.endpoints().await;

    let pools: Vec<_> = endpoints.iter().map(|e| e.pool).collect();
    assert_eq!(pools, vec!["mineco.in", "bitcoins.lc", "arsbitcoin"]);
    mock.assert_all();
}

#[tokio::test]
async fn test_repeated_ranking_is_stable_and_cached() {
    let mut mock = StatsMockBuilder::new().await;
    mock.mock_difficulty("1500000", 1);
    mock.mock_stats(
        &stats_payload(&[
            ("mtred", 3e9, &[(TEST_NOW - 600.0, 0.2), (TEST_NOW - 60.0, 0.3)]),
            ("bitcoins.lc", 1e9, &[(TEST_NOW - 30.0, 0.1)]),
        ]),
        1,
    );
    let (cache, _clock) = mock_cache(&mock);
    let accounts = account_file(&["mtred a x 2", "bitcoins.lc b y", "eligius c z"]);
    let selector = PoolSelector::load(accounts.path(), cache).unwrap();

    let summarize = |ranked: Vec<hopper_core::pools::RankedPool>| {
        ranked.into_iter().map(|r| (r.name(), r.utility.to_bits())).collect::<Vec<_>>()
    };
    let first = summarize(selector.rank().await);
    let second = summarize(selector.rank().await);
    assert_eq!(first, second);
    mock.assert_all();
}

#[tokio::test]
async fn test_reload_picks_up_account_changes() {
    let mock = StatsMockBuilder::new().await;
    let (cache, _clock) = mock_cache(&mock);
    let accounts = account_file(&["eligius a x"]);
    let selector = PoolSelector::load(accounts.path(), cache).unwrap();
    assert_eq!(selector.rank().await.len(), 1);

    std::fs::write(accounts.path(), "eligius a x\neligius dup y\nslush u p\n").unwrap();
    assert_eq!(selector.reload().unwrap(), 1);

    std::fs::write(accounts.path(), "").unwrap();
    assert_eq!(selector.reload().unwrap(), 0);
    assert!(selector.endpoints().await.is_empty());
}

#[tokio::test]
async fn test_missing_account_file_is_fatal() {
    let mock = StatsMockBuilder::new().await;
    let (cache, _clock) = mock_cache(&mock);
    let dir = tempfile::tempdir().unwrap();

    let result = PoolSelector::load(dir.path().join("missing.conf"), cache);
    assert!(result.is_err());
}
