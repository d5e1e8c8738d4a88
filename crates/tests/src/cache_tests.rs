//! Integration tests for the data cache over real HTTP.

use futures::future::join_all;
use std::sync::Arc;

use crate::mock_infrastructure::{mock_cache, stats_payload, StatsMockBuilder, TEST_NOW};

#[tokio::test]
async fn test_bulk_stats_fetched_once_per_ttl() {
    let mut mock = StatsMockBuilder::new().await;
    mock.mock_stats(
        &stats_payload(&[("mtred", 1e9, &[(TEST_NOW - 10.0, 1.0)]), ("bitclockers", 2e9, &[])]),
        1,
    );
    let (cache, clock) = mock_cache(&mock);

    for pool in ["mtred", "bitclockers", "mineco.in", "mtred"] {
        cache.get_stats(pool).await;
    }
    clock.advance(120.0);
    assert!((cache.get_stats("bitclockers").await.rate - 2e9).abs() < 1.0);

    mock.assert_all();
}

#[tokio::test]
async fn test_refresh_after_ttl() {
    let mut mock = StatsMockBuilder::new().await;
    mock.mock_difficulty("1000", 2);
    let (cache, clock) = mock_cache(&mock);

    assert!((cache.get_difficulty().await - 1_000.0).abs() < f64::EPSILON);
    clock.advance(3_601.0);
    assert!((cache.get_difficulty().await - 1_000.0).abs() < f64::EPSILON);
    assert_eq!(cache.difficulty_fetched_at(), Some(TEST_NOW + 3_601.0));

    mock.assert_all();
}

#[tokio::test]
async fn test_server_errors_keep_stale_values() {
    let mut mock = StatsMockBuilder::new().await;
    mock.mock_difficulty("2500", 1);
    mock.mock_stats(&stats_payload(&[("mtred", 7e9, &[(TEST_NOW - 5.0, 0.5)])]), 1);
    let (cache, clock) = mock_cache(&mock);

    cache.get_difficulty().await;
    cache.get_stats("mtred").await;
    mock.assert_and_reset();

    // One attempt plus two retries each.
    mock.fail_difficulty(500, 3);
    mock.fail_stats(502, 3);
    clock.advance(10_000.0);

    assert!((cache.get_difficulty().await - 2_500.0).abs() < f64::EPSILON);
    let stats = cache.get_stats("mtred").await;
    assert!((stats.rate - 7e9).abs() < 1.0);
    assert_eq!(stats.rounds.len(), 1);
    assert_eq!(cache.difficulty_fetched_at(), Some(TEST_NOW));
    assert_eq!(cache.stats_fetched_at(), Some(TEST_NOW));

    mock.assert_all();
}

#[tokio::test]
async fn test_malformed_payload_keeps_previous_snapshot() {
    let mut mock = StatsMockBuilder::new().await;
    mock.mock_stats(&stats_payload(&[("btcguild", 3e9, &[])]), 1);
    let (cache, clock) = mock_cache(&mock);

    cache.get_stats("btcguild").await;
    mock.assert_and_reset();

    mock.mock_stats_body("{ truncated", 1);
    clock.advance(500.0);
    assert!((cache.get_stats("btcguild").await.rate - 3e9).abs() < 1.0);

    mock.assert_all();
}

#[tokio::test]
async fn test_concurrent_callers_share_one_fetch() {
    let mut mock = StatsMockBuilder::new().await;
    mock.mock_difficulty("1000", 1);
    mock.mock_stats(&stats_payload(&[("mtred", 1e9, &[])]), 1);
    let (cache, _clock) = mock_cache(&mock);

    let difficulty_calls = (0..32).map(|_| {
        let cache = Arc::clone(&cache);
        tokio::spawn(async move { cache.get_difficulty().await })
    });
    let stats_calls = (0..32).map(|_| {
        let cache = Arc::clone(&cache);
        tokio::spawn(async move { cache.get_stats("mtred").await.rate })
    });

    for result in join_all(difficulty_calls).await {
        assert!((result.unwrap() - 1_000.0).abs() < f64::EPSILON);
    }
    for result in join_all(stats_calls).await {
        assert!((result.unwrap() - 1e9).abs() < 1.0);
    }

    mock.assert_all();
}
