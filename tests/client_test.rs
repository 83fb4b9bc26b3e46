//! Wiremock integration tests for RiotClient.
//!
//! These verify cache, retry and error classification against a mocked upstream.

use std::sync::Arc;
use std::time::{Duration, Instant};

use riftwatch::cache::ResponseCache;
use riftwatch::client::{MatchIdsQuery, Route};
use riftwatch::{ErrorKind, RateLimitConfig, RetryConfig, RiftwatchError, RiotClient};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "RGAPI-test";

fn fast_retry() -> RetryConfig {
    RetryConfig::new()
        .max_attempts(3)
        .initial_delay(Duration::from_millis(10))
        .max_delay(Duration::from_millis(50))
        .jitter(false)
}

fn client_for(server: &MockServer) -> RiotClient {
    RiotClient::builder(KEY)
        .base_url(server.uri())
        .retry(fast_retry())
        .build()
        .expect("client should build")
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.map_or(0, |r| r.len())
}

#[tokio::test]
async fn test_fetch_success_sends_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/riot/account/v1/accounts/by-riot-id/Faker/KR1"))
        .and(header("X-Riot-Token", KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "puuid": "puuid-1",
            "gameName": "Faker",
            "tagLine": "KR1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let account = client_for(&server)
        .account_by_riot_id("Faker", "KR1")
        .await
        .expect("lookup should succeed");
    assert_eq!(account.puuid, "puuid-1");
    assert_eq!(account.display_name(), "Faker#KR1");
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lol/match/v5/matches/NA1_404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .match_details("NA1_404")
        .await
        .unwrap_err();
    assert!(matches!(err, RiftwatchError::NotFound(_)), "got {err:?}");
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn test_two_failures_then_success_is_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lol/match/v5/matches/NA1_1"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/lol/match/v5/matches/NA1_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadata": {"matchId": "NA1_1", "participants": []},
            "info": {"gameCreation": 0, "gameDuration": 1800, "participants": []}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let first = client.match_details("NA1_1").await.expect("third attempt succeeds");
    assert_eq!(first.metadata.match_id, "NA1_1");
    assert_eq!(request_count(&server).await, 3);

    let second = client.match_details("NA1_1").await.expect("cache hit");
    assert_eq!(second, first);
    assert_eq!(request_count(&server).await, 3, "cache hit must not call upstream");
}

#[tokio::test]
async fn test_persistent_503_becomes_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch(Route::Regional, "/lol/match/v5/matches/NA1_2", &[])
        .await
        .unwrap_err();
    match &err {
        RiftwatchError::Unavailable { attempts, last_error } => {
            assert_eq!(*attempts, 3);
            assert!(last_error.contains("503"), "{last_error}");
        }
        other => panic!("expected Unavailable, got {other:?}"),
    }
    assert_eq!(err.kind(), ErrorKind::Unavailable);
    assert_eq!(request_count(&server).await, 3);
}

#[tokio::test]
async fn test_authentication_failure_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .summoner_by_puuid("puuid-1")
        .await
        .unwrap_err();
    assert!(matches!(err, RiftwatchError::AuthenticationFailed));
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn test_429_honours_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "1"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = RiotClient::builder(KEY)
        .base_url(server.uri())
        .retry(fast_retry().max_delay(Duration::from_secs(2)))
        .build()
        .unwrap();
    let start = Instant::now();
    let ids = client
        .match_ids_by_puuid("puuid-1", &MatchIdsQuery::new())
        .await
        .expect("second attempt succeeds");
    assert!(ids.is_empty());
    assert!(start.elapsed() >= Duration::from_secs(1));
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test]
async fn test_huge_retry_after_is_capped_at_max_delay() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "86400"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let start = Instant::now();
    let ids = tokio::time::timeout(
        Duration::from_secs(5),
        client_for(&server).match_ids_by_puuid("puuid-1", &MatchIdsQuery::new()),
    )
    .await
    .expect("a day-long Retry-After must not stall the caller")
    .expect("second attempt succeeds");
    assert!(ids.is_empty());
    assert!(start.elapsed() >= Duration::from_millis(50));
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test]
async fn test_concurrent_identical_fetches_may_both_reach_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lol/match/v5/matches/NA1_3/timeline"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"frames": []}))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let (a, b) = tokio::join!(
        client.match_timeline("NA1_3"),
        client.match_timeline("NA1_3")
    );
    assert_eq!(a.unwrap(), json!({"frames": []}));
    assert_eq!(b.unwrap(), json!({"frames": []}));
    // No single-flight: both misses went out.
    assert_eq!(request_count(&server).await, 2);

    client.match_timeline("NA1_3").await.unwrap();
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test]
async fn test_query_params_are_sent_and_keyed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lol/match/v5/matches/by-puuid/puuid-1/ids"))
        .and(query_param("count", "100"))
        .and(query_param("queue", "420"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["NA1_1", "NA1_2"])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let query = MatchIdsQuery::new().count(500).queue(Some(420));
    let ids = client.match_ids_by_puuid("puuid-1", &query).await.unwrap();
    assert_eq!(ids, vec!["NA1_1", "NA1_2"]);

    // A different page is a different cache key.
    client
        .match_ids_by_puuid("puuid-1", &query.clone().start(100))
        .await
        .unwrap();
    assert_eq!(request_count(&server).await, 2);

    client.match_ids_by_puuid("puuid-1", &query).await.unwrap();
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test]
async fn test_path_segments_are_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/riot/account/v1/accounts/by-riot-id/Hide%20on%20bush/KR1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"puuid": "p"})))
        .mount(&server)
        .await;

    let account = client_for(&server)
        .account_by_riot_id("Hide on bush", "KR1")
        .await
        .unwrap();
    assert_eq!(account.puuid, "p");
}

#[tokio::test]
async fn test_blank_identifier_is_rejected_locally() {
    let server = MockServer::start().await;
    let err = client_for(&server).match_details("  ").await.unwrap_err();
    assert!(matches!(err, RiftwatchError::InvalidInput(_)));
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_empty_api_key_fails_to_build() {
    let err = RiotClient::builder("").build().err().expect("must fail");
    assert!(matches!(err, RiftwatchError::Configuration(_)));
}

#[tokio::test]
async fn test_admission_timeout_surfaces_as_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = RiotClient::builder(KEY)
        .base_url(server.uri())
        .rate_limit(
            RateLimitConfig::new()
                .per_second(1)
                .per_window(1)
                .window(Duration::from_secs(3600))
                .max_wait(Duration::from_millis(20)),
        )
        .retry(fast_retry().max_attempts(2))
        .build()
        .unwrap();

    client
        .fetch(Route::Platform, "/lol/status/v4/platform-data", &[])
        .await
        .expect("first call is admitted");
    let err = client
        .fetch(Route::Platform, "/lol/status/v4/other", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, RiftwatchError::Unavailable { attempts: 2, .. }), "got {err:?}");
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn test_shared_cache_is_used_across_clients() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let cache = Arc::new(ResponseCache::default());
    let build = || {
        RiotClient::builder(KEY)
            .base_url(server.uri())
            .shared_cache(Arc::clone(&cache))
            .build()
            .unwrap()
    };
    build().fetch(Route::Regional, "/x", &[]).await.unwrap();
    build().fetch(Route::Regional, "/x", &[]).await.unwrap();
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn test_cache_hit_consumes_no_admission() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"puuid": "p"})))
        .mount(&server)
        .await;

    // One admission per hour: only the miss may spend it.
    let client = RiotClient::builder(KEY)
        .base_url(server.uri())
        .rate_limit(
            RateLimitConfig::new()
                .per_second(1)
                .per_window(1)
                .window(Duration::from_secs(3600))
                .max_wait(Duration::from_millis(20)),
        )
        .retry(RetryConfig::disabled())
        .build()
        .unwrap();

    client.summoner_by_puuid("p").await.expect("miss is admitted");
    let after_miss = client.limiter().in_window_counts();
    assert_eq!(after_miss, vec![1, 1]);

    for _ in 0..3 {
        client.summoner_by_puuid("p").await.expect("hit bypasses the limiter");
    }
    assert_eq!(client.limiter().in_window_counts(), after_miss);
    assert_eq!(request_count(&server).await, 1);
}
