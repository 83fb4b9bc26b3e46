//! Metrics emitted by the client.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::time::Duration;

use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use riftwatch::{RetryConfig, RiotClient, telemetry};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

/// Sum counter values for `name`, optionally restricted to one label value.
fn counter_total(snapshot: &SnapshotVec, name: &str, label: Option<(&str, &str)>) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .filter(|(key, _, _, _)| {
            label.is_none_or(|(k, v)| {
                key.key()
                    .labels()
                    .any(|l| l.key() == k && l.value() == v)
            })
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

fn client_for(server: &MockServer) -> RiotClient {
    RiotClient::builder("RGAPI-test")
        .base_url(server.uri())
        .retry(
            RetryConfig::new()
                .max_attempts(3)
                .initial_delay(Duration::from_millis(5))
                .jitter(false),
        )
        .build()
        .unwrap()
}

/// Runs async code within a local recorder scope on the multi-thread runtime.
///
/// `block_in_place` keeps the sync `with_local_recorder` closure on the
/// current thread while `block_on` drives the inner async work.
#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn cache_hits_and_misses_are_counted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lol/summoner/v4/summoners/by-puuid/p"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"puuid": "p"})))
        .mount(&server)
        .await;
    let client = client_for(&server);

    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                client.summoner_by_puuid("p").await.unwrap();
                client.summoner_by_puuid("p").await.unwrap();
                client.summoner_by_puuid("p").await.unwrap();
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();
    let endpoint = Some(("endpoint", "summoner-by-puuid"));
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_MISSES_TOTAL, endpoint), 1);
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_HITS_TOTAL, endpoint), 2);
    assert_eq!(counter_total(&snapshot, telemetry::REQUESTS_TOTAL, Some(("status", "ok"))), 1);
    assert!(has_histogram(&snapshot, telemetry::REQUEST_DURATION_SECONDS));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn retries_and_failures_are_counted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    let client = client_for(&server);

    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    let result = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(client.match_details("NA1_1"))
        })
    });
    assert!(result.is_err());

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(
        counter_total(&snapshot, telemetry::RETRIES_TOTAL, Some(("endpoint", "match-details"))),
        2
    );
    assert_eq!(counter_total(&snapshot, telemetry::REQUESTS_TOTAL, Some(("status", "error"))), 1);
    assert_eq!(counter_total(&snapshot, telemetry::REQUESTS_TOTAL, Some(("status", "ok"))), 0);
}

#[tokio::test]
async fn metrics_are_noop_without_recorder() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    let ids = client_for(&server)
        .match_ids_by_puuid("p", &riftwatch::MatchIdsQuery::new())
        .await
        .unwrap();
    assert!(ids.is_empty());
}
