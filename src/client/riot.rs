//! Riot API client: cache, rate limiter and retry around outbound calls.
//!
//! # Request lifecycle
//!
//! ```text
//! fetch(route, endpoint, params)
//!        │
//!        ▼
//!   cache key = normalised URL ──► hit ──► return (no admission, no network)
//!        │ miss
//!        ▼
//!   ┌──────────── attempt (≤ max_attempts) ────────────┐
//!   │ limiter.admit_blocking()  (bounded by max_wait)   │
//!   │ GET url                                           │
//!   │   2xx        → decode, cache, return              │
//!   │   429 / 5xx  → backoff, next attempt              │
//!   │   other 4xx  → return error immediately           │
//!   └───────────────────────────────────────────────────┘
//!        │ ceiling reached on a transient error
//!        ▼
//!   Unavailable
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{ACCEPT, RETRY_AFTER};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

use super::builder::RiotClientBuilder;
use super::limiter::RateLimiter;
use super::retry::{RetryConfig, with_retry};
use super::routing::Route;
use crate::cache::ResponseCache;
use crate::telemetry;
use crate::types::{AccountDto, ChampionMasteryDto, MatchDto, SummonerDto};
use crate::{Result, RiftwatchError};

/// Header carrying the static API credential.
pub const API_KEY_HEADER: &str = "X-Riot-Token";

/// Upstream cap on ids per `match-v5` id listing.
pub const MAX_MATCH_IDS_PER_PAGE: u32 = 100;

/// Client for the Riot Games REST API.
///
/// Cheap to clone; clones share the HTTP pool, rate limiter and cache.
#[derive(Clone)]
pub struct RiotClient {
    pub(super) http: Client,
    pub(super) api_key: String,
    pub(super) regional_base_url: String,
    pub(super) platform_base_url: String,
    pub(super) limiter: Arc<RateLimiter>,
    pub(super) cache: Arc<ResponseCache>,
    pub(super) retry: RetryConfig,
    pub(super) max_wait: Duration,
}

/// Filters for [`RiotClient::match_ids_by_puuid`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchIdsQuery {
    pub start: u32,
    /// Clamped to 100. Zero leaves the upstream default (20).
    pub count: u32,
    /// Epoch seconds.
    pub start_time: Option<i64>,
    /// Epoch seconds.
    pub end_time: Option<i64>,
    pub queue: Option<u32>,
}

impl MatchIdsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(mut self, start: u32) -> Self {
        self.start = start;
        self
    }

    pub fn count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn start_time(mut self, epoch_secs: i64) -> Self {
        self.start_time = Some(epoch_secs);
        self
    }

    pub fn end_time(mut self, epoch_secs: i64) -> Self {
        self.end_time = Some(epoch_secs);
        self
    }

    pub fn queue(mut self, queue: Option<u32>) -> Self {
        self.queue = queue;
        self
    }

    /// Query parameters, omitting unset filters.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if self.start > 0 {
            params.push(("start", self.start.to_string()));
        }
        if self.count > 0 {
            params.push(("count", self.count.min(MAX_MATCH_IDS_PER_PAGE).to_string()));
        }
        if let Some(t) = self.start_time {
            params.push(("startTime", t.to_string()));
        }
        if let Some(t) = self.end_time {
            params.push(("endTime", t.to_string()));
        }
        if let Some(q) = self.queue {
            params.push(("queue", q.to_string()));
        }
        params
    }
}

impl RiotClient {
    /// Start configuring a client authenticated with `api_key`.
    pub fn builder(api_key: impl Into<String>) -> RiotClientBuilder {
        RiotClientBuilder::new(api_key)
    }

    /// The shared rate limiter.
    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// The shared response cache.
    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    /// Fetch `endpoint` (a path such as `/lol/match/v5/matches/NA1_1`) with
    /// query `params`, through the cache, rate limiter and retry loop.
    ///
    /// Resolves to a JSON payload or one of `NotFound`, `Unavailable`,
    /// `AuthenticationFailed`, `Api`, `Json`.
    #[instrument(skip(self, route, params), fields(route = %route))]
    pub async fn fetch(&self, route: Route, endpoint: &str, params: &[(&str, String)]) -> Result<Value> {
        self.execute("raw", route, endpoint, params).await
    }

    /// [`fetch()`](Self::fetch) and decode into `T`.
    pub async fn fetch_as<T: DeserializeOwned>(
        &self,
        route: Route,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let value = self.fetch(route, endpoint, params).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Look up an account by Riot ID (`game_name#tag_line`).
    #[instrument(skip(self))]
    pub async fn account_by_riot_id(&self, game_name: &str, tag_line: &str) -> Result<AccountDto> {
        let endpoint = path(&[
            "riot/account/v1/accounts/by-riot-id",
            &segment("game name", game_name)?,
            &segment("tag line", tag_line)?,
        ]);
        self.typed("account-by-riot-id", Route::Regional, &endpoint, &[])
            .await
    }

    #[instrument(skip(self))]
    pub async fn summoner_by_puuid(&self, puuid: &str) -> Result<SummonerDto> {
        let endpoint = path(&[
            "lol/summoner/v4/summoners/by-puuid",
            &segment("puuid", puuid)?,
        ]);
        self.typed("summoner-by-puuid", Route::Platform, &endpoint, &[])
            .await
    }

    /// Match ids for a player, newest first.
    #[instrument(skip(self, query))]
    pub async fn match_ids_by_puuid(&self, puuid: &str, query: &MatchIdsQuery) -> Result<Vec<String>> {
        let endpoint = path(&[
            "lol/match/v5/matches/by-puuid",
            &segment("puuid", puuid)?,
            "ids",
        ]);
        self.typed("match-ids", Route::Regional, &endpoint, &query.params())
            .await
    }

    #[instrument(skip(self))]
    pub async fn match_details(&self, match_id: &str) -> Result<MatchDto> {
        let endpoint = path(&["lol/match/v5/matches", &segment("match id", match_id)?]);
        self.typed("match-details", Route::Regional, &endpoint, &[])
            .await
    }

    /// Frame-by-frame timeline, returned undecoded.
    #[instrument(skip(self))]
    pub async fn match_timeline(&self, match_id: &str) -> Result<Value> {
        let endpoint = path(&[
            "lol/match/v5/matches",
            &segment("match id", match_id)?,
            "timeline",
        ]);
        self.execute("match-timeline", Route::Regional, &endpoint, &[])
            .await
    }

    #[instrument(skip(self))]
    pub async fn champion_masteries(&self, puuid: &str) -> Result<Vec<ChampionMasteryDto>> {
        let endpoint = path(&[
            "lol/champion-mastery/v4/champion-masteries/by-puuid",
            &segment("puuid", puuid)?,
        ]);
        self.typed("champion-masteries", Route::Platform, &endpoint, &[])
            .await
    }

    // ========================================================================
    // Request pipeline
    // ========================================================================

    async fn typed<T: DeserializeOwned>(
        &self,
        label: &'static str,
        route: Route,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let value = self.execute(label, route, endpoint, params).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn execute(
        &self,
        label: &'static str,
        route: Route,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Value> {
        let base = self.base_url(route);
        let key = cache_key(base, endpoint, params);

        if let Some(hit) = self.cache.get(&key).await {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL, "endpoint" => label).increment(1);
            debug!(endpoint = label, key = %key, "cache hit");
            return Ok(hit);
        }
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "endpoint" => label).increment(1);

        let url = build_url(base, endpoint, params)?;
        let start = Instant::now();
        let result = {
            let url = &url;
            with_retry(&self.retry, label, move |attempt| {
                self.attempt(url, endpoint, attempt)
            })
            .await
        };
        record_request(label, start, result.is_ok());

        let value = result?;
        self.cache.insert(key, value.clone()).await;
        Ok(value)
    }

    /// One admission plus one outbound call.
    async fn attempt(&self, url: &Url, resource: &str, attempt: u32) -> Result<Value> {
        if tokio::time::timeout(self.max_wait, self.limiter.admit_blocking())
            .await
            .is_err()
        {
            return Err(RiftwatchError::RateLimited { retry_after: None });
        }

        debug!(attempt, url = %url, "calling upstream");
        let response = self
            .http
            .get(url.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(RiftwatchError::from_status(
                status.as_u16(),
                resource,
                retry_after,
            ));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn base_url(&self, route: Route) -> &str {
        match route {
            Route::Regional => &self.regional_base_url,
            Route::Platform => &self.platform_base_url,
        }
    }
}

fn record_request(endpoint: &'static str, start: Instant, ok: bool) {
    let status = if ok { "ok" } else { "error" };
    metrics::counter!(telemetry::REQUESTS_TOTAL,
        "endpoint" => endpoint,
        "status" => status,
    )
    .increment(1);
    metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS, "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

/// Request identity: base URL, endpoint, and params sorted by name then value.
///
/// Two calls differing only in parameter order share a key.
pub fn cache_key(base_url: &str, endpoint: &str, params: &[(&str, String)]) -> String {
    let mut key = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    );
    if params.is_empty() {
        return key;
    }
    let mut sorted: Vec<_> = params.iter().collect();
    sorted.sort();
    let query = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    key.push('?');
    key.push_str(&query);
    key
}

fn build_url(base_url: &str, endpoint: &str, params: &[(&str, String)]) -> Result<Url> {
    let raw = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    );
    let mut url = Url::parse(&raw)
        .map_err(|e| RiftwatchError::InvalidInput(format!("invalid URL {raw}: {e}")))?;
    if !params.is_empty() {
        let mut sorted: Vec<_> = params.iter().collect();
        sorted.sort();
        url.query_pairs_mut()
            .extend_pairs(sorted.iter().map(|(k, v)| (*k, v.as_str())));
    }
    Ok(url)
}

/// Percent-encode one path segment, rejecting blanks.
fn segment(what: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(RiftwatchError::InvalidInput(format!("{what} must not be empty")));
    }
    Ok(urlencoding::encode(value).into_owned())
}

fn path(parts: &[&str]) -> String {
    format!("/{}", parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_ignores_param_order() {
        let a = cache_key(
            "https://americas.api.riotgames.com",
            "/lol/match/v5/matches/by-puuid/p/ids",
            &[("start", "0".into()), ("count", "100".into())],
        );
        let b = cache_key(
            "https://americas.api.riotgames.com/",
            "lol/match/v5/matches/by-puuid/p/ids",
            &[("count", "100".into()), ("start", "0".into())],
        );
        assert_eq!(a, b);
        assert!(a.ends_with("?count=100&start=0"));
    }

    #[test]
    fn cache_key_differs_by_host() {
        let na = cache_key("https://na1.api.riotgames.com", "/x", &[]);
        let euw = cache_key("https://euw1.api.riotgames.com", "/x", &[]);
        assert_ne!(na, euw);
    }

    #[test]
    fn match_ids_query_clamps_count_and_skips_unset() {
        let params = MatchIdsQuery::new().count(250).start_time(1_700_000_000).params();
        assert_eq!(
            params,
            vec![
                ("count", "100".to_string()),
                ("startTime", "1700000000".to_string())
            ]
        );
    }

    #[test]
    fn segments_are_percent_encoded() {
        assert_eq!(segment("game name", "Hide on bush").unwrap(), "Hide%20on%20bush");
        assert!(segment("tag line", "  ").is_err());
    }

    #[test]
    fn build_url_sorts_query() {
        let url = build_url(
            "http://localhost:1234",
            "/a/b",
            &[("z", "1".into()), ("a", "2".into())],
        )
        .unwrap();
        assert_eq!(url.as_str(), "http://localhost:1234/a/b?a=2&z=1");
    }
}
