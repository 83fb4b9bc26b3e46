//! Telemetry metric name constants.
//!
//! Consumers install their own `metrics` recorder (e.g. prometheus, statsd);
//! without a recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `riftwatch_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `endpoint`: logical upstream endpoint (e.g. "match-details")
//! - `status`: outcome: "ok" or "error"

/// Upstream fetches that reached the network (cache hits excluded).
///
/// Labels: `endpoint`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "riftwatch_requests_total";

/// Duration of a network fetch in seconds, retries and waits included.
///
/// Labels: `endpoint`.
pub const REQUEST_DURATION_SECONDS: &str = "riftwatch_request_duration_seconds";

/// Retry attempts (not counting the initial request).
///
/// Labels: `endpoint`.
pub const RETRIES_TOTAL: &str = "riftwatch_retries_total";

/// Response cache hits.
///
/// Labels: `endpoint`.
pub const CACHE_HITS_TOTAL: &str = "riftwatch_cache_hits_total";

/// Response cache misses.
///
/// Labels: `endpoint`.
pub const CACHE_MISSES_TOTAL: &str = "riftwatch_cache_misses_total";

/// Time spent waiting for a rate-limiter admission, in seconds.
pub const RATE_LIMIT_WAIT_SECONDS: &str = "riftwatch_rate_limit_wait_seconds";
