//! Upstream access to the Riot Games API.
//!
//! [`RiotClient`] composes a [`RateLimiter`], a
//! [`ResponseCache`](crate::cache::ResponseCache) and the [`retry`] loop
//! around each outbound HTTP call. Limiter and cache are explicitly
//! constructed and injected through [`RiotClientBuilder`] rather than living
//! in module-level globals.

pub mod builder;
pub mod history;
pub mod limiter;
pub mod retry;
pub mod riot;
pub mod routing;

pub use builder::RiotClientBuilder;
pub use history::HistoryOptions;
pub use limiter::{Admission, RateLimitConfig, RateLimiter, RateWindow};
pub use retry::RetryConfig;
pub use riot::{API_KEY_HEADER, MatchIdsQuery, RiotClient, cache_key};
pub use routing::{Platform, Region, Route};
