//! Builder for configuring [`RiotClient`] instances

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use super::limiter::{RateLimitConfig, RateLimiter};
use super::retry::RetryConfig;
use super::riot::RiotClient;
use super::routing::{Platform, Region};
use crate::cache::{CacheConfig, ResponseCache};
use crate::version;
use crate::{Result, RiftwatchError};

/// Default per-request HTTP timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Builder for [`RiotClient`].
///
/// The rate limiter and cache are process-wide resources. Either let the
/// builder create fresh ones from config, or pass shared instances with
/// [`shared_limiter()`](Self::shared_limiter) and
/// [`shared_cache()`](Self::shared_cache) so several clients (e.g. one per
/// platform) draw from one budget.
pub struct RiotClientBuilder {
    api_key: String,
    region: Region,
    platform: Platform,
    regional_base_url: Option<String>,
    platform_base_url: Option<String>,
    timeout: Duration,
    rate_limit: RateLimitConfig,
    cache_config: CacheConfig,
    retry: RetryConfig,
    limiter: Option<Arc<RateLimiter>>,
    cache: Option<Arc<ResponseCache>>,
}

impl RiotClientBuilder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            region: Region::default(),
            platform: Platform::default(),
            regional_base_url: None,
            platform_base_url: None,
            timeout: DEFAULT_TIMEOUT,
            rate_limit: RateLimitConfig::default(),
            cache_config: CacheConfig::default(),
            retry: RetryConfig::default(),
            limiter: None,
            cache: None,
        }
    }

    /// Regional routing for account and match endpoints.
    pub fn region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    /// Platform routing for summoner and mastery endpoints.
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Override the regional host (for testing with wiremock).
    pub fn regional_base_url(mut self, url: impl Into<String>) -> Self {
        self.regional_base_url = Some(url.into());
        self
    }

    /// Override the platform host (for testing with wiremock).
    pub fn platform_base_url(mut self, url: impl Into<String>) -> Self {
        self.platform_base_url = Some(url.into());
        self
    }

    /// Override both hosts at once.
    pub fn base_url(self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.regional_base_url(url.clone()).platform_base_url(url)
    }

    /// Per-request HTTP timeout (default: 10s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Ceilings for a limiter created by the builder. Ignored for the limiter
    /// itself when a shared one is supplied, but `max_wait` still applies.
    pub fn rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.rate_limit = config;
        self
    }

    /// Configuration for a cache created by the builder.
    pub fn cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry = config;
        self
    }

    /// Use an existing limiter instead of creating one.
    pub fn shared_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// Use an existing cache instead of creating one.
    pub fn shared_cache(mut self, cache: Arc<ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build(self) -> Result<RiotClient> {
        if self.api_key.trim().is_empty() {
            return Err(RiftwatchError::Configuration(
                "Riot API key is required".to_string(),
            ));
        }

        let http = Client::builder()
            .timeout(self.timeout)
            .user_agent(version::user_agent())
            .build()
            .map_err(|e| RiftwatchError::Configuration(format!("failed to build HTTP client: {e}")))?;

        let limiter = self
            .limiter
            .unwrap_or_else(|| Arc::new(RateLimiter::new(&self.rate_limit)));
        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(ResponseCache::new(&self.cache_config)));

        Ok(RiotClient {
            http,
            api_key: self.api_key,
            regional_base_url: self
                .regional_base_url
                .unwrap_or_else(|| self.region.base_url()),
            platform_base_url: self
                .platform_base_url
                .unwrap_or_else(|| self.platform.base_url()),
            limiter,
            cache,
            retry: self.retry,
            max_wait: self.rate_limit.max_wait,
        })
    }
}
