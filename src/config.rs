//! Configuration loading.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.riftwatch/config.toml` (user)
//! 3. `/etc/riftwatch/config.toml` (system)
//!
//! The Riot API key is loaded separately:
//! 1. `~/.riftwatch/secrets.toml` (user, must be 0600)
//! 2. `/etc/riftwatch/secrets.toml` (system, must be 0600)
//! 3. the `RIOT_API_KEY` environment variable

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::analysis::AnalysisConfig;
use crate::cache::CacheConfig;
use crate::client::{Platform, RateLimitConfig, Region, RetryConfig, RiotClientBuilder};
use crate::{Result, RiftwatchError};

/// Environment variable holding the Riot API key.
pub const API_KEY_ENV_VAR: &str = "RIOT_API_KEY";

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub riot: RiotSection,
    #[serde(default)]
    pub rate_limit: RateLimitSection,
    #[serde(default)]
    pub cache: CacheSection,
    #[serde(default)]
    pub retry: RetrySection,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Upstream routing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RiotSection {
    /// Regional cluster for account and match endpoints (default: americas).
    #[serde(default)]
    pub region: Region,
    /// Platform for summoner and mastery endpoints (default: na1).
    #[serde(default)]
    pub platform: Platform,
    /// HTTP timeout in seconds (default: 10).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for RiotSection {
    fn default() -> Self {
        Self {
            region: Region::default(),
            platform: Platform::default(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_request_timeout() -> u64 {
    10
}

/// Upstream call ceilings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RateLimitSection {
    /// Calls per second (default: 20).
    #[serde(default = "default_per_second")]
    pub per_second: u32,
    /// Calls per long window (default: 100).
    #[serde(default = "default_per_window")]
    pub per_window: u32,
    /// Long window length in seconds (default: 120).
    #[serde(default = "default_window")]
    pub window_secs: u64,
    /// Longest a request waits for admission, in seconds (default: 150).
    #[serde(default = "default_max_wait")]
    pub max_wait_secs: u64,
}

impl Default for RateLimitSection {
    fn default() -> Self {
        Self {
            per_second: default_per_second(),
            per_window: default_per_window(),
            window_secs: default_window(),
            max_wait_secs: default_max_wait(),
        }
    }
}

fn default_per_second() -> u32 {
    20
}

fn default_per_window() -> u32 {
    100
}

fn default_window() -> u64 {
    120
}

fn default_max_wait() -> u64 {
    150
}

/// Response cache.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CacheSection {
    /// Entry lifetime in seconds (default: 86400).
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
    /// Optional entry cap; unbounded when absent.
    #[serde(default)]
    pub max_entries: Option<u64>,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
            max_entries: None,
        }
    }
}

fn default_ttl() -> u64 {
    86_400
}

/// Retry of transient upstream failures.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RetrySection {
    /// Total attempts including the first (default: 3).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
    #[serde(default = "default_jitter")]
    pub jitter: bool,
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: default_max_delay(),
            jitter: default_jitter(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay() -> u64 {
    500
}

fn default_max_delay() -> u64 {
    30_000
}

fn default_jitter() -> bool {
    true
}

impl From<&RateLimitSection> for RateLimitConfig {
    fn from(s: &RateLimitSection) -> Self {
        RateLimitConfig::new()
            .per_second(s.per_second)
            .per_window(s.per_window)
            .window(Duration::from_secs(s.window_secs))
            .max_wait(Duration::from_secs(s.max_wait_secs))
    }
}

impl From<&CacheSection> for CacheConfig {
    fn from(s: &CacheSection) -> Self {
        let config = CacheConfig::new().ttl(Duration::from_secs(s.ttl_secs));
        match s.max_entries {
            Some(n) => config.max_entries(n),
            None => config,
        }
    }
}

impl From<&RetrySection> for RetryConfig {
    fn from(s: &RetrySection) -> Self {
        RetryConfig::new()
            .max_attempts(s.max_attempts)
            .initial_delay(Duration::from_millis(s.initial_delay_ms))
            .max_delay(Duration::from_millis(s.max_delay_ms))
            .jitter(s.jitter)
    }
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided)
    /// 2. `~/.riftwatch/config.toml`
    /// 3. `/etc/riftwatch/config.toml`
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Err(RiftwatchError::Configuration(
                "No config file found. Create ~/.riftwatch/config.toml or /etc/riftwatch/config.toml"
                    .to_string(),
            )),
        }
    }

    /// Like [`load`](Self::load), but falls back to defaults when no file
    /// exists in the standard locations. An explicit path must still exist.
    pub fn load_or_default(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| RiftwatchError::Configuration(format!("Failed to parse config: {e}")))
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            RiftwatchError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            RiftwatchError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(RiftwatchError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".riftwatch").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        let system_config = PathBuf::from("/etc/riftwatch/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }
        Ok(None)
    }

    /// The API key from `RIOT_API_KEY`, if set and non-empty.
    pub fn api_key_from_env() -> Option<String> {
        std::env::var(API_KEY_ENV_VAR)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    /// A client builder with every section applied.
    pub fn client_builder(&self, api_key: impl Into<String>) -> RiotClientBuilder {
        RiotClientBuilder::new(api_key)
            .region(self.riot.region)
            .platform(self.riot.platform)
            .timeout(Duration::from_secs(self.riot.request_timeout_secs))
            .rate_limit((&self.rate_limit).into())
            .cache_config((&self.cache).into())
            .retry((&self.retry).into())
    }
}

/// Secrets file contents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub riot: Option<ApiKeySecret>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeySecret {
    pub api_key: String,
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Returns empty secrets if no file exists.
    pub fn load() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".riftwatch").join("secrets.toml");
            if user_secrets.exists() {
                return Self::load_from_file(&user_secrets);
            }
        }

        let system_secrets = PathBuf::from("/etc/riftwatch/secrets.toml");
        if system_secrets.exists() {
            return Self::load_from_file(&system_secrets);
        }

        Ok(Secrets::default())
    }

    /// Read a secrets file, rejecting it if group or others can read it.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        Self::check_permissions(path)?;
        let content = fs::read_to_string(path).map_err(|e| {
            RiftwatchError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            RiftwatchError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    #[cfg(unix)]
    fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            RiftwatchError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        if mode & 0o077 != 0 {
            return Err(RiftwatchError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// Key from the secrets file, falling back to `RIOT_API_KEY`.
    pub fn api_key(&self) -> Option<String> {
        self.riot
            .as_ref()
            .map(|s| s.api_key.clone())
            .filter(|key| !key.trim().is_empty())
            .or_else(Config::api_key_from_env)
    }
}
