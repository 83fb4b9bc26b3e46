//! Sliding-window rate limiter for upstream calls.
//!
//! The Riot API enforces two ceilings at once: a short burst limit (calls per
//! second) and a longer application limit (calls per rolling window, two
//! minutes for development keys). [`RateLimiter`] keeps one [`RateWindow`]
//! per ceiling and only admits a call when every window has room.
//!
//! # Sharing
//!
//! One limiter serves the whole process. Construct it once and hand the same
//! `Arc<RateLimiter>` to every [`RiotClient`](crate::RiotClient) via the
//! builder; check-and-record happens under a single lock so two concurrent
//! callers can never both take the last slot.
//!
//! # Clock
//!
//! Timestamps come from `tokio::time::Instant`, so tests can drive the limiter
//! with a paused clock.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::telemetry;

/// Ceilings for the upstream rate limiter.
///
/// Defaults match a Riot development key: 20 calls per second and
/// 100 calls per two minutes.
///
/// ```rust
/// # use riftwatch::RateLimitConfig;
/// # use std::time::Duration;
/// let config = RateLimitConfig::new()
///     .per_second(500)
///     .per_window(30_000)
///     .window(Duration::from_secs(600));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Maximum admissions in any trailing second. Default: 20.
    pub per_second: u32,
    /// Maximum admissions in any trailing `window`. Default: 100.
    pub per_window: u32,
    /// Length of the long window. Default: 2 minutes.
    pub window: Duration,
    /// Longest a single call may wait for admission before giving up with
    /// a local `RateLimited`. Default: 150 seconds.
    pub max_wait: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_second: 20,
            per_window: 100,
            window: Duration::from_secs(120),
            max_wait: Duration::from_secs(150),
        }
    }
}

impl RateLimitConfig {
    /// Create a new config with development-key defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-second ceiling.
    pub fn per_second(mut self, n: u32) -> Self {
        self.per_second = n;
        self
    }

    /// Set the long-window ceiling.
    pub fn per_window(mut self, n: u32) -> Self {
        self.per_window = n;
        self
    }

    /// Set the long-window length.
    pub fn window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Set the admission wait bound.
    pub fn max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }
}

/// Shortest window a [`RateWindow`] will enforce.
pub const MIN_WINDOW: Duration = Duration::from_secs(1);

/// Outcome of a non-blocking admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The call may proceed now; its timestamp has been recorded.
    Admitted,
    /// No room yet. Nothing was recorded; retry after the given duration.
    Wait(Duration),
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted)
    }
}

/// Timestamps of recent admissions for one ceiling.
///
/// A timestamp counts toward the ceiling while `now - t < length`; older
/// entries are dropped before every check.
#[derive(Debug, Clone)]
pub struct RateWindow {
    limit: usize,
    length: Duration,
    timestamps: VecDeque<Instant>,
}

impl RateWindow {
    /// A window admitting at most `limit` calls per `length`.
    ///
    /// A limit of zero is treated as one, and a length shorter than
    /// [`MIN_WINDOW`] is raised to it. Storage grows with admissions, so a
    /// huge limit costs nothing up front.
    pub fn new(limit: u32, length: Duration) -> Self {
        Self {
            limit: (limit as usize).max(1),
            length: length.max(MIN_WINDOW),
            timestamps: VecDeque::new(),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn length(&self) -> Duration {
        self.length
    }

    fn prune(&mut self, now: Instant) {
        while let Some(&oldest) = self.timestamps.front() {
            if now.duration_since(oldest) >= self.length {
                self.timestamps.pop_front();
            } else {
                break;
            }
        }
    }

    /// Time until this window has room, assuming it was pruned at `now`.
    fn wait_at(&self, now: Instant) -> Duration {
        let len = self.timestamps.len();
        if len < self.limit {
            return Duration::ZERO;
        }
        // The entry whose expiry brings the count back under the limit.
        let blocking = self.timestamps[len - self.limit];
        (blocking + self.length).saturating_duration_since(now)
    }

    fn record(&mut self, now: Instant) {
        self.timestamps.push_back(now);
    }

    fn count(&self) -> usize {
        self.timestamps.len()
    }
}

/// Process-wide admission control for upstream calls.
///
/// Never fails: a call is either admitted or told how long to wait.
#[derive(Debug)]
pub struct RateLimiter {
    windows: Mutex<Vec<RateWindow>>,
}

impl RateLimiter {
    /// Build a limiter with a one-second window and the configured long window.
    pub fn new(config: &RateLimitConfig) -> Self {
        Self::with_windows(vec![
            RateWindow::new(config.per_second, Duration::from_secs(1)),
            RateWindow::new(config.per_window, config.window),
        ])
    }

    /// Build a limiter from arbitrary windows.
    pub fn with_windows(windows: Vec<RateWindow>) -> Self {
        Self {
            windows: Mutex::new(windows),
        }
    }

    /// Check every window and record the call if all have room.
    ///
    /// When any window is full, the returned wait is the longest of the
    /// per-window waits: admission needs every window, so the slowest one to
    /// free a slot decides.
    pub fn try_admit(&self) -> Admission {
        let now = Instant::now();
        let mut windows = self.lock();

        let mut wait = Duration::ZERO;
        for window in windows.iter_mut() {
            window.prune(now);
            wait = wait.max(window.wait_at(now));
        }

        if !wait.is_zero() {
            return Admission::Wait(wait);
        }
        for window in windows.iter_mut() {
            window.record(now);
        }
        Admission::Admitted
    }

    /// Boolean form of [`try_admit()`](Self::try_admit).
    pub fn admit(&self) -> bool {
        self.try_admit().is_admitted()
    }

    /// Wait until admitted.
    ///
    /// Unbounded on its own; callers that need a deadline wrap it in
    /// `tokio::time::timeout`.
    pub async fn admit_blocking(&self) {
        let start = Instant::now();
        loop {
            match self.try_admit() {
                Admission::Admitted => break,
                Admission::Wait(delay) => {
                    debug!(delay_ms = delay.as_millis() as u64, "waiting for rate limit admission");
                    tokio::time::sleep(delay).await;
                }
            }
        }
        let waited = start.elapsed();
        if !waited.is_zero() {
            metrics::histogram!(telemetry::RATE_LIMIT_WAIT_SECONDS).record(waited.as_secs_f64());
        }
    }

    /// Admissions currently inside each window, in construction order.
    pub fn in_window_counts(&self) -> Vec<usize> {
        let now = Instant::now();
        let mut windows = self.lock();
        windows
            .iter_mut()
            .map(|w| {
                w.prune(now);
                w.count()
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RateWindow>> {
        // Window state stays consistent even if a holder panicked.
        self.windows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_match_development_key() {
        let config = RateLimitConfig::default();
        assert_eq!(config.per_second, 20);
        assert_eq!(config.per_window, 100);
        assert_eq!(config.window, Duration::from_secs(120));
    }

    #[test]
    fn zero_limit_is_clamped() {
        assert_eq!(RateWindow::new(0, Duration::from_secs(1)).limit(), 1);
    }

    #[test]
    fn huge_limit_allocates_lazily() {
        let limiter = RateLimiter::new(&RateLimitConfig::new().per_second(u32::MAX).per_window(u32::MAX));
        assert!(limiter.admit());
        assert_eq!(limiter.in_window_counts(), vec![1, 1]);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_length_window_still_enforces_its_limit() {
        let limiter = RateLimiter::new(
            &RateLimitConfig::new()
                .per_second(100)
                .per_window(2)
                .window(Duration::ZERO),
        );
        assert!(limiter.admit());
        assert!(limiter.admit());
        assert_eq!(limiter.try_admit(), Admission::Wait(MIN_WINDOW));
        assert_eq!(RateWindow::new(1, Duration::ZERO).length(), MIN_WINDOW);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_points_at_oldest_blocking_entry() {
        let mut window = RateWindow::new(2, Duration::from_secs(1));
        let t0 = Instant::now();
        window.record(t0);
        tokio::time::advance(Duration::from_millis(300)).await;
        window.record(Instant::now());

        let now = Instant::now();
        window.prune(now);
        assert_eq!(window.wait_at(now), Duration::from_millis(700));
    }

    #[tokio::test(start_paused = true)]
    async fn entry_leaves_window_exactly_at_length() {
        let mut window = RateWindow::new(1, Duration::from_secs(1));
        window.record(Instant::now());

        tokio::time::advance(Duration::from_millis(999)).await;
        window.prune(Instant::now());
        assert_eq!(window.count(), 1);

        tokio::time::advance(Duration::from_millis(1)).await;
        window.prune(Instant::now());
        assert_eq!(window.count(), 0);
    }
}
