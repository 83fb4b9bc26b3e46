//! Riftwatch - match-history analytics for the Riot Games API
//!
//! This crate provides a rate-limited, cached [`RiotClient`] for the Riot
//! Games REST API and turns a player's match history into statistics,
//! coaching insights and shareable SVG charts.
//!
//! # Fetch Example
//!
//! ```rust,no_run
//! use riftwatch::{RateLimitConfig, Region, RiotClient};
//!
//! #[tokio::main]
//! async fn main() -> riftwatch::Result<()> {
//!     let client = RiotClient::builder("RGAPI-your-key")
//!         .region(Region::Europe)
//!         .rate_limit(RateLimitConfig::default().per_second(20).per_window(100))
//!         .build()?;
//!
//!     let account = client.account_by_riot_id("Caps", "EUW").await?;
//!     println!("{}", account.puuid);
//!     Ok(())
//! }
//! ```
//!
//! # Report Example
//!
//! ```rust,no_run
//! use riftwatch::analysis::{AnalysisConfig, analyze_riot_id};
//! use riftwatch::render::Renderer;
//! use riftwatch::RiotClient;
//!
//! #[tokio::main]
//! async fn main() -> riftwatch::Result<()> {
//!     let client = RiotClient::builder("RGAPI-your-key").build()?;
//!     let report = analyze_riot_id(&client, "Caps", "EUW", &AnalysisConfig::default()).await?;
//!
//!     let svg = Renderer::new().social_card(&report);
//!     std::fs::write("card.svg", svg).ok();
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod render;
pub mod telemetry;
pub mod traits;
pub mod types;
pub mod version;

// Re-export main types at crate root
pub use analysis::{AnalysisConfig, MatchHistory, PlayerReport};
pub use cache::{CacheConfig, ResponseCache};
pub use client::{
    HistoryOptions, MatchIdsQuery, Platform, RateLimitConfig, RateLimiter, Region, RetryConfig,
    RiotClient, RiotClientBuilder, Route,
};
pub use config::Config;
pub use error::{ErrorKind, Result, RiftwatchError};
pub use render::Renderer;
pub use traits::MatchSource;
pub use types::{MatchDto, MatchRecord, Outcome, Role};
pub use version::{PKG_VERSION, version_string};
