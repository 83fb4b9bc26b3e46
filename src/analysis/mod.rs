//! Statistics and insights over a player's match history.
//!
//! Everything here is pure arithmetic over [`MatchRecord`]s; the only async
//! entry points are [`analyze`] and [`analyze_riot_id`], which pull the
//! history through a [`MatchSource`] first.
//!
//! ```no_run
//! # async fn example(client: riftwatch::RiotClient) -> riftwatch::Result<()> {
//! use riftwatch::analysis::{AnalysisConfig, analyze_riot_id};
//!
//! let report = analyze_riot_id(&client, "Faker", "KR1", &AnalysisConfig::default()).await?;
//! println!("{}% over {} games", report.overall.win_rate, report.total_matches_analyzed);
//! # Ok(())
//! # }
//! ```

pub mod insights;
pub mod summary;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

pub use insights::{
    Achievement, FunStats, Growth, MemorableMoment, Playstyle, Rarity, RecentPerformance,
    Severity, Strength, StrengthKind, Weakness, WeaknessKind,
};
pub use summary::{
    BestChampion, ChampionCount, ChampionInsights, ChampionStats, ChampionWinRate, Direction,
    OverallStats, Period, RoleStats, TrendPoint, TrendSummary,
};

use crate::client::HistoryOptions;
use crate::traits::MatchSource;
use crate::types::{MatchDto, MatchRecord, Role};
use crate::{Result, RiftwatchError};

/// Tunables for the analysis pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Matches to fetch. Default: 100.
    pub match_history_limit: usize,
    /// Below this many games no report is produced. Default: 10.
    pub min_matches_for_insights: usize,
    /// Default: 365.
    pub lookback_days: u32,
    /// Size of the "recent form" window. Default: 20.
    pub recent_games: usize,
    /// Minimum games for a champion to be listed. Default: 3.
    pub min_champion_games: usize,
    /// Optional queue filter.
    pub queue: Option<u32>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            match_history_limit: 100,
            min_matches_for_insights: 10,
            lookback_days: 365,
            recent_games: 20,
            min_champion_games: 3,
            queue: None,
        }
    }
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn match_history_limit(mut self, n: usize) -> Self {
        self.match_history_limit = n;
        self
    }

    pub fn min_matches_for_insights(mut self, n: usize) -> Self {
        self.min_matches_for_insights = n;
        self
    }

    pub fn lookback_days(mut self, days: u32) -> Self {
        self.lookback_days = days;
        self
    }

    pub fn queue(mut self, queue: u32) -> Self {
        self.queue = Some(queue);
        self
    }

    pub fn history_options(&self) -> HistoryOptions {
        let options = HistoryOptions::new()
            .max_matches(self.match_history_limit)
            .days_back(self.lookback_days);
        match self.queue {
            Some(q) => options.queue(q),
            None => options,
        }
    }
}

/// One player's games, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchHistory {
    puuid: String,
    records: Vec<MatchRecord>,
}

impl MatchHistory {
    pub fn new(puuid: impl Into<String>, mut records: Vec<MatchRecord>) -> Self {
        records.sort_by(|a, b| b.played_at.cmp(&a.played_at));
        Self {
            puuid: puuid.into(),
            records,
        }
    }

    /// Extract `puuid`'s records, dropping matches the player is absent from.
    pub fn from_matches(puuid: &str, matches: &[MatchDto]) -> Self {
        let records = matches
            .iter()
            .filter_map(|m| MatchRecord::from_match(m, puuid))
            .collect();
        Self::new(puuid, records)
    }

    pub fn puuid(&self) -> &str {
        &self.puuid
    }

    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Bundle every analysis into a [`PlayerReport`].
    ///
    /// Fails with [`RiftwatchError::InsufficientData`] when fewer than
    /// `config.min_matches_for_insights` games are present (and always for an
    /// empty history).
    pub fn report(&self, player_name: &str, config: &AnalysisConfig) -> Result<PlayerReport> {
        let required = config.min_matches_for_insights.max(1);
        let overall = match self.overall() {
            Some(o) if self.len() >= required => o,
            _ => {
                return Err(RiftwatchError::InsufficientData {
                    required,
                    available: self.len(),
                });
            }
        };

        Ok(PlayerReport {
            player_name: player_name.to_string(),
            puuid: self.puuid.clone(),
            generated_at: Utc::now(),
            total_matches_analyzed: self.len(),
            overall,
            champion_stats: self.champions(config.min_champion_games),
            champions: self.champion_insights(),
            roles: self.roles(),
            trends: self.trend_summary(),
            strengths: self.strengths(),
            weaknesses: self.weaknesses(),
            coaching_tips: self.coaching_tips(),
            playstyle: self.playstyle(),
            achievements: self.achievements(),
            highlights: self.highlights(),
            recent: self.recent(config.recent_games),
            memorable_moments: self.memorable_moments(),
            fun_stats: self.fun_stats(),
            growth: self.growth(),
        })
    }
}

/// Everything known about a player, ready to serialize or render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerReport {
    pub player_name: String,
    pub puuid: String,
    pub generated_at: DateTime<Utc>,
    pub total_matches_analyzed: usize,
    pub overall: OverallStats,
    pub champion_stats: Vec<ChampionStats>,
    pub champions: ChampionInsights,
    pub roles: BTreeMap<Role, RoleStats>,
    pub trends: TrendSummary,
    pub strengths: Vec<Strength>,
    pub weaknesses: Vec<Weakness>,
    pub coaching_tips: Vec<String>,
    pub playstyle: Option<Playstyle>,
    pub achievements: Vec<Achievement>,
    pub highlights: Vec<String>,
    pub recent: Option<RecentPerformance>,
    pub memorable_moments: Vec<MemorableMoment>,
    pub fun_stats: Option<FunStats>,
    pub growth: Option<Growth>,
}

/// Fetch `puuid`'s history from `source` and build a report.
#[instrument(skip(source, config))]
pub async fn analyze(
    source: &dyn MatchSource,
    puuid: &str,
    player_name: &str,
    config: &AnalysisConfig,
) -> Result<PlayerReport> {
    let matches = source
        .match_history(puuid, &config.history_options())
        .await?;
    let history = MatchHistory::from_matches(puuid, &matches);
    info!(
        fetched = matches.len(),
        analysed = history.len(),
        "building report"
    );
    history.report(player_name, config)
}

/// Resolve a Riot ID, then [`analyze`] it under its `name#tag` display name.
pub async fn analyze_riot_id(
    source: &dyn MatchSource,
    game_name: &str,
    tag_line: &str,
    config: &AnalysisConfig,
) -> Result<PlayerReport> {
    let account = source.resolve_account(game_name, tag_line).await?;
    let name = match account.game_name {
        Some(_) => account.display_name(),
        None => format!("{game_name}#{tag_line}"),
    };
    analyze(source, &account.puuid, &name, config).await
}
