//! Core MatchSource trait

use async_trait::async_trait;

use crate::client::{HistoryOptions, RiotClient};
use crate::types::{AccountDto, MatchDto};
use crate::Result;

/// Where analysis gets its raw match data from.
///
/// [`RiotClient`] is the production implementation. The analysis pipeline
/// only sees this trait, so it can be driven from fixtures.
#[async_trait]
pub trait MatchSource: Send + Sync {
    /// Resolve a Riot ID to an account (and its PUUID).
    async fn resolve_account(&self, game_name: &str, tag_line: &str) -> Result<AccountDto>;

    /// Detailed matches for a player, newest first.
    async fn match_history(&self, puuid: &str, options: &HistoryOptions) -> Result<Vec<MatchDto>>;
}

#[async_trait]
impl MatchSource for RiotClient {
    async fn resolve_account(&self, game_name: &str, tag_line: &str) -> Result<AccountDto> {
        self.account_by_riot_id(game_name, tag_line).await
    }

    async fn match_history(&self, puuid: &str, options: &HistoryOptions) -> Result<Vec<MatchDto>> {
        self.full_match_history(puuid, options).await
    }
}
