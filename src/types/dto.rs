//! Upstream payload shapes.
//!
//! These mirror the JSON returned by the Riot account, summoner, match and
//! mastery endpoints, trimmed to the fields analysis uses. Every field
//! defaults when absent so older or partial payloads still decode.

use serde::{Deserialize, Serialize};

/// `account-v1` account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub puuid: String,
    #[serde(default)]
    pub game_name: Option<String>,
    #[serde(default)]
    pub tag_line: Option<String>,
}

impl AccountDto {
    /// `GameName#TAG`, or the PUUID when the Riot ID is not present.
    pub fn display_name(&self) -> String {
        match (&self.game_name, &self.tag_line) {
            (Some(name), Some(tag)) => format!("{name}#{tag}"),
            (Some(name), None) => name.clone(),
            _ => self.puuid.clone(),
        }
    }
}

/// `summoner-v4` summoner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SummonerDto {
    pub puuid: String,
    pub profile_icon_id: i64,
    pub summoner_level: i64,
    pub revision_date: i64,
}

/// `champion-mastery-v4` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChampionMasteryDto {
    pub champion_id: i64,
    pub champion_level: i64,
    pub champion_points: i64,
    pub last_play_time: i64,
}

/// `match-v5` match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchDto {
    pub metadata: MetadataDto,
    pub info: InfoDto,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetadataDto {
    pub match_id: String,
    pub participants: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InfoDto {
    /// Epoch milliseconds.
    pub game_creation: i64,
    /// Seconds.
    pub game_duration: i64,
    pub queue_id: i64,
    pub game_mode: String,
    pub game_type: String,
    pub participants: Vec<ParticipantDto>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParticipantDto {
    pub puuid: String,
    pub summoner_name: String,
    pub champion_name: String,
    pub champion_id: i64,
    pub team_position: String,
    pub individual_position: String,
    pub team_id: i64,
    pub win: bool,

    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,

    pub total_damage_dealt_to_champions: u64,
    pub physical_damage_dealt_to_champions: u64,
    pub magic_damage_dealt_to_champions: u64,
    pub total_damage_taken: u64,

    pub gold_earned: u64,
    pub total_minions_killed: u32,
    pub neutral_minions_killed: u32,

    pub vision_score: u32,
    pub wards_placed: u32,
    pub detector_wards_placed: u32,

    pub double_kills: u32,
    pub triple_kills: u32,
    pub quadra_kills: u32,
    pub penta_kills: u32,
    pub first_blood_kill: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_camel_case_with_missing_fields() {
        let json = r#"{
            "metadata": {"matchId": "NA1_1", "participants": ["p1"]},
            "info": {
                "gameCreation": 1700000000000,
                "gameDuration": 1800,
                "queueId": 420,
                "participants": [{"puuid": "p1", "championName": "Ahri", "kills": 7, "win": true}]
            }
        }"#;
        let m: MatchDto = serde_json::from_str(json).unwrap();
        assert_eq!(m.metadata.match_id, "NA1_1");
        assert_eq!(m.info.queue_id, 420);
        let p = &m.info.participants[0];
        assert_eq!(p.champion_name, "Ahri");
        assert_eq!(p.kills, 7);
        assert_eq!(p.deaths, 0);
        assert!(p.win);
    }

    #[test]
    fn display_name_prefers_riot_id() {
        let account = AccountDto {
            puuid: "abc".into(),
            game_name: Some("Faker".into()),
            tag_line: Some("KR1".into()),
        };
        assert_eq!(account.display_name(), "Faker#KR1");

        let bare = AccountDto {
            puuid: "abc".into(),
            game_name: None,
            tag_line: None,
        };
        assert_eq!(bare.display_name(), "abc");
    }
}
