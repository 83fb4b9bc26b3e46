//! One player's view of one match.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::dto::MatchDto;

/// Team position as reported by `teamPosition`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Top,
    Jungle,
    Middle,
    Bottom,
    Utility,
    /// Empty or unrecognised position (e.g. ARAM).
    Unknown,
}

impl Role {
    pub fn from_position(position: &str) -> Self {
        match position.to_ascii_uppercase().as_str() {
            "TOP" => Role::Top,
            "JUNGLE" => Role::Jungle,
            "MIDDLE" | "MID" => Role::Middle,
            "BOTTOM" | "BOT" => Role::Bottom,
            "UTILITY" | "SUPPORT" => Role::Utility,
            _ => Role::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Top => "Top",
            Role::Jungle => "Jungle",
            Role::Middle => "Mid",
            Role::Bottom => "Bot",
            Role::Utility => "Support",
            Role::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
}

/// Immutable per-game statistics for the analysed player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: String,
    pub played_at: DateTime<Utc>,
    pub duration_secs: u64,
    pub queue_id: i64,
    pub game_mode: String,

    pub champion_name: String,
    pub champion_id: i64,
    pub role: Role,
    pub outcome: Outcome,

    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,

    pub damage_to_champions: u64,
    pub physical_damage_to_champions: u64,
    pub magic_damage_to_champions: u64,
    pub damage_taken: u64,
    pub gold_earned: u64,

    pub minions_killed: u32,
    pub neutral_minions_killed: u32,

    pub vision_score: u32,
    pub wards_placed: u32,
    pub control_wards_placed: u32,

    pub double_kills: u32,
    pub triple_kills: u32,
    pub quadra_kills: u32,
    pub penta_kills: u32,
    pub first_blood_kill: bool,
}

impl MatchRecord {
    /// Extract `puuid`'s participant from a match.
    ///
    /// Returns `None` when the player did not take part.
    pub fn from_match(dto: &MatchDto, puuid: &str) -> Option<Self> {
        let p = dto.info.participants.iter().find(|p| p.puuid == puuid)?;
        let played_at = DateTime::<Utc>::from_timestamp_millis(dto.info.game_creation)
            .unwrap_or_default();

        Some(Self {
            match_id: dto.metadata.match_id.clone(),
            played_at,
            duration_secs: dto.info.game_duration.max(0) as u64,
            queue_id: dto.info.queue_id,
            game_mode: dto.info.game_mode.clone(),
            champion_name: p.champion_name.clone(),
            champion_id: p.champion_id,
            role: Role::from_position(&p.team_position),
            outcome: if p.win { Outcome::Win } else { Outcome::Loss },
            kills: p.kills,
            deaths: p.deaths,
            assists: p.assists,
            damage_to_champions: p.total_damage_dealt_to_champions,
            physical_damage_to_champions: p.physical_damage_dealt_to_champions,
            magic_damage_to_champions: p.magic_damage_dealt_to_champions,
            damage_taken: p.total_damage_taken,
            gold_earned: p.gold_earned,
            minions_killed: p.total_minions_killed,
            neutral_minions_killed: p.neutral_minions_killed,
            vision_score: p.vision_score,
            wards_placed: p.wards_placed,
            control_wards_placed: p.detector_wards_placed,
            double_kills: p.double_kills,
            triple_kills: p.triple_kills,
            quadra_kills: p.quadra_kills,
            penta_kills: p.penta_kills,
            first_blood_kill: p.first_blood_kill,
        })
    }

    pub fn is_win(&self) -> bool {
        self.outcome == Outcome::Win
    }

    /// (kills + assists) / deaths, or kills + assists for a deathless game.
    pub fn kda(&self) -> f64 {
        let ka = f64::from(self.kills) + f64::from(self.assists);
        if self.deaths == 0 {
            ka
        } else {
            round_to(ka / f64::from(self.deaths), 2)
        }
    }

    /// Lane minions plus jungle camps.
    pub fn creep_score(&self) -> u64 {
        u64::from(self.minions_killed) + u64::from(self.neutral_minions_killed)
    }

    pub fn cs_per_minute(&self) -> f64 {
        let minutes = self.duration_secs as f64 / 60.0;
        if minutes == 0.0 {
            return 0.0;
        }
        round_to(self.creep_score() as f64 / minutes, 2)
    }

    pub fn duration_minutes(&self) -> f64 {
        self.duration_secs as f64 / 60.0
    }
}

/// Round half away from zero to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
