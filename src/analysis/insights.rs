//! Rule-based findings derived from a match history.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use super::MatchHistory;
use super::summary::{Direction, OverallStats, first_max_by, mean};
use crate::types::{MatchRecord, round_to};

/// Games needed before [`MatchHistory::growth`] compares halves.
pub const GROWTH_MIN_GAMES: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaknessKind {
    HighDeaths,
    LowVision,
    LowCs,
    LowDamageInLosses,
}

impl WeaknessKind {
    pub fn suggestion(&self) -> &'static str {
        match self {
            WeaknessKind::HighDeaths => "Focus on positioning and map awareness to reduce deaths",
            WeaknessKind::LowVision => {
                "Buy more control wards and place trinket wards more frequently"
            }
            WeaknessKind::LowCs => "Practice last-hitting and wave management in practice tool",
            WeaknessKind::LowDamageInLosses => "Stay more active in teamfights even when behind",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weakness {
    pub kind: WeaknessKind,
    pub metric: String,
    pub value: f64,
    pub severity: Severity,
    pub suggestion: String,
}

impl Weakness {
    fn new(kind: WeaknessKind, metric: &str, value: f64, severity: Severity) -> Self {
        Self {
            kind,
            metric: metric.to_string(),
            value,
            severity,
            suggestion: kind.suggestion().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthKind {
    WinRate,
    Kda,
    Vision,
    Cs,
    Pentakills,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strength {
    pub kind: StrengthKind,
    pub metric: String,
    pub value: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playstyle {
    /// "Aggressive Carry" when kills outnumber assists on average.
    pub primary_style: String,
    /// "Front Line Tank" when damage taken exceeds damage dealt on average.
    pub secondary_style: String,
    /// Share of takedowns that were kills, 1 dp; 50 with no takedowns.
    pub aggression_score: f64,
    /// "Physical" or "Magical".
    pub damage_preference: String,
    /// Most common start hour in UTC, formatted `H:00`.
    pub preferred_game_time: Option<String>,
    /// Most common start weekday, e.g. "Tuesday".
    pub preferred_day: Option<String>,
    pub avg_game_length_minutes: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub title: String,
    pub description: String,
    pub rarity: Rarity,
}

/// The newest games compared with the whole history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentPerformance {
    pub games_analyzed: usize,
    pub stats: OverallStats,
    pub win_rate_change: f64,
    pub kda_change: f64,
    /// Follows the win-rate change.
    pub trend: Direction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunStats {
    pub total_hours_played: f64,
    pub total_kills: u64,
    pub total_deaths: u64,
    pub total_assists: u64,
    pub total_gold_earned: u64,
    pub total_minions_slain: u64,
    pub total_wards_placed: u64,
    pub favorite_champion: Option<String>,
    pub longest_game_minutes: f64,
    pub shortest_game_minutes: f64,
}

/// Newer half minus older half.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Growth {
    pub win_rate_change: f64,
    pub kda_change: f64,
    pub damage_change: f64,
    pub cs_change: f64,
    pub vision_change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MemorableMoment {
    BestGame {
        champion: String,
        kills: u32,
        deaths: u32,
        assists: u32,
        kda: f64,
        date: NaiveDate,
    },
    HighestDamage {
        champion: String,
        damage: u64,
        date: NaiveDate,
    },
    FirstPentakill {
        champion: String,
        date: NaiveDate,
    },
}

impl MemorableMoment {
    pub fn title(&self) -> &'static str {
        match self {
            MemorableMoment::BestGame { .. } => "Best Game",
            MemorableMoment::HighestDamage { .. } => "Highest Damage",
            MemorableMoment::FirstPentakill { .. } => "Pentakill!",
        }
    }

    pub fn description(&self) -> String {
        match self {
            MemorableMoment::BestGame {
                champion,
                kills,
                deaths,
                assists,
                ..
            } => format!("{champion}: {kills}/{deaths}/{assists} KDA"),
            MemorableMoment::HighestDamage { champion, damage, .. } => {
                format!("{} damage on {champion}", thousands(*damage))
            }
            MemorableMoment::FirstPentakill { champion, .. } => {
                format!("First pentakill on {champion}")
            }
        }
    }
}

impl MatchHistory {
    pub fn weaknesses(&self) -> Vec<Weakness> {
        let records = self.records();
        if records.is_empty() {
            return Vec::new();
        }
        let mut found = Vec::new();

        let avg_deaths = mean(records.iter().map(|r| f64::from(r.deaths)));
        if avg_deaths > 6.0 {
            let severity = if avg_deaths > 8.0 { Severity::High } else { Severity::Medium };
            found.push(Weakness::new(
                WeaknessKind::HighDeaths,
                "Average Deaths",
                round_to(avg_deaths, 2),
                severity,
            ));
        }

        let avg_vision = mean(records.iter().map(|r| f64::from(r.vision_score)));
        if avg_vision < 30.0 {
            let severity = if avg_vision < 20.0 { Severity::High } else { Severity::Medium };
            found.push(Weakness::new(
                WeaknessKind::LowVision,
                "Average Vision Score",
                round_to(avg_vision, 1),
                severity,
            ));
        }

        let avg_cs = mean(records.iter().map(MatchRecord::cs_per_minute));
        if avg_cs < 5.0 {
            found.push(Weakness::new(
                WeaknessKind::LowCs,
                "CS per Minute",
                round_to(avg_cs, 2),
                Severity::Medium,
            ));
        }

        if records.iter().any(|r| !r.is_win()) {
            let in_losses = mean(
                records
                    .iter()
                    .filter(|r| !r.is_win())
                    .map(|r| r.damage_to_champions as f64),
            );
            let overall = mean(records.iter().map(|r| r.damage_to_champions as f64));
            if in_losses < overall * 0.7 {
                found.push(Weakness::new(
                    WeaknessKind::LowDamageInLosses,
                    "Damage in Lost Games",
                    round_to(in_losses, 0),
                    Severity::Medium,
                ));
            }
        }
        found
    }

    pub fn strengths(&self) -> Vec<Strength> {
        let Some(o) = self.overall() else {
            return Vec::new();
        };
        let mut found = Vec::new();
        let mut push = |kind, metric: &str, value: f64, description: String| {
            found.push(Strength {
                kind,
                metric: metric.to_string(),
                value,
                description,
            })
        };

        if o.win_rate >= 52.0 {
            push(
                StrengthKind::WinRate,
                "Win Rate",
                o.win_rate,
                format!("Strong {}% win rate shows consistent performance", o.win_rate),
            );
        }
        if o.avg_kda >= 3.0 {
            push(
                StrengthKind::Kda,
                "KDA",
                o.avg_kda,
                format!("Excellent {} KDA demonstrates strong mechanics", o.avg_kda),
            );
        }
        if o.avg_vision_score >= 35.0 {
            push(
                StrengthKind::Vision,
                "Vision Score",
                o.avg_vision_score,
                format!(
                    "Outstanding vision control with {} average score",
                    o.avg_vision_score
                ),
            );
        }
        if o.avg_cs_per_minute >= 6.0 {
            push(
                StrengthKind::Cs,
                "CS per Minute",
                o.avg_cs_per_minute,
                format!("Strong farming with {} CS/min", o.avg_cs_per_minute),
            );
        }
        if o.total_penta_kills > 0 {
            push(
                StrengthKind::Pentakills,
                "Pentakills",
                f64::from(o.total_penta_kills),
                format!("Achieved {} pentakill(s)!", o.total_penta_kills),
            );
        }
        found
    }

    /// Weakness suggestions, then encouragement for the best champion.
    /// At most five.
    pub fn coaching_tips(&self) -> Vec<String> {
        let mut tips: Vec<String> = self
            .weaknesses()
            .into_iter()
            .map(|w| w.suggestion)
            .collect();
        if let Some(best) = self.best_champions(3).first() {
            tips.push(format!(
                "Continue mastering {} - you have a {}% win rate!",
                best.champion, best.win_rate
            ));
        }
        tips.truncate(5);
        tips
    }

    pub fn playstyle(&self) -> Option<Playstyle> {
        let records = self.records();
        if records.is_empty() {
            return None;
        }
        let avg = |f: fn(&MatchRecord) -> f64| mean(records.iter().map(f));
        let kills = avg(|r| f64::from(r.kills));
        let assists = avg(|r| f64::from(r.assists));
        let dealt = avg(|r| r.damage_to_champions as f64);
        let taken = avg(|r| r.damage_taken as f64);
        let physical = avg(|r| r.physical_damage_to_champions as f64);
        let magic = avg(|r| r.magic_damage_to_champions as f64);

        let aggression_score = if kills + assists > 0.0 {
            round_to(kills / (kills + assists) * 100.0, 1)
        } else {
            50.0
        };

        let preferred_hour = most_common(records.iter().map(|r| r.played_at.hour()));
        let preferred_day = most_common(
            records
                .iter()
                .map(|r| r.played_at.weekday().num_days_from_monday()),
        );

        Some(Playstyle {
            primary_style: if kills > assists { "Aggressive Carry" } else { "Supportive Team Player" }
                .to_string(),
            secondary_style: if taken > dealt { "Front Line Tank" } else { "Back Line Damage Dealer" }
                .to_string(),
            aggression_score,
            damage_preference: if physical > magic { "Physical" } else { "Magical" }.to_string(),
            preferred_game_time: preferred_hour.map(|h| format!("{h}:00")),
            preferred_day: preferred_day.map(|d| weekday_name(d).to_string()),
            avg_game_length_minutes: round_to(avg(MatchRecord::duration_minutes), 1),
        })
    }

    pub fn achievements(&self) -> Vec<Achievement> {
        let records = self.records();
        let mut found = Vec::new();
        let mut push = |title: String, description: String, rarity| {
            found.push(Achievement {
                title,
                description,
                rarity,
            })
        };

        let pentas: u32 = records.iter().map(|r| r.penta_kills).sum();
        if pentas > 0 {
            push(
                "Legendary Pentakill".into(),
                format!("Achieved {pentas} pentakill(s)!"),
                Rarity::Legendary,
            );
        }

        let quadras: u32 = records.iter().map(|r| r.quadra_kills).sum();
        if quadras >= 5 {
            push(
                "Quadra Master".into(),
                format!("Got {quadras} quadra kills"),
                Rarity::Epic,
            );
        }

        let streak = self.max_win_streak();
        if streak >= 5 {
            push(
                format!("{streak}-Game Win Streak"),
                format!("Won {streak} games in a row!"),
                if streak < 10 { Rarity::Rare } else { Rarity::Epic },
            );
        }

        if records.len() >= 100 {
            push(
                "Dedicated Player".into(),
                format!("Played {} games", records.len()),
                Rarity::Common,
            );
        }

        let max_damage = records.iter().map(|r| r.damage_to_champions).max().unwrap_or(0);
        if max_damage >= 50_000 {
            push(
                "Damage Dealer".into(),
                format!("Dealt {} damage in a single game", thousands(max_damage)),
                Rarity::Rare,
            );
        }
        found
    }

    /// Short headline badges for the shareable card.
    pub fn highlights(&self) -> Vec<String> {
        let Some(o) = self.overall() else {
            return Vec::new();
        };
        let mut out = Vec::new();
        if o.win_rate >= 55.0 {
            out.push(format!("Elite {}% Win Rate", o.win_rate));
        }
        if o.total_penta_kills > 0 {
            out.push(format!("{} Pentakill(s)", o.total_penta_kills));
        }
        if o.total_games >= 200 {
            out.push(format!("{} Games Played", o.total_games));
        }
        if o.avg_kda >= 3.5 {
            out.push(format!("{} Average KDA", o.avg_kda));
        }
        out
    }

    /// Stats for the newest `n` games with deltas against the whole history.
    pub fn recent(&self, n: usize) -> Option<RecentPerformance> {
        let newest = &self.records()[..n.min(self.len())];
        let stats = OverallStats::from_records(newest)?;
        let overall = self.overall()?;
        let win_rate_change = round_to(stats.win_rate - overall.win_rate, 2);
        Some(RecentPerformance {
            games_analyzed: newest.len(),
            win_rate_change,
            kda_change: round_to(stats.avg_kda - overall.avg_kda, 2),
            trend: Direction::between(0.0, win_rate_change),
            stats,
        })
    }

    /// Longest run of consecutive wins.
    pub fn max_win_streak(&self) -> usize {
        self.records()
            .iter()
            .fold((0, 0), |(best, run), r| {
                let run = if r.is_win() { run + 1 } else { 0 };
                (best.max(run), run)
            })
            .0
    }

    pub fn fun_stats(&self) -> Option<FunStats> {
        let records = self.records();
        if records.is_empty() {
            return None;
        }
        let total = |f: fn(&MatchRecord) -> u64| records.iter().map(f).sum::<u64>();
        let longest = records.iter().map(|r| r.duration_secs).max().unwrap_or(0);
        let shortest = records.iter().map(|r| r.duration_secs).min().unwrap_or(0);

        Some(FunStats {
            total_hours_played: round_to(total(|r| r.duration_secs) as f64 / 3600.0, 1),
            total_kills: total(|r| u64::from(r.kills)),
            total_deaths: total(|r| u64::from(r.deaths)),
            total_assists: total(|r| u64::from(r.assists)),
            total_gold_earned: total(|r| r.gold_earned),
            total_minions_slain: total(|r| r.creep_score()),
            total_wards_placed: total(|r| u64::from(r.wards_placed)),
            favorite_champion: self.favorite_champion(),
            longest_game_minutes: round_to(longest as f64 / 60.0, 1),
            shortest_game_minutes: round_to(shortest as f64 / 60.0, 1),
        })
    }

    /// Compares the newer half of the history with the older half.
    /// `None` below 20 games.
    pub fn growth(&self) -> Option<Growth> {
        if self.len() < GROWTH_MIN_GAMES {
            return None;
        }
        let (newer, older) = self.records().split_at(self.len() / 2);
        let newer = OverallStats::from_records(newer)?;
        let older = OverallStats::from_records(older)?;
        Some(Growth {
            win_rate_change: round_to(newer.win_rate - older.win_rate, 2),
            kda_change: round_to(newer.avg_kda - older.avg_kda, 2),
            damage_change: round_to(newer.avg_damage - older.avg_damage, 0),
            cs_change: round_to(newer.avg_cs_per_minute - older.avg_cs_per_minute, 2),
            vision_change: round_to(newer.avg_vision_score - older.avg_vision_score, 1),
        })
    }

    /// Best KDA game, highest damage game, and the earliest pentakill.
    /// Ties go to the most recent game.
    pub fn memorable_moments(&self) -> Vec<MemorableMoment> {
        let records = self.records();
        let mut moments = Vec::new();

        if let Some(best) = first_max_by(records, MatchRecord::kda) {
            moments.push(MemorableMoment::BestGame {
                champion: best.champion_name.clone(),
                kills: best.kills,
                deaths: best.deaths,
                assists: best.assists,
                kda: best.kda(),
                date: best.played_at.date_naive(),
            });
        }
        if let Some(top) = first_max_by(records, |r| r.damage_to_champions as f64) {
            moments.push(MemorableMoment::HighestDamage {
                champion: top.champion_name.clone(),
                damage: top.damage_to_champions,
                date: top.played_at.date_naive(),
            });
        }
        if let Some(first) = records.iter().rev().find(|r| r.penta_kills > 0) {
            moments.push(MemorableMoment::FirstPentakill {
                champion: first.champion_name.clone(),
                date: first.played_at.date_naive(),
            });
        }
        moments
    }

    /// Most played champion; ties go to the alphabetically first.
    pub fn favorite_champion(&self) -> Option<String> {
        let by_champion = self.by_champion();
        let mut best: Option<(&str, usize)> = None;
        for (name, games) in &by_champion {
            if best.is_none_or(|(_, n)| games.len() > n) {
                best = Some((name, games.len()));
            }
        }
        best.map(|(name, _)| name.to_string())
    }
}

/// Most frequent value; ties go to the smallest.
fn most_common(values: impl Iterator<Item = u32>) -> Option<u32> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_default() += 1;
    }
    let mut best: Option<(u32, usize)> = None;
    for (v, n) in counts {
        if best.is_none_or(|(_, b)| n > b) {
            best = Some((v, n));
        }
    }
    best.map(|(v, _)| v)
}

fn weekday_name(days_from_monday: u32) -> &'static str {
    let day = Weekday::try_from(days_from_monday as u8).unwrap_or(Weekday::Mon);
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// `52345` -> `52,345`.
pub(crate) fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_separators() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(52_345), "52,345");
        assert_eq!(thousands(1_000_000), "1,000,000");
    }

    #[test]
    fn most_common_prefers_smallest_on_tie() {
        assert_eq!(most_common([3, 1, 3, 1, 2].into_iter()), Some(1));
        assert_eq!(most_common(std::iter::empty()), None);
    }

    #[test]
    fn weekday_names() {
        assert_eq!(weekday_name(0), "Monday");
        assert_eq!(weekday_name(6), "Sunday");
    }
}
