//! Descriptive statistics over a match history.
//!
//! Percentages are on a 0–100 scale. Values are rounded for presentation at
//! the precision noted on each field; derived scores are computed from the
//! rounded figures.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MatchHistory;
use crate::types::{MatchRecord, Role, round_to};

/// Games needed before a champion counts toward "best champion" rankings.
pub const BEST_CHAMPION_MIN_GAMES: usize = 3;

/// Games needed before a champion's win rate is ranked.
pub const HIGHEST_WIN_RATE_MIN_GAMES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallStats {
    pub total_games: usize,
    pub wins: usize,
    pub losses: usize,
    /// 2 dp.
    pub win_rate: f64,

    pub avg_kills: f64,
    pub avg_deaths: f64,
    pub avg_assists: f64,
    pub avg_kda: f64,

    /// Whole numbers.
    pub avg_damage: f64,
    pub max_damage: u64,
    pub avg_damage_taken: f64,
    pub avg_gold: f64,

    /// 1 dp.
    pub avg_cs: f64,
    pub avg_cs_per_minute: f64,
    pub avg_vision_score: f64,
    pub avg_wards_placed: f64,
    pub avg_control_wards: f64,

    pub total_double_kills: u32,
    pub total_triple_kills: u32,
    pub total_quadra_kills: u32,
    pub total_penta_kills: u32,

    pub avg_game_minutes: f64,
    pub total_hours_played: f64,
}

impl OverallStats {
    /// `None` for an empty slice.
    pub fn from_records(records: &[MatchRecord]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }
        let total_games = records.len();
        let wins = records.iter().filter(|r| r.is_win()).count();
        let avg = |f: fn(&MatchRecord) -> f64| mean(records.iter().map(f));
        let sum = |f: fn(&MatchRecord) -> u32| records.iter().map(f).sum::<u32>();
        let total_secs: u64 = records.iter().map(|r| r.duration_secs).sum();

        Some(Self {
            total_games,
            wins,
            losses: total_games - wins,
            win_rate: round_to(percent(wins, total_games), 2),
            avg_kills: round_to(avg(|r| f64::from(r.kills)), 2),
            avg_deaths: round_to(avg(|r| f64::from(r.deaths)), 2),
            avg_assists: round_to(avg(|r| f64::from(r.assists)), 2),
            avg_kda: round_to(avg(MatchRecord::kda), 2),
            avg_damage: round_to(avg(|r| r.damage_to_champions as f64), 0),
            max_damage: records
                .iter()
                .map(|r| r.damage_to_champions)
                .max()
                .unwrap_or(0),
            avg_damage_taken: round_to(avg(|r| r.damage_taken as f64), 0),
            avg_gold: round_to(avg(|r| r.gold_earned as f64), 0),
            avg_cs: round_to(avg(|r| r.creep_score() as f64), 1),
            avg_cs_per_minute: round_to(avg(MatchRecord::cs_per_minute), 2),
            avg_vision_score: round_to(avg(|r| f64::from(r.vision_score)), 1),
            avg_wards_placed: round_to(avg(|r| f64::from(r.wards_placed)), 1),
            avg_control_wards: round_to(avg(|r| f64::from(r.control_wards_placed)), 1),
            total_double_kills: sum(|r| r.double_kills),
            total_triple_kills: sum(|r| r.triple_kills),
            total_quadra_kills: sum(|r| r.quadra_kills),
            total_penta_kills: sum(|r| r.penta_kills),
            avg_game_minutes: round_to(total_secs as f64 / total_games as f64 / 60.0, 1),
            total_hours_played: round_to(total_secs as f64 / 3600.0, 1),
        })
    }
}

/// Per-champion averages. All values 2 dp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChampionStats {
    pub champion: String,
    pub games: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub avg_kills: f64,
    pub avg_deaths: f64,
    pub avg_assists: f64,
    pub avg_kda: f64,
    pub avg_damage: f64,
    pub avg_gold: f64,
    pub avg_cs_per_minute: f64,
    pub avg_vision_score: f64,
}

impl ChampionStats {
    fn from_games(champion: &str, games: &[&MatchRecord]) -> Self {
        let avg = |f: fn(&MatchRecord) -> f64| round_to(mean(games.iter().map(|r| f(r))), 2);
        let wins = games.iter().filter(|r| r.is_win()).count();
        Self {
            champion: champion.to_string(),
            games: games.len(),
            wins,
            win_rate: round_to(percent(wins, games.len()), 2),
            avg_kills: avg(|r| f64::from(r.kills)),
            avg_deaths: avg(|r| f64::from(r.deaths)),
            avg_assists: avg(|r| f64::from(r.assists)),
            avg_kda: avg(MatchRecord::kda),
            avg_damage: avg(|r| r.damage_to_champions as f64),
            avg_gold: avg(|r| r.gold_earned as f64),
            avg_cs_per_minute: avg(MatchRecord::cs_per_minute),
            avg_vision_score: avg(|r| f64::from(r.vision_score)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleStats {
    pub games: usize,
    pub wins: usize,
    /// 2 dp.
    pub win_rate: f64,
    /// 2 dp.
    pub avg_kda: f64,
    /// Whole number.
    pub avg_damage: f64,
}

/// Bucket size for [`MatchHistory::trends`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Month,
    Week,
}

impl Period {
    /// Sortable bucket label: `2024-03` for months, ISO `2024-W09` for weeks.
    pub fn key(&self, at: &DateTime<Utc>) -> String {
        match self {
            Period::Month => at.format("%Y-%m").to_string(),
            Period::Week => at.format("%G-W%V").to_string(),
        }
    }
}

/// One period's aggregates. Values 2 dp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub period: String,
    pub games: usize,
    pub win_rate: f64,
    pub avg_kda: f64,
    pub avg_damage: f64,
    pub avg_gold: f64,
    pub avg_cs_per_minute: f64,
    pub avg_vision_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestChampion {
    pub champion: String,
    pub games: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub avg_kda: f64,
    pub performance_score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChampionCount {
    pub champion: String,
    pub games: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChampionWinRate {
    pub champion: String,
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChampionInsights {
    pub best_champions: Vec<BestChampion>,
    /// Top 10 by games played.
    pub most_played: Vec<ChampionCount>,
    /// Top 5 by win rate among champions with at least 5 games.
    pub highest_win_rate: Vec<ChampionWinRate>,
    pub unique_champions: usize,
    /// Unique champions per 100 games, 2 dp.
    pub diversity_score: f64,
}

/// Direction of change between two periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Improving,
    Declining,
    Stable,
}

impl Direction {
    pub fn between(previous: f64, recent: f64) -> Self {
        if recent > previous {
            Direction::Improving
        } else if recent < previous {
            Direction::Declining
        } else {
            Direction::Stable
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    pub monthly: Vec<TrendPoint>,
    /// Last month against the one before; `Stable` with fewer than two months.
    pub win_rate_trend: Direction,
    pub kda_trend: Direction,
    pub most_active_month: Option<String>,
    pub best_performing_month: Option<String>,
}

impl MatchHistory {
    pub fn overall(&self) -> Option<OverallStats> {
        OverallStats::from_records(self.records())
    }

    /// Champions with at least `min_games` games, most played first
    /// (ties alphabetical).
    pub fn champions(&self, min_games: usize) -> Vec<ChampionStats> {
        let mut stats: Vec<_> = self
            .by_champion()
            .into_iter()
            .filter(|(_, games)| games.len() >= min_games)
            .map(|(name, games)| ChampionStats::from_games(name, &games))
            .collect();
        // BTreeMap order is alphabetical and the sort is stable.
        stats.sort_by(|a, b| b.games.cmp(&a.games));
        stats
    }

    /// Per-role aggregates; games without a known position are left out.
    pub fn roles(&self) -> BTreeMap<Role, RoleStats> {
        let mut groups: BTreeMap<Role, Vec<&MatchRecord>> = BTreeMap::new();
        for record in self.records().iter().filter(|r| r.role != Role::Unknown) {
            groups.entry(record.role).or_default().push(record);
        }
        groups
            .into_iter()
            .map(|(role, games)| {
                let wins = games.iter().filter(|r| r.is_win()).count();
                let stats = RoleStats {
                    games: games.len(),
                    wins,
                    win_rate: round_to(percent(wins, games.len()), 2),
                    avg_kda: round_to(mean(games.iter().map(|r| r.kda())), 2),
                    avg_damage: round_to(
                        mean(games.iter().map(|r| r.damage_to_champions as f64)),
                        0,
                    ),
                };
                (role, stats)
            })
            .collect()
    }

    /// Aggregates per period, oldest first.
    pub fn trends(&self, period: Period) -> Vec<TrendPoint> {
        let mut groups: BTreeMap<String, Vec<&MatchRecord>> = BTreeMap::new();
        for record in self.records() {
            groups
                .entry(period.key(&record.played_at))
                .or_default()
                .push(record);
        }
        groups
            .into_iter()
            .map(|(period, games)| {
                let avg = |f: fn(&MatchRecord) -> f64| round_to(mean(games.iter().map(|r| f(r))), 2);
                let wins = games.iter().filter(|r| r.is_win()).count();
                TrendPoint {
                    games: games.len(),
                    win_rate: round_to(percent(wins, games.len()), 2),
                    avg_kda: avg(MatchRecord::kda),
                    avg_damage: avg(|r| r.damage_to_champions as f64),
                    avg_gold: avg(|r| r.gold_earned as f64),
                    avg_cs_per_minute: avg(MatchRecord::cs_per_minute),
                    avg_vision_score: avg(|r| f64::from(r.vision_score)),
                    period,
                }
            })
            .collect()
    }

    /// Monthly trends with direction of the last month-over-month change.
    pub fn trend_summary(&self) -> TrendSummary {
        let monthly = self.trends(Period::Month);
        let (win_rate_trend, kda_trend) = match monthly.as_slice() {
            [.., previous, recent] => (
                Direction::between(previous.win_rate, recent.win_rate),
                Direction::between(previous.avg_kda, recent.avg_kda),
            ),
            _ => (Direction::Stable, Direction::Stable),
        };
        let most_active_month =
            first_max_by(&monthly, |p| p.games as f64).map(|p| p.period.clone());
        let best_performing_month = first_max_by(&monthly, |p| p.win_rate).map(|p| p.period.clone());
        TrendSummary {
            monthly,
            win_rate_trend,
            kda_trend,
            most_active_month,
            best_performing_month,
        }
    }

    /// Top `top_n` champions (at least 3 games) by
    /// `win_rate·0.6 + kda·10·0.3 + ln(1+games)·5·0.1`.
    pub fn best_champions(&self, top_n: usize) -> Vec<BestChampion> {
        let mut ranked: Vec<BestChampion> = self
            .champions(BEST_CHAMPION_MIN_GAMES)
            .into_iter()
            .map(|c| BestChampion {
                performance_score: round_to(performance_score(&c), 2),
                champion: c.champion,
                games: c.games,
                wins: c.wins,
                win_rate: c.win_rate,
                avg_kda: c.avg_kda,
            })
            .collect();
        ranked.sort_by(|a, b| b.performance_score.total_cmp(&a.performance_score));
        ranked.truncate(top_n);
        ranked
    }

    pub fn champion_insights(&self) -> ChampionInsights {
        let by_champion = self.by_champion();

        let mut most_played: Vec<ChampionCount> = by_champion
            .iter()
            .map(|(name, games)| ChampionCount {
                champion: name.to_string(),
                games: games.len(),
            })
            .collect();
        most_played.sort_by(|a, b| b.games.cmp(&a.games));
        most_played.truncate(10);

        let mut highest_win_rate: Vec<ChampionWinRate> = by_champion
            .iter()
            .filter(|(_, games)| games.len() >= HIGHEST_WIN_RATE_MIN_GAMES)
            .map(|(name, games)| {
                let wins = games.iter().filter(|r| r.is_win()).count();
                ChampionWinRate {
                    champion: name.to_string(),
                    win_rate: round_to(percent(wins, games.len()), 2),
                }
            })
            .collect();
        highest_win_rate.sort_by(|a, b| b.win_rate.total_cmp(&a.win_rate));
        highest_win_rate.truncate(5);

        let unique_champions = by_champion.len();
        ChampionInsights {
            best_champions: self.best_champions(5),
            most_played,
            highest_win_rate,
            unique_champions,
            diversity_score: round_to(percent(unique_champions, self.len()), 2),
        }
    }

    /// Games grouped by champion name, alphabetical.
    pub(crate) fn by_champion(&self) -> BTreeMap<&str, Vec<&MatchRecord>> {
        let mut groups: BTreeMap<&str, Vec<&MatchRecord>> = BTreeMap::new();
        for record in self.records() {
            groups
                .entry(record.champion_name.as_str())
                .or_default()
                .push(record);
        }
        groups
    }
}

fn performance_score(c: &ChampionStats) -> f64 {
    c.win_rate * 0.6 + c.avg_kda * 10.0 * 0.3 + (c.games as f64).ln_1p() * 5.0 * 0.1
}

/// Arithmetic mean; zero for no values.
pub(crate) fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 { 0.0 } else { sum / n as f64 }
}

pub(crate) fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// First element with the greatest key.
pub(crate) fn first_max_by<T>(items: &[T], key: impl Fn(&T) -> f64) -> Option<&T> {
    let mut best: Option<(&T, f64)> = None;
    for item in items {
        let k = key(item);
        match best {
            Some((_, b)) if k <= b => {}
            _ => best = Some((item, k)),
        }
    }
    best.map(|(item, _)| item)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_nothing_is_zero() {
        assert_eq!(mean(std::iter::empty()), 0.0);
        assert_eq!(mean([1.0, 2.0, 6.0]), 3.0);
    }

    #[test]
    fn first_max_keeps_earliest_tie() {
        let items = [("a", 1.0), ("b", 3.0), ("c", 3.0)];
        assert_eq!(first_max_by(&items, |i| i.1).unwrap().0, "b");
    }

    #[test]
    fn direction_between() {
        assert_eq!(Direction::between(50.0, 55.0), Direction::Improving);
        assert_eq!(Direction::between(50.0, 45.0), Direction::Declining);
        assert_eq!(Direction::between(50.0, 50.0), Direction::Stable);
    }

    #[test]
    fn week_keys_use_iso_weeks() {
        let at = DateTime::<Utc>::from_timestamp(1_704_067_200, 0).unwrap(); // Mon 2024-01-01
        assert_eq!(Period::Week.key(&at), "2024-W01");
        assert_eq!(Period::Month.key(&at), "2024-01");
    }
}
