//! Chart and share-card rendering.
//!
//! Every renderer returns UTF-8 SVG bytes. Inputs with nothing to draw
//! produce [`Renderer::error_image`] instead of failing.

pub mod svg;

use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use self::svg::{Anchor, Svg, TextStyle};
use crate::analysis::insights::thousands;
use crate::analysis::{ChampionStats, OverallStats, PlayerReport, Rarity, RoleStats, TrendPoint};
use crate::types::Role;
use crate::{Result, RiftwatchError};

/// Colour scheme shared by every image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
    pub win: &'static str,
    pub loss: &'static str,
    pub gold: &'static str,
    pub silver: &'static str,
    pub bronze: &'static str,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: "#0C1821",
            secondary: "#1B2A41",
            accent: "#C1292E",
            win: "#4CAF50",
            loss: "#F44336",
            gold: "#FFD700",
            silver: "#C0C0C0",
            bronze: "#CD7F32",
        }
    }
}

/// Slice colours for the role donut.
const ROLE_COLORS: [&str; 6] = [
    "#8DD3C7", "#FFFFB3", "#BEBADA", "#FB8072", "#80B1D3", "#FDB462",
];

const TEXT: &str = "white";
const MUTED: &str = "lightgray";

#[derive(Debug, Clone, Default)]
pub struct Renderer {
    palette: Palette,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_palette(palette: Palette) -> Self {
        Self { palette }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Four-panel summary: win rate gauge, KDA, damage, vision.
    pub fn dashboard(&self, player_name: &str, stats: &OverallStats) -> Vec<u8> {
        if stats.total_games == 0 {
            return self.error_image("No match data available");
        }
        let p = &self.palette;
        let mut svg = Svg::new(900, 600, p.primary);
        svg.text(
            450.0,
            45.0,
            &format!("Performance Dashboard - {player_name}"),
            TextStyle::new(24, TEXT).bold(),
        );

        // Win rate gauge.
        self.panel(&mut svg, 30.0, 80.0, "Win Rate (%)");
        let (gx, gy, gw) = (70.0, 190.0, 340.0);
        let bands = [(0.0, 45.0, "#D3D3D3"), (45.0, 50.0, "#808080"), (50.0, 55.0, "#90EE90"), (55.0, 100.0, p.win)];
        for (from, to, color) in bands {
            svg.rect(gx + gw * from / 100.0, gy, gw * (to - from) / 100.0, 14.0, color);
        }
        let wr = stats.win_rate.clamp(0.0, 100.0);
        svg.rect(gx, gy + 18.0, gw * wr / 100.0, 14.0, p.win);
        let mark = gx + gw * 0.5;
        svg.line((mark, gy - 8.0), (mark, gy + 40.0), "red", 4.0);
        svg.text(240.0, 275.0, &format!("{:.1}", stats.win_rate), TextStyle::new(44, p.gold).bold());
        svg.text(240.0, 305.0, &delta(stats.win_rate, 50.0), TextStyle::new(18, self.delta_color(stats.win_rate, 50.0)));

        self.panel(&mut svg, 460.0, 80.0, "Avg KDA");
        svg.text(670.0, 220.0, &format!("{:.2}", stats.avg_kda), TextStyle::new(52, p.gold).bold());
        svg.text(670.0, 260.0, &delta(stats.avg_kda, 2.0), TextStyle::new(18, self.delta_color(stats.avg_kda, 2.0)));

        self.panel(&mut svg, 30.0, 340.0, "Avg Damage");
        svg.text(240.0, 480.0, &thousands(stats.avg_damage.max(0.0) as u64), TextStyle::new(52, p.gold).bold());

        self.panel(&mut svg, 460.0, 340.0, "Avg Vision");
        svg.text(670.0, 480.0, &format!("{:.1}", stats.avg_vision_score), TextStyle::new(52, p.gold).bold());
        svg.text(
            670.0,
            520.0,
            &delta(stats.avg_vision_score, 30.0),
            TextStyle::new(18, self.delta_color(stats.avg_vision_score, 30.0)),
        );

        svg.finish()
    }

    /// Games per champion as bars, win rate and KDA as lines.
    pub fn champion_chart(&self, champions: &[ChampionStats]) -> Vec<u8> {
        if champions.is_empty() {
            debug!("no champions to chart");
            return self.error_image("No champion data available");
        }
        let p = &self.palette;
        let mut svg = Svg::new(900, 500, p.primary);
        svg.text(450.0, 40.0, "Top Champions Performance", TextStyle::new(22, TEXT).bold());

        let plot = Plot::new(80.0, 70.0, 740.0, 340.0);
        svg.rect(plot.x, plot.y, plot.w, plot.h, p.secondary);

        let max_games = champions.iter().map(|c| c.games).max().unwrap_or(1).max(1) as f64;
        let right_max = champions
            .iter()
            .map(|c| c.avg_kda)
            .fold(100.0_f64, f64::max);

        let slot = plot.w / champions.len() as f64;
        let mut win_rates = Vec::with_capacity(champions.len());
        let mut kdas = Vec::with_capacity(champions.len());
        for (i, c) in champions.iter().enumerate() {
            let cx = plot.x + slot * (i as f64 + 0.5);
            let bar_h = plot.h * c.games as f64 / max_games;
            svg.rect(cx - slot * 0.3, plot.bottom() - bar_h, slot * 0.6, bar_h, p.accent);
            svg.text(cx, plot.bottom() - bar_h - 6.0, &c.games.to_string(), TextStyle::new(12, MUTED));
            svg.text(cx, plot.bottom() + 22.0, &c.champion, TextStyle::new(13, TEXT));
            win_rates.push((cx, plot.bottom() - plot.h * c.win_rate / right_max));
            kdas.push((cx, plot.bottom() - plot.h * c.avg_kda / right_max));
        }
        svg.polyline(&win_rates, p.win, 3.0, false);
        svg.polyline(&kdas, p.gold, 3.0, true);
        for &(x, y) in &win_rates {
            svg.circle(x, y, 4.0, p.win);
        }

        svg.text(20.0, plot.y + plot.h / 2.0, "Games", TextStyle::new(13, MUTED).anchor(Anchor::Start));
        svg.text(880.0, plot.y + plot.h / 2.0, "WR % / KDA", TextStyle::new(13, MUTED).anchor(Anchor::End));
        self.legend(&mut svg, 450.0, 470.0, &[("Games Played", p.accent), ("Win Rate %", p.win), ("Avg KDA", p.gold)]);
        svg.finish()
    }

    /// Win rate over time on top, KDA and vision underneath.
    pub fn trend_chart(&self, points: &[TrendPoint]) -> Vec<u8> {
        if points.is_empty() {
            debug!("no trend points to chart");
            return self.error_image("No trend data available");
        }
        let p = &self.palette;
        let mut svg = Svg::new(900, 700, p.primary);
        svg.text(450.0, 40.0, "Performance Trends", TextStyle::new(22, TEXT).bold());

        let top = Plot::new(80.0, 80.0, 760.0, 250.0);
        let bottom = Plot::new(80.0, 400.0, 760.0, 220.0);
        svg.text(top.x, top.y - 12.0, "Win Rate Over Time", TextStyle::new(15, MUTED).anchor(Anchor::Start));
        svg.text(bottom.x, bottom.y - 12.0, "Performance Metrics", TextStyle::new(15, MUTED).anchor(Anchor::Start));
        svg.rect(top.x, top.y, top.w, top.h, p.secondary);
        svg.rect(bottom.x, bottom.y, bottom.w, bottom.h, p.secondary);

        let xs: Vec<f64> = (0..points.len()).map(|i| top.x_at(i, points.len())).collect();

        let win_line: Vec<(f64, f64)> = xs
            .iter()
            .zip(points)
            .map(|(&x, t)| (x, top.y_at(t.win_rate.clamp(0.0, 100.0), 100.0)))
            .collect();
        let mut area = win_line.clone();
        area.push((xs[xs.len() - 1], top.bottom()));
        area.push((xs[0], top.bottom()));
        svg.polygon(&area, p.win, 0.3);
        svg.polyline(&win_line, p.win, 3.0, false);
        let fifty = top.y_at(50.0, 100.0);
        svg.line((top.x, fifty), (top.x + top.w, fifty), MUTED, 1.0);

        let metric_max = points
            .iter()
            .map(|t| t.avg_kda.max(t.avg_vision_score))
            .fold(1.0_f64, f64::max);
        let kda: Vec<(f64, f64)> = xs.iter().zip(points).map(|(&x, t)| (x, bottom.y_at(t.avg_kda, metric_max))).collect();
        let vision: Vec<(f64, f64)> = xs
            .iter()
            .zip(points)
            .map(|(&x, t)| (x, bottom.y_at(t.avg_vision_score, metric_max)))
            .collect();
        svg.polyline(&kda, p.gold, 2.0, false);
        svg.polyline(&vision, p.silver, 2.0, true);

        for (&x, t) in xs.iter().zip(points) {
            svg.text(x, bottom.bottom() + 22.0, &t.period, TextStyle::new(12, TEXT));
        }
        self.legend(&mut svg, 450.0, 680.0, &[("Win Rate %", p.win), ("Avg KDA", p.gold), ("Avg Vision", p.silver)]);
        svg.finish()
    }

    /// Donut of games per role, labelled with each role's win rate.
    pub fn role_chart(&self, roles: &BTreeMap<Role, RoleStats>) -> Vec<u8> {
        let total: usize = roles.values().map(|r| r.games).sum();
        if total == 0 {
            debug!("no role data to chart");
            return self.error_image("No role data available");
        }
        let p = &self.palette;
        let mut svg = Svg::new(800, 500, p.primary);
        svg.text(400.0, 40.0, "Role Distribution & Win Rates", TextStyle::new(22, TEXT).bold());

        let (cx, cy, outer, inner) = (280.0, 270.0, 170.0, 68.0);
        let mut start = -PI / 2.0;
        for (i, (role, stats)) in roles.iter().enumerate() {
            let sweep = 2.0 * PI * stats.games as f64 / total as f64;
            let color = ROLE_COLORS[i % ROLE_COLORS.len()];
            if stats.games == total {
                svg.circle(cx, cy, outer, color);
                svg.circle(cx, cy, inner, p.primary);
            } else {
                svg.path(&donut_slice(cx, cy, outer, inner, start, start + sweep), color);
            }
            let mid = start + sweep / 2.0;
            let r = (outer + inner) / 2.0;
            svg.text(
                cx + r * mid.cos(),
                cy + r * mid.sin() + 5.0,
                &format!("{:.1}%", stats.win_rate),
                TextStyle::new(13, p.primary).bold(),
            );

            let ly = 150.0 + 40.0 * i as f64;
            svg.rect(520.0, ly - 14.0, 18.0, 18.0, color);
            svg.text(
                548.0,
                ly,
                &format!("{} - {} games, {:.1}% WR", role.label(), stats.games, stats.win_rate),
                TextStyle::new(15, TEXT).anchor(Anchor::Start),
            );
            start += sweep;
        }
        svg.finish()
    }

    /// 1200x630 shareable card with six headline numbers.
    pub fn social_card(&self, report: &PlayerReport) -> Vec<u8> {
        let p = &self.palette;
        let stats = &report.overall;
        let (w, h) = (1200.0, 630.0);
        let mut svg = Svg::new(1200, 630, p.primary);

        svg.text(w / 2.0, 95.0, &format!("{}'s Season", report.player_name), TextStyle::new(56, TEXT).bold());
        svg.line((100.0, 150.0), (w - 100.0, 150.0), p.accent, 3.0);

        let cols = [w / 4.0, w / 2.0, 3.0 * w / 4.0];
        let damage = if stats.avg_damage >= 1000.0 {
            format!("{:.1}k", stats.avg_damage / 1000.0)
        } else {
            format!("{}", stats.avg_damage as u64)
        };
        let cells = [
            (format!("{:.1}%", stats.win_rate), "WIN RATE"),
            (format!("{:.2}", stats.avg_kda), "AVG KDA"),
            (stats.total_games.to_string(), "TOTAL GAMES"),
            (stats.total_penta_kills.to_string(), "PENTAKILLS"),
            (format!("{:.0}h", stats.total_hours_played), "TIME PLAYED"),
            (damage, "AVG DAMAGE"),
        ];
        for (i, (value, label)) in cells.iter().enumerate() {
            let y = if i < 3 { 260.0 } else { 430.0 };
            self.stat(&mut svg, cols[i % 3], y, value, label, 44, 26);
        }

        svg.text(w / 2.0, h - 40.0, "Generated by riftwatch", TextStyle::new(22, "gray"));
        svg.finish()
    }

    /// Tall infographic: key stats, top achievements, fun facts.
    pub fn year_in_review(&self, report: &PlayerReport) -> Vec<u8> {
        let p = &self.palette;
        let stats = &report.overall;
        let (w, h) = (1080.0, 1920.0);
        let mut svg = Svg::new(1080, 1920, p.primary);

        let mut y = 100.0;
        svg.text(w / 2.0, y, &report.player_name, TextStyle::new(64, TEXT).bold());
        y += 80.0;
        svg.text(w / 2.0, y, "YEAR IN REVIEW", TextStyle::new(46, p.gold).bold());
        y += 110.0;

        svg.text(w / 2.0, y, "KEY STATISTICS", TextStyle::new(44, p.accent).bold());
        y += 90.0;
        let hours = report
            .fun_stats
            .as_ref()
            .map_or(stats.total_hours_played, |f| f.total_hours_played);
        let key = [
            (format!("{} GAMES", stats.total_games), "PLAYED"),
            (format!("{:.1}%", stats.win_rate), "WIN RATE"),
            (format!("{:.2}", stats.avg_kda), "AVG KDA"),
            (format!("{hours:.0}H"), "TIME INVESTED"),
        ];
        for (i, (value, label)) in key.iter().enumerate() {
            let x = if i % 2 == 0 { w / 3.0 } else { 2.0 * w / 3.0 };
            self.stat(&mut svg, x, y, value, label, 42, 28);
            if i % 2 == 1 {
                y += 130.0;
            }
        }
        y += 50.0;

        if !report.achievements.is_empty() {
            svg.text(w / 2.0, y, "TOP ACHIEVEMENTS", TextStyle::new(44, p.accent).bold());
            y += 80.0;
            for achievement in report.achievements.iter().take(3) {
                svg.circle(140.0, y - 10.0, 18.0, self.rarity_color(achievement.rarity));
                svg.text(190.0, y, &achievement.title, TextStyle::new(30, TEXT).anchor(Anchor::Start).bold());
                svg.text(190.0, y + 38.0, &achievement.description, TextStyle::new(26, "gray").anchor(Anchor::Start));
                y += 100.0;
            }
            y += 30.0;
        }

        if let Some(fun) = &report.fun_stats {
            svg.text(w / 2.0, y, "FUN FACTS", TextStyle::new(44, p.accent).bold());
            y += 75.0;
            let facts = [
                format!("{} Total Deaths", thousands(fun.total_deaths)),
                format!("{} Total Kills", thousands(fun.total_kills)),
                format!("{} Total Assists", thousands(fun.total_assists)),
                format!("{} Gold Earned", thousands(fun.total_gold_earned)),
                format!("{} Wards Placed", thousands(fun.total_wards_placed)),
            ];
            for fact in &facts {
                svg.text(w / 2.0, y, fact, TextStyle::new(30, TEXT));
                y += 52.0;
            }
        }

        svg.text(w / 2.0, h - 60.0, "Share your stats!", TextStyle::new(28, "gray"));
        svg.finish()
    }

    /// 800x400 placeholder carrying `message`.
    pub fn error_image(&self, message: &str) -> Vec<u8> {
        let mut svg = Svg::new(800, 400, self.palette.primary);
        svg.text(400.0, 210.0, message, TextStyle::new(30, TEXT));
        svg.finish()
    }

    fn panel(&self, svg: &mut Svg, x: f64, y: f64, title: &str) {
        svg.rect(x, y, 410.0, 240.0, self.palette.secondary);
        svg.text(x + 205.0, y + 35.0, title, TextStyle::new(18, MUTED));
    }

    #[allow(clippy::too_many_arguments)]
    fn stat(&self, svg: &mut Svg, x: f64, y: f64, value: &str, label: &str, value_size: u32, label_size: u32) {
        svg.text(x, y, value, TextStyle::new(value_size, self.palette.gold).bold());
        svg.text(x, y + 50.0, label, TextStyle::new(label_size, MUTED));
    }

    fn legend(&self, svg: &mut Svg, center_x: f64, y: f64, entries: &[(&str, &str)]) {
        let spacing = 180.0;
        let start = center_x - spacing * (entries.len() as f64 - 1.0) / 2.0;
        for (i, (label, color)) in entries.iter().enumerate() {
            let x = start + spacing * i as f64;
            svg.rect(x - 70.0, y - 11.0, 14.0, 14.0, color);
            svg.text(x - 50.0, y, label, TextStyle::new(13, TEXT).anchor(Anchor::Start));
        }
    }

    fn delta_color(&self, value: f64, reference: f64) -> &'static str {
        if value >= reference { self.palette.win } else { self.palette.loss }
    }

    fn rarity_color(&self, rarity: Rarity) -> &'static str {
        match rarity {
            Rarity::Legendary => self.palette.gold,
            Rarity::Epic => self.palette.accent,
            Rarity::Rare => self.palette.silver,
            Rarity::Common => self.palette.bronze,
        }
    }
}

/// Write the report JSON and every chart into `dir`, returning the paths
/// written.
pub fn write_report(dir: &Path, report: &PlayerReport) -> Result<Vec<PathBuf>> {
    let renderer = Renderer::new();
    std::fs::create_dir_all(dir)
        .map_err(|e| RiftwatchError::Render(format!("failed to create {}: {e}", dir.display())))?;

    let files: [(&str, Vec<u8>); 7] = [
        ("report.json", serde_json::to_vec_pretty(report)?),
        ("dashboard.svg", renderer.dashboard(&report.player_name, &report.overall)),
        ("champions.svg", renderer.champion_chart(&report.champion_stats)),
        ("trends.svg", renderer.trend_chart(&report.trends.monthly)),
        ("roles.svg", renderer.role_chart(&report.roles)),
        ("card.svg", renderer.social_card(report)),
        ("year_in_review.svg", renderer.year_in_review(report)),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (name, bytes) in files {
        let path = dir.join(name);
        std::fs::write(&path, bytes)
            .map_err(|e| RiftwatchError::Render(format!("failed to write {}: {e}", path.display())))?;
        written.push(path);
    }
    info!(dir = %dir.display(), files = written.len(), "report written");
    Ok(written)
}

/// Plot area in canvas coordinates.
#[derive(Debug, Clone, Copy)]
struct Plot {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

impl Plot {
    fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Evenly spaced x for point `i` of `n`; a lone point sits in the middle.
    fn x_at(&self, i: usize, n: usize) -> f64 {
        if n <= 1 {
            self.x + self.w / 2.0
        } else {
            self.x + self.w * i as f64 / (n - 1) as f64
        }
    }

    fn y_at(&self, value: f64, max: f64) -> f64 {
        self.bottom() - self.h * (value / max).clamp(0.0, 1.0)
    }
}

fn delta(value: f64, reference: f64) -> String {
    let d = value - reference;
    if d >= 0.0 {
        format!("▲ {d:.2} vs {reference}")
    } else {
        format!("▼ {:.2} vs {reference}", d.abs())
    }
}

/// Ring segment between `start` and `end` radians.
fn donut_slice(cx: f64, cy: f64, outer: f64, inner: f64, start: f64, end: f64) -> String {
    let large = if end - start > PI { 1 } else { 0 };
    let point = |r: f64, a: f64| (cx + r * a.cos(), cy + r * a.sin());
    let (ox1, oy1) = point(outer, start);
    let (ox2, oy2) = point(outer, end);
    let (ix2, iy2) = point(inner, end);
    let (ix1, iy1) = point(inner, start);
    format!(
        "M {ox1:.2} {oy1:.2} A {outer} {outer} 0 {large} 1 {ox2:.2} {oy2:.2} \
         L {ix2:.2} {iy2:.2} A {inner} {inner} 0 {large} 0 {ix1:.2} {iy1:.2} Z"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_formats_sign() {
        assert_eq!(delta(55.0, 50.0), "▲ 5.00 vs 50");
        assert_eq!(delta(1.5, 2.0), "▼ 0.50 vs 2");
    }

    #[test]
    fn lone_point_is_centered() {
        let plot = Plot::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(plot.x_at(0, 1), 50.0);
        assert_eq!(plot.x_at(2, 3), 100.0);
        assert_eq!(plot.y_at(200.0, 100.0), 0.0);
    }

    #[test]
    fn slice_path_is_closed() {
        let d = donut_slice(0.0, 0.0, 10.0, 5.0, 0.0, PI / 2.0);
        assert!(d.starts_with("M 10.00 0.00"));
        assert!(d.ends_with('Z'));
    }
}
