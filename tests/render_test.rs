use std::collections::BTreeMap;

use riftwatch::analysis::{AnalysisConfig, MatchHistory, PlayerReport};
use riftwatch::render::{Renderer, write_report};
use riftwatch::types::{InfoDto, MatchDto, MetadataDto, ParticipantDto};
use riftwatch::RiftwatchError;

fn report(player_name: &str) -> PlayerReport {
    let matches: Vec<MatchDto> = (0..10)
        .map(|i| MatchDto {
            metadata: MetadataDto {
                match_id: format!("EUW1_{i}"),
                participants: vec!["p".into()],
            },
            info: InfoDto {
                game_creation: 1_704_067_200_000 + i * 40 * 86_400_000,
                game_duration: 1500 + i * 60,
                participants: vec![ParticipantDto {
                    puuid: "p".into(),
                    champion_name: ["Lux", "Thresh", "Jinx"][i as usize % 3].into(),
                    team_position: ["UTILITY", "UTILITY", "BOTTOM"][i as usize % 3].into(),
                    win: i % 2 == 0,
                    kills: 3 + i as u32,
                    deaths: 4,
                    assists: 12,
                    total_damage_dealt_to_champions: 15_000 + i as u64 * 1_000,
                    vision_score: 45,
                    penta_kills: u32::from(i == 4),
                    ..Default::default()
                }],
                ..Default::default()
            },
        })
        .collect();
    MatchHistory::from_matches("p", &matches)
        .report(player_name, &AnalysisConfig::default())
        .unwrap()
}

fn text(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap()
}

#[test]
fn charts_are_svg_documents() {
    let report = report("Caps#EUW");
    let renderer = Renderer::new();
    for doc in [
        renderer.dashboard(&report.player_name, &report.overall),
        renderer.champion_chart(&report.champion_stats),
        renderer.trend_chart(&report.trends.monthly),
        renderer.role_chart(&report.roles),
        renderer.social_card(&report),
        renderer.year_in_review(&report),
    ] {
        let doc = text(doc);
        assert!(doc.starts_with("<svg"), "{doc}");
        assert!(doc.trim_end().ends_with("</svg>"));
    }
}

#[test]
fn player_name_is_escaped() {
    let report = report("<Caps> & co");
    let doc = text(Renderer::new().dashboard(&report.player_name, &report.overall));
    assert!(doc.contains("&lt;Caps&gt; &amp; co"));
    assert!(!doc.contains("<Caps>"));
}

#[test]
fn empty_inputs_render_a_placeholder() {
    let renderer = Renderer::new();
    assert!(text(renderer.champion_chart(&[])).contains("No champion data available"));
    assert!(text(renderer.trend_chart(&[])).contains("No trend data available"));
    assert!(text(renderer.role_chart(&BTreeMap::new())).contains("No role data available"));
}

#[test]
fn social_card_carries_the_footer() {
    let doc = text(Renderer::new().social_card(&report("Caps")));
    assert!(doc.contains("Generated by riftwatch"));
}

#[test]
fn write_report_creates_every_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested/out");
    let report = report("Caps");

    let written = write_report(&out, &report).unwrap();
    let names: Vec<_> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        [
            "report.json",
            "dashboard.svg",
            "champions.svg",
            "trends.svg",
            "roles.svg",
            "card.svg",
            "year_in_review.svg"
        ]
    );
    for path in &written {
        assert!(std::fs::metadata(path).unwrap().len() > 0);
    }

    let json = std::fs::read_to_string(out.join("report.json")).unwrap();
    let back: PlayerReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
}

#[test]
fn write_report_into_a_file_fails_as_render_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("occupied");
    std::fs::write(&blocker, b"x").unwrap();

    let err = write_report(&blocker, &report("Caps")).unwrap_err();
    assert!(matches!(err, RiftwatchError::Render(_)), "got {err:?}");
}
