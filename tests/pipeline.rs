use std::fs;
use std::path::PathBuf;

use flex_terminal::feed::{RawRecord, parse_projections_json};
use flex_terminal::hit_rate::{Confidence, HIT_RATE_FLOOR, Side};
use flex_terminal::injury::{InjuryStatus, InjuryTable};
use flex_terminal::odds::SportsbookBook;
use flex_terminal::pipeline::{
    FeedSource, RecordError, ScoringContext, build_projections, normalize_record, sample_batch,
};
use flex_terminal::selector::{self, Filters};
use flex_terminal::sports::Sport;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn fixture_records() -> Vec<RawRecord> {
    parse_projections_json(&read_fixture("projections.json")).expect("fixture should parse")
}

#[test]
fn parses_feed_fixture_with_field_fallbacks() {
    let records = fixture_records();
    assert_eq!(records.len(), 8, "non-object items are ignored");

    assert_eq!(records[0].league_id.as_deref(), Some("4"));
    assert_eq!(records[1].subject_name(), Some("Stephen Curry"));
    assert_eq!(records[1].stat_label(), "Points");
    assert_eq!(records[1].line_score, Some(26.5));
    assert_eq!(records[3].line_score, None);
    assert!(records[7].is_live);
}

#[test]
fn builds_scored_projections_from_fixture() {
    let injuries = InjuryTable::builtin();
    let ctx = ScoringContext::new(&injuries);
    let batch = build_projections(&fixture_records(), FeedSource::Live, &ctx);

    assert_eq!(batch.source, FeedSource::Live);
    assert_eq!(batch.projections.len(), 7);
    assert_eq!(batch.skipped, 1, "null line_score is dropped");
    assert!(batch.projections.iter().all(|p| p.id != "104"));
    let leagues: Vec<&str> = batch.league_ids.iter().map(String::as_str).collect();
    assert_eq!(leagues, vec!["2", "4", "777", "999"]);

    let by_id = |id: &str| {
        batch
            .projections
            .iter()
            .find(|p| p.id == id)
            .expect("projection present")
    };

    let embiid = by_id("101");
    assert_eq!(embiid.injury.status, InjuryStatus::Out);
    assert_eq!(embiid.hit_rate, HIT_RATE_FLOOR);
    assert_eq!(embiid.recommendation, Side::Less);
    assert_eq!(embiid.confidence, Confidence::High);
    assert_eq!(embiid.team, "PHI");

    let lakers = by_id("103");
    assert!(!lakers.is_player);
    assert_eq!(lakers.sport.sport, Sport::Nba);

    assert_eq!(by_id("105").sport.sport, Sport::Nfl);
    assert_eq!(by_id("106").sport.sport, Sport::Golf, "roster fallback");
    assert_eq!(by_id("107").sport.sport, Sport::Other);

    let brooks = by_id("108");
    assert!(brooks.opportunity);
    assert_eq!(brooks.recommendation, Side::More);
    assert_eq!(brooks.confidence, Confidence::Medium);
    assert_eq!(brooks.team, "PHX");
    assert!((brooks.hit_rate - 0.572).abs() < 1e-9);

    let curry = by_id("102");
    assert_eq!(curry.team, "Unknown");
    assert!((curry.hit_rate - 0.5096).abs() < 1e-9);
}

#[test]
fn sport_counts_are_largest_first() {
    let injuries = InjuryTable::builtin();
    let ctx = ScoringContext::new(&injuries);
    let batch = build_projections(&fixture_records(), FeedSource::Cached, &ctx);

    let counts = batch.sport_counts();
    assert_eq!(counts[0], (Sport::Nba, 4));
    assert_eq!(
        counts[1..],
        [(Sport::Nfl, 1), (Sport::Golf, 1), (Sport::Other, 1)]
    );
}

#[test]
fn normalize_reports_why_a_record_was_rejected() {
    let injuries = InjuryTable::builtin();
    let ctx = ScoringContext::new(&injuries);

    let missing_line = RawRecord {
        id: "a".to_string(),
        name: Some("Some Player".to_string()),
        ..RawRecord::default()
    };
    assert_eq!(
        normalize_record(&missing_line, &ctx),
        Err(RecordError::MissingLine { id: "a".to_string() })
    );

    let zero_line = RawRecord {
        line_score: Some(0.0),
        ..missing_line.clone()
    };
    assert!(matches!(
        normalize_record(&zero_line, &ctx),
        Err(RecordError::InvalidLine { .. })
    ));

    let nameless = RawRecord {
        id: "b".to_string(),
        name: Some("   ".to_string()),
        line_score: Some(10.5),
        ..RawRecord::default()
    };
    assert_eq!(
        normalize_record(&nameless, &ctx),
        Err(RecordError::MissingName { id: "b".to_string() })
    );

    let no_league = RawRecord {
        id: "c".to_string(),
        name: Some("Unlisted Athlete".to_string()),
        line_score: Some(5.5),
        ..RawRecord::default()
    };
    let projection = normalize_record(&no_league, &ctx).expect("valid record");
    assert_eq!(projection.league_id, "default");
    assert_eq!(projection.stat_type, "Unknown");
    assert_eq!(projection.sport.sport, Sport::Other);
}

#[test]
fn records_without_an_id_are_skipped() {
    let injuries = InjuryTable::builtin();
    let ctx = ScoringContext::new(&injuries);

    let blank_id = RawRecord {
        id: "  ".to_string(),
        name: Some("Jalen Brunson".to_string()),
        line_score: Some(24.5),
        ..RawRecord::default()
    };
    assert_eq!(normalize_record(&blank_id, &ctx), Err(RecordError::MissingId));

    let mut records = fixture_records();
    records.push(blank_id.clone());
    records.push(RawRecord {
        id: String::new(),
        ..blank_id
    });
    let batch = build_projections(&records, FeedSource::Live, &ctx);
    assert_eq!(batch.source, FeedSource::Live);
    assert_eq!(batch.projections.len(), 7);
    assert_eq!(batch.skipped, 3);
    assert!(batch.projections.iter().all(|p| !p.id.trim().is_empty()));
}

#[test]
fn empty_feed_falls_back_to_sample_set() {
    let injuries = InjuryTable::builtin();
    let ctx = ScoringContext::new(&injuries);
    let batch = build_projections(&[], FeedSource::Live, &ctx);

    assert_eq!(batch.source, FeedSource::Sample);
    assert_eq!(batch.projections.len(), 10);
    assert_eq!(batch.skipped, 0);

    let filters = Filters {
        recommended_only: false,
        ..Filters::default()
    };
    let top = selector::select(&batch.projections, &filters, 6);
    assert_eq!(top.len(), 6);
}

#[test]
fn all_malformed_feed_falls_back_and_counts_skips() {
    let injuries = InjuryTable::builtin();
    let ctx = ScoringContext::new(&injuries);
    let records: Vec<RawRecord> = (0..3)
        .map(|i| RawRecord {
            id: format!("bad-{i}"),
            name: Some("Broken Record".to_string()),
            league_id: Some("42".to_string()),
            ..RawRecord::default()
        })
        .collect();

    let batch = build_projections(&records, FeedSource::Live, &ctx);
    assert_eq!(batch.source, FeedSource::Sample);
    assert_eq!(batch.skipped, 3);
    assert_eq!(batch.projections.len(), 10);
    assert!(batch.league_ids.contains("42"));
}

#[test]
fn sportsbook_probability_replaces_base_rate() {
    let injuries = InjuryTable::builtin();
    let mut book = SportsbookBook::default();
    book.insert("LeBron James", "Points", 25.5, 0.60);
    let ctx = ScoringContext {
        sportsbook: Some(&book),
        ..ScoringContext::new(&injuries)
    };

    let batch = sample_batch(&ctx);
    let lebron = batch
        .projections
        .iter()
        .find(|p| p.subject_name == "LeBron James")
        .expect("sample has LeBron");
    assert_eq!(lebron.sportsbook_prob, Some(0.60));
    assert!((lebron.hit_rate - 0.60 * 0.98).abs() < 1e-9);
    assert_eq!(lebron.recommendation, Side::More);
}

#[test]
fn jittered_scores_stay_in_bounds() {
    let injuries = InjuryTable::builtin();
    let ctx = ScoringContext {
        jitter: true,
        ..ScoringContext::new(&injuries)
    };
    for _ in 0..20 {
        let batch = sample_batch(&ctx);
        for p in &batch.projections {
            assert!((0.25..=0.75).contains(&p.hit_rate));
            assert_eq!(p.recommendation == Side::More, p.hit_rate > 0.5415);
        }
    }
}
