use crate::feed::RawRecord;

const NBA_LEAGUE_ID: &str = "4";

// (player, stat, line, team)
const SAMPLE_PROPS: &[(&str, &str, f64, &str)] = &[
    ("Dillon Brooks", "Points", 23.5, "PHX"),
    ("Desmond Bane", "Points", 18.5, "ORL"),
    ("Anthony Black", "Points", 16.5, "ORL"),
    ("Cade Cunningham", "Points", 25.5, "DET"),
    ("Kevin Durant", "Points", 24.5, "HOU"),
    ("Karl-Anthony Towns", "PRA", 30.5, "NYK"),
    ("LeBron James", "Points", 25.5, "LAL"),
    ("Stephen Curry", "Points", 26.5, "GSW"),
    ("Luka Doncic", "PRA", 31.5, "DAL"),
    ("Shai Gilgeous-Alexander", "PRA", 32.5, "OKC"),
];

/// Offline dataset used whenever the live feed yields nothing.
pub fn sample_records() -> Vec<RawRecord> {
    SAMPLE_PROPS
        .iter()
        .enumerate()
        .map(|(idx, (player, stat, line, team))| RawRecord {
            id: format!("sample-{}", idx + 1),
            name: Some((*player).to_string()),
            league_id: Some(NBA_LEAGUE_ID.to_string()),
            stat_type: Some((*stat).to_string()),
            line_score: Some(*line),
            start_time: Some("Today".to_string()),
            team: Some((*team).to_string()),
            ..RawRecord::default()
        })
        .collect()
}
