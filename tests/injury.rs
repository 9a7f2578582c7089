use flex_terminal::injury::{InjuryRecord, InjuryStatus, InjuryTable, UNKNOWN_TEAM, resolve_injury};

#[test]
fn exact_name_resolves_to_table_entry() {
    let table = InjuryTable::builtin();
    let rec = resolve_injury("Devin Booker", &table);
    assert_eq!(rec.status, InjuryStatus::Out);
    assert_eq!(rec.injury.as_deref(), Some("Hip Strain"));
    assert_eq!(rec.team, "PHX");
}

#[test]
fn lookup_ignores_case_and_matches_both_directions() {
    let table = InjuryTable::builtin();
    assert_eq!(table.resolve("joel embiid").status, InjuryStatus::Out);
    assert_eq!(table.resolve("Embiid").status, InjuryStatus::Out);
    assert_eq!(table.resolve("Jalen Suggs Jr.").status, InjuryStatus::Questionable);
}

#[test]
fn unknown_players_are_active_with_unknown_team() {
    let table = InjuryTable::builtin();
    let rec = table.resolve("LeBron James");
    assert_eq!(rec.status, InjuryStatus::Active);
    assert_eq!(rec.team, UNKNOWN_TEAM);
    assert_eq!(rec.player, "LeBron James");
    assert!(rec.injury.is_none());
}

#[test]
fn short_fragments_match_loosely_and_first_entry_wins() {
    let table = InjuryTable::new(vec![
        InjuryRecord::new("Anthony Blackwell", InjuryStatus::Out, Some("Foot"), "CHA"),
        InjuryRecord::new("Anthony Black", InjuryStatus::Active, None, "ORL"),
    ]);
    let rec = table.resolve("Anthony Black");
    assert_eq!(rec.player, "Anthony Blackwell");
    assert_eq!(rec.status, InjuryStatus::Out);
}

#[test]
fn loads_table_from_json() {
    let raw = r#"[
        {"player": "Ja Morant", "status": "OUT", "injury": "Shoulder", "team": "MEM"},
        {"player": "Tyrese Haliburton", "status": "Questionable"},
        {"player": "Trae Young", "status": "Out"}
    ]"#;
    let table = InjuryTable::from_json(raw).expect("valid table");
    assert_eq!(table.len(), 3);
    assert_eq!(table.resolve("Ja Morant").status, InjuryStatus::Out);
    let hali = table.resolve("Tyrese Haliburton");
    assert_eq!(hali.status, InjuryStatus::Questionable);
    assert_eq!(hali.team, UNKNOWN_TEAM);
    assert_eq!(table.resolve("Trae Young").status, InjuryStatus::Out);

    assert!(InjuryTable::from_json("{not json").is_err());
}
