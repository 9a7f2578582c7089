use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::time::Duration;

use flex_terminal::config::{AppConfig, SessionSettings};
use flex_terminal::feed::DEFAULT_FEED_URL;
use flex_terminal::sports::Sport;

fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    AppConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn defaults_without_environment() {
    let cfg = config_from(&[]);
    assert_eq!(cfg.session, SessionSettings::default());
    assert_eq!(cfg.session.num_legs, 6);
    assert_eq!(cfg.session.entry_amount, 10.0);
    assert_eq!(cfg.session.sports, BTreeSet::from([Sport::Nba]));
    assert_eq!(cfg.feed_url, DEFAULT_FEED_URL);
    assert_eq!(cfg.feed_ttl, Duration::from_secs(300));
    assert_eq!(cfg.feed_poll, Duration::from_secs(300));
    assert!(cfg.odds.api_key.is_none());
    assert_eq!(cfg.odds.regions, "us");
    assert!(!cfg.jitter);
}

#[test]
fn numbers_are_clamped_into_range() {
    let cfg = config_from(&[
        ("FLEX_LEGS", "9"),
        ("ENTRY_AMOUNT", "0.25"),
        ("FEED_TTL_SECS", "5"),
        ("FEED_POLL_SECS", "10"),
    ]);
    assert_eq!(cfg.session.num_legs, 6);
    assert_eq!(cfg.session.entry_amount, 1.0);
    assert_eq!(cfg.feed_ttl, Duration::from_secs(30));
    assert_eq!(cfg.feed_poll, Duration::from_secs(60));

    let cfg = config_from(&[("FLEX_LEGS", "1"), ("ENTRY_AMOUNT", "250")]);
    assert_eq!(cfg.session.num_legs, 2);
    assert_eq!(cfg.session.entry_amount, 100.0);
}

#[test]
fn unparseable_values_fall_back() {
    let cfg = config_from(&[("FLEX_LEGS", "six"), ("ENTRY_AMOUNT", "lots"), ("FEED_URL", "  ")]);
    assert_eq!(cfg.session.num_legs, 6);
    assert_eq!(cfg.session.entry_amount, 10.0);
    assert_eq!(cfg.feed_url, DEFAULT_FEED_URL);
}

#[test]
fn flags_and_sports_parse() {
    let cfg = config_from(&[
        ("AUTO_SELECT", "off"),
        ("RECOMMENDED_ONLY", "0"),
        ("PLAYERS_ONLY", "yes"),
        ("HIT_RATE_JITTER", "1"),
        ("SPORTS", "nba, NFL;Golf,curling"),
        ("INJURY_TABLE_PATH", "/tmp/injuries.json"),
        ("ODDS_API_KEY", "abc"),
        ("ODDS_REGIONS", "US,EU"),
    ]);
    assert!(!cfg.session.auto_select);
    assert!(!cfg.session.recommended_only);
    assert!(cfg.session.players_only);
    assert!(cfg.jitter);
    assert_eq!(
        cfg.session.sports,
        BTreeSet::from([Sport::Nba, Sport::Nfl, Sport::Golf])
    );
    assert_eq!(cfg.injury_table_path, Some(PathBuf::from("/tmp/injuries.json")));
    assert_eq!(cfg.odds.api_key.as_deref(), Some("abc"));
    assert_eq!(cfg.odds.regions, "us,eu");
}

#[test]
fn all_sports_means_no_filter() {
    let cfg = config_from(&[("SPORTS", "ALL")]);
    assert!(cfg.session.sports.is_empty());
}
