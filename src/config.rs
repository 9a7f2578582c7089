use std::collections::BTreeSet;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::entry::{MAX_LEGS, clamp_amount, clamp_legs};
use crate::feed::DEFAULT_FEED_URL;
use crate::odds::OddsConfig;
use crate::sports::Sport;

const DEFAULT_AMOUNT: f64 = 10.0;
const DEFAULT_FEED_TTL_SECS: u64 = 300;
const DEFAULT_FEED_POLL_SECS: u64 = 300;

/// User-facing knobs of one session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub num_legs: u8,
    pub entry_amount: f64,
    pub auto_select: bool,
    pub recommended_only: bool,
    pub players_only: bool,
    pub sports: BTreeSet<Sport>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            num_legs: MAX_LEGS,
            entry_amount: DEFAULT_AMOUNT,
            auto_select: true,
            recommended_only: true,
            players_only: false,
            sports: BTreeSet::from([Sport::Nba]),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub session: SessionSettings,
    pub feed_url: String,
    pub feed_ttl: Duration,
    pub feed_poll: Duration,
    pub injury_table_path: Option<PathBuf>,
    pub odds: OddsConfig,
    pub jitter: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unparseable values fall back to
    /// defaults and numbers are clamped into range.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let flag = |key: &str, default: bool| get(key).map(|v| parse_bool(&v)).unwrap_or(default);

        let defaults = SessionSettings::default();
        let num_legs = get("FLEX_LEGS")
            .and_then(|v| v.parse::<u8>().ok())
            .map(clamp_legs)
            .unwrap_or(defaults.num_legs);
        let entry_amount = get("ENTRY_AMOUNT")
            .and_then(|v| v.parse::<f64>().ok())
            .map(clamp_amount)
            .unwrap_or(defaults.entry_amount);
        let sports = match get("SPORTS") {
            Some(raw) => parse_sports(&raw),
            None => defaults.sports.clone(),
        };

        let session = SessionSettings {
            num_legs,
            entry_amount,
            auto_select: flag("AUTO_SELECT", defaults.auto_select),
            recommended_only: flag("RECOMMENDED_ONLY", defaults.recommended_only),
            players_only: flag("PLAYERS_ONLY", defaults.players_only),
            sports,
        };

        let feed_ttl = get("FEED_TTL_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_FEED_TTL_SECS)
            .max(30);
        let feed_poll = get("FEED_POLL_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_FEED_POLL_SECS)
            .max(60);

        Self {
            session,
            feed_url: get("FEED_URL").unwrap_or_else(|| DEFAULT_FEED_URL.to_string()),
            feed_ttl: Duration::from_secs(feed_ttl),
            feed_poll: Duration::from_secs(feed_poll),
            injury_table_path: get("INJURY_TABLE_PATH").map(PathBuf::from),
            odds: OddsConfig {
                api_key: get("ODDS_API_KEY"),
                regions: get("ODDS_REGIONS")
                    .unwrap_or_else(|| "us".to_string())
                    .to_ascii_lowercase(),
            },
            jitter: flag("HIT_RATE_JITTER", false),
        }
    }
}

fn parse_bool(raw: &str) -> bool {
    let t = raw.trim().to_ascii_lowercase();
    !(t.is_empty() || t == "0" || t == "false" || t == "off" || t == "no")
}

/// Comma/semicolon separated sport names or badges. Unknown labels are dropped;
/// `all` (or nothing recognisable) means no sport filter.
fn parse_sports(raw: &str) -> BTreeSet<Sport> {
    if raw.trim().eq_ignore_ascii_case("all") {
        return BTreeSet::new();
    }
    raw.split([',', ';'])
        .filter_map(Sport::from_label)
        .collect()
}
