use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::http_cache::{CachedBody, fetch_json_cached};
use crate::http_client::{BROWSER_USER_AGENT, http_client};

pub const DEFAULT_FEED_URL: &str = "https://api.prizepicks.com/projections";

const FEED_HEADERS: &[(&str, &str)] = &[
    ("User-Agent", BROWSER_USER_AGENT),
    ("Referer", "https://app.prizepicks.com/"),
    ("Origin", "https://app.prizepicks.com"),
    ("Sec-Fetch-Dest", "empty"),
    ("Sec-Fetch-Mode", "cors"),
    ("Sec-Fetch-Site", "same-site"),
];

/// One projection as it arrives from the feed. Every field the feed may omit
/// is optional; the pipeline decides what is required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub display_name: Option<String>,
    pub league_id: Option<String>,
    pub stat_type: Option<String>,
    pub stat_display_name: Option<String>,
    pub line_score: Option<f64>,
    pub start_time: Option<String>,
    pub game_id: Option<String>,
    pub status: Option<String>,
    pub is_live: bool,
    pub team: Option<String>,
}

impl RawRecord {
    /// First non-blank of `name`, `description`, `display_name`.
    pub fn subject_name(&self) -> Option<&str> {
        [&self.name, &self.description, &self.display_name]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .map(str::trim)
            .find(|v| !v.is_empty())
    }

    pub fn stat_label(&self) -> &str {
        [&self.stat_type, &self.stat_display_name]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .map(str::trim)
            .find(|v| !v.is_empty())
            .unwrap_or("Unknown")
    }
}

pub fn fetch_projection_feed(url: &str, ttl: Duration) -> Result<(Vec<RawRecord>, CachedBody)> {
    let client = http_client()?;
    let cached = fetch_json_cached(client, url, FEED_HEADERS, ttl).context("feed request failed")?;
    let records = parse_projections_json(&cached.body)?;
    Ok((records, cached))
}

/// Parses the `{ "data": [ { id, attributes, relationships } ] }` document.
/// Items that are not objects are ignored; missing fields stay `None`.
pub fn parse_projections_json(raw: &str) -> Result<Vec<RawRecord>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid projections json")?;
    let Some(items) = root.get("data").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };
    Ok(items.iter().filter_map(parse_item).collect())
}

fn parse_item(item: &Value) -> Option<RawRecord> {
    let obj = item.as_object()?;
    let attrs = obj.get("attributes").unwrap_or(&Value::Null);
    let league_id = obj
        .get("relationships")
        .and_then(|r| r.get("league"))
        .and_then(|l| l.get("data"))
        .and_then(|d| d.get("id"))
        .and_then(scalar_to_string);

    Some(RawRecord {
        id: obj.get("id").and_then(scalar_to_string).unwrap_or_default(),
        name: pick_string(attrs, "name"),
        description: pick_string(attrs, "description"),
        display_name: pick_string(attrs, "display_name"),
        league_id,
        stat_type: pick_string(attrs, "stat_type"),
        stat_display_name: pick_string(attrs, "stat_display_name"),
        line_score: attrs.get("line_score").and_then(number_or_numeric_string),
        start_time: pick_string(attrs, "start_time"),
        game_id: attrs.get("game_id").and_then(scalar_to_string),
        status: pick_string(attrs, "status"),
        is_live: attrs
            .get("is_live")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        team: pick_string(attrs, "team"),
    })
}

fn pick_string(v: &Value, key: &str) -> Option<String> {
    v.get(key)
        .and_then(Value::as_str)
        .map(|s| s.to_string())
}

fn scalar_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number_or_numeric_string(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
