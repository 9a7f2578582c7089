use std::collections::HashMap;

use anyhow::{Context, Result};
use reqwest::header::USER_AGENT;
use serde::Deserialize;

use crate::http_client::http_client;
use crate::sports::Sport;

const PROP_MARKETS: &str =
    "player_points,player_rebounds,player_assists,player_points_rebounds_assists";

/// Lines closer than this are treated as the same number.
const LINE_EPSILON: f64 = 0.01;

#[derive(Debug, Clone)]
pub struct OddsConfig {
    pub api_key: Option<String>,
    pub regions: String,
}

#[derive(Debug, Deserialize)]
struct OddsEvent {
    #[serde(default)]
    bookmakers: Vec<OddsBookmaker>,
}

#[derive(Debug, Deserialize)]
struct OddsBookmaker {
    #[serde(default)]
    markets: Vec<OddsMarket>,
}

#[derive(Debug, Deserialize)]
struct OddsMarket {
    key: String,
    #[serde(default)]
    outcomes: Vec<OddsOutcome>,
}

#[derive(Debug, Deserialize)]
struct OddsOutcome {
    name: String,
    #[serde(default)]
    description: Option<String>,
    price: f64,
    #[serde(default)]
    point: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct OverQuote {
    line: f64,
    prob: f64,
}

/// Over-side implied probabilities per (player, stat) from sportsbook props.
#[derive(Debug, Clone, Default)]
pub struct SportsbookBook {
    quotes: HashMap<(String, String), Vec<OverQuote>>,
}

impl SportsbookBook {
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn insert(&mut self, player: &str, stat_type: &str, line: f64, prob: f64) {
        self.quotes
            .entry(book_key(player, stat_type))
            .or_default()
            .push(OverQuote { line, prob });
    }

    pub fn merge(&mut self, other: SportsbookBook) {
        for (key, quotes) in other.quotes {
            self.quotes.entry(key).or_default().extend(quotes);
        }
    }

    /// Median over-probability across books quoting the same line.
    pub fn over_prob(&self, player: &str, stat_type: &str, line: f64) -> Option<f64> {
        let quotes = self.quotes.get(&book_key(player, stat_type))?;
        let probs: Vec<f64> = quotes
            .iter()
            .filter(|q| (q.line - line).abs() < LINE_EPSILON)
            .map(|q| q.prob)
            .collect();
        median_f64(&probs)
    }
}

pub fn american_to_prob(odds: f64) -> f64 {
    if odds > 0.0 {
        100.0 / (odds + 100.0)
    } else {
        odds.abs() / (odds.abs() + 100.0)
    }
}

/// Maps The-Odds-API market keys to the stat labels used by the projection feed.
pub fn stat_type_for_market(key: &str) -> Option<&'static str> {
    match key {
        "player_points" => Some("Points"),
        "player_rebounds" => Some("Rebounds"),
        "player_assists" => Some("Assists"),
        "player_points_rebounds_assists" => Some("Pts+Rebs+Asts"),
        _ => None,
    }
}

pub fn parse_player_props_json(raw: &str) -> Result<SportsbookBook> {
    let trimmed = raw.trim();
    let mut book = SportsbookBook::default();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(book);
    }
    let events: Vec<OddsEvent> = serde_json::from_str(trimmed).context("invalid odds json")?;
    for event in events {
        for bookmaker in event.bookmakers {
            for market in bookmaker.markets {
                let Some(stat_type) = stat_type_for_market(&market.key) else {
                    continue;
                };
                for outcome in market.outcomes {
                    if !outcome.name.eq_ignore_ascii_case("over") {
                        continue;
                    }
                    let (Some(player), Some(line)) = (outcome.description.as_deref(), outcome.point)
                    else {
                        continue;
                    };
                    book.insert(player, stat_type, line, american_to_prob(outcome.price));
                }
            }
        }
    }
    Ok(book)
}

pub fn fetch_player_props(sport: Sport, cfg: &OddsConfig) -> Result<SportsbookBook> {
    let Some(api_key) = cfg.api_key.as_ref() else {
        return Ok(SportsbookBook::default());
    };
    let Some(sport_key) = sport.odds_api_key() else {
        return Ok(SportsbookBook::default());
    };

    let url = format!("https://api.the-odds-api.com/v4/sports/{sport_key}/odds");
    let client = http_client()?;
    let resp = client
        .get(&url)
        .query(&[
            ("apiKey", api_key.as_str()),
            ("regions", cfg.regions.as_str()),
            ("markets", PROP_MARKETS),
            ("oddsFormat", "american"),
        ])
        .header(USER_AGENT, "flex-terminal/0.1")
        .send()
        .context("odds request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading odds body")?;
    if !status.is_success() {
        let snippet = body
            .trim()
            .replace(['\n', '\r'], " ")
            .chars()
            .take(220)
            .collect::<String>();
        return Err(anyhow::anyhow!("odds http {}: {}", status, snippet));
    }
    parse_player_props_json(&body)
}

fn book_key(player: &str, stat_type: &str) -> (String, String) {
    (
        player.trim().to_lowercase(),
        stat_type.trim().to_lowercase(),
    )
}

fn median_f64(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
