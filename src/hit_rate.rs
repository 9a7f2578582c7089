use std::fmt;

use rand::Rng;

use crate::injury::InjuryStatus;
use crate::sports::Sport;

/// Per-leg hit rate at which a 6-leg flex entry breaks even.
pub const BREAK_EVEN_6_LEG: f64 = 0.5415;
pub const HIT_RATE_FLOOR: f64 = 0.25;
pub const HIT_RATE_CAP: f64 = 0.75;
pub const DEFAULT_BASE_RATE: f64 = 0.51;
pub const OPPORTUNITY_BOOST: f64 = 1.10;

const HIGH_CONFIDENCE_MORE: f64 = 0.58;
const HIGH_CONFIDENCE_LESS: f64 = 0.50;

const JITTER_LOW: f64 = 0.97;
const JITTER_HIGH: f64 = 1.03;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    More,
    Less,
}

impl Side {
    pub fn label(self) -> &'static str {
        match self {
            Side::More => "MORE",
            Side::Less => "LESS",
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::More => Side::Less,
            Side::Less => Side::More,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Confidence {
    High,
    Medium,
}

impl Confidence {
    pub fn label(self) -> &'static str {
        match self {
            Confidence::High => "High",
            Confidence::Medium => "Medium",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRateInputs {
    pub line: f64,
    pub sport: Sport,
    pub injury: InjuryStatus,
    pub opportunity: bool,
    /// Sportsbook implied probability; replaces the sport base rate when present.
    pub sportsbook_prob: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRateScore {
    pub hit_rate: f64,
    pub recommendation: Side,
    pub confidence: Confidence,
}

// Fragments match the feed name case-sensitively.
pub struct Opportunity {
    pub fragment: &'static str,
    pub reason: &'static str,
}

pub const OPPORTUNITIES: &[Opportunity] = &[
    Opportunity {
        fragment: "Brooks",
        reason: "Booker OUT",
    },
    Opportunity {
        fragment: "Bane",
        reason: "Wagner OUT, Suggs Questionable",
    },
    Opportunity {
        fragment: "Black",
        reason: "Wagner OUT, Suggs Questionable",
    },
];

pub fn opportunity_for(player_name: &str) -> Option<&'static Opportunity> {
    OPPORTUNITIES
        .iter()
        .find(|o| player_name.contains(o.fragment))
}

pub fn base_rate(sport: Sport) -> f64 {
    match sport {
        Sport::Nba => 0.52,
        Sport::Nfl => 0.51,
        Sport::Mlb => 0.53,
        Sport::Nhl => 0.51,
        Sport::Soccer => 0.50,
        Sport::Golf => 0.48,
        Sport::Mma => 0.49,
        Sport::Esports => 0.52,
        _ => DEFAULT_BASE_RATE,
    }
}

pub fn line_factor(line: f64) -> f64 {
    if line > 50.0 {
        0.95
    } else if line > 20.0 {
        0.98
    } else if line > 10.0 {
        1.00
    } else {
        1.02
    }
}

pub fn injury_factor(status: InjuryStatus) -> f64 {
    match status {
        InjuryStatus::Out => 0.30,
        InjuryStatus::Questionable => 0.80,
        InjuryStatus::Probable => 0.95,
        InjuryStatus::Active => 1.00,
    }
}

pub fn score(inputs: &HitRateInputs) -> HitRateScore {
    classify_rate(score_unclamped(inputs))
}

/// Scores with a ±3% multiplicative jitter before clamping. Output varies
/// between calls; use [`score`] wherever exact values matter.
pub fn score_with_jitter<R: Rng + ?Sized>(inputs: &HitRateInputs, rng: &mut R) -> HitRateScore {
    let base = score_unclamped(inputs);
    classify_rate(base * rng.gen_range(JITTER_LOW..=JITTER_HIGH))
}

fn score_unclamped(inputs: &HitRateInputs) -> f64 {
    let base = inputs
        .sportsbook_prob
        .filter(|p| p.is_finite() && *p > 0.0)
        .unwrap_or_else(|| base_rate(inputs.sport));
    let opportunity = if inputs.opportunity {
        OPPORTUNITY_BOOST
    } else {
        1.0
    };
    base * line_factor(inputs.line) * injury_factor(inputs.injury) * opportunity
}

pub fn classify_rate(raw: f64) -> HitRateScore {
    let hit_rate = clamp(raw, HIT_RATE_FLOOR, HIT_RATE_CAP);
    let recommendation = if hit_rate > BREAK_EVEN_6_LEG {
        Side::More
    } else {
        Side::Less
    };
    let high = match recommendation {
        Side::More => hit_rate > HIGH_CONFIDENCE_MORE,
        Side::Less => hit_rate < HIGH_CONFIDENCE_LESS,
    };
    HitRateScore {
        hit_rate,
        recommendation,
        confidence: if high {
            Confidence::High
        } else {
            Confidence::Medium
        },
    }
}

fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    if v.is_nan() {
        return lo;
    }
    v.max(lo).min(hi)
}
