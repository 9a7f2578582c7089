use std::collections::BTreeMap;

use thiserror::Error;

use crate::entry::Entry;

#[derive(Debug, Clone, PartialEq)]
pub struct PayoutTable {
    legs: u8,
    // min correct -> multiplier
    tiers: BTreeMap<u8, f64>,
}

impl PayoutTable {
    pub fn new(legs: u8, tiers: impl IntoIterator<Item = (u8, f64)>) -> Self {
        Self {
            legs,
            tiers: tiers.into_iter().filter(|(k, _)| *k <= legs).collect(),
        }
    }

    pub fn six_leg_flex() -> Self {
        Self::new(6, [(4, 0.4), (5, 2.0), (6, 25.0)])
    }

    /// Only 6 legs has a table.
    pub fn flex(legs: u8) -> Option<Self> {
        match legs {
            6 => Some(Self::six_leg_flex()),
            _ => None,
        }
    }

    pub fn legs(&self) -> u8 {
        self.legs
    }

    pub fn tiers(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        self.tiers.iter().map(|(k, m)| (*k, *m))
    }

    /// Multiplier paid for exactly `correct` hits: the highest tier reached,
    /// never the sum of tiers.
    pub fn multiplier_for(&self, correct: u8) -> f64 {
        self.tiers
            .range(..=correct)
            .next_back()
            .map(|(_, m)| *m)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierOutcome {
    pub min_correct: u8,
    pub multiplier: f64,
    /// Probability that this is the highest tier reached.
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvSummary {
    pub avg_hit_rate: f64,
    pub amount: f64,
    pub tiers: Vec<TierOutcome>,
    pub ev: f64,
    pub roi: f64,
}

impl EvSummary {
    pub fn is_positive(&self) -> bool {
        self.roi > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvError {
    #[error("entry has {have} of {need} picks")]
    Incomplete { have: usize, need: usize },
    #[error("no payout table for {legs} legs")]
    NoPayoutTable { legs: u8 },
}

pub fn evaluate(entry: &Entry, table: &PayoutTable) -> Result<EvSummary, EvError> {
    if entry.num_legs() != table.legs() {
        return Err(EvError::NoPayoutTable {
            legs: entry.num_legs(),
        });
    }
    let need = table.legs() as usize;
    let Some(p) = entry.average_hit_rate().filter(|_| entry.len() == need) else {
        return Err(EvError::Incomplete {
            have: entry.len(),
            need,
        });
    };
    Ok(evaluate_rate(p, table, entry.amount()))
}

/// Treats every leg as an independent trial hitting with probability `p`.
pub fn evaluate_rate(p: f64, table: &PayoutTable, amount: f64) -> EvSummary {
    let n = table.legs();
    let tier_keys: Vec<(u8, f64)> = table.tiers().collect();
    let mut tiers = Vec::with_capacity(tier_keys.len());
    for (idx, (min_correct, multiplier)) in tier_keys.iter().enumerate() {
        let upper = tier_keys
            .get(idx + 1)
            .map(|(next, _)| next - 1)
            .unwrap_or(n);
        let probability: f64 = (*min_correct..=upper).map(|k| binomial_pmf(n, k, p)).sum();
        tiers.push(TierOutcome {
            min_correct: *min_correct,
            multiplier: *multiplier,
            probability,
        });
    }

    let ev: f64 = tiers
        .iter()
        .map(|t| t.probability * amount * t.multiplier)
        .sum();
    let roi = (ev - amount) / amount * 100.0;
    EvSummary {
        avg_hit_rate: p,
        amount,
        tiers,
        ev,
        roi,
    }
}

pub fn binomial_pmf(n: u8, k: u8, p: f64) -> f64 {
    if k > n {
        return 0.0;
    }
    let k_i = k as i32;
    let rest = (n - k) as i32;
    binomial_coefficient(n, k) * p.powi(k_i) * (1.0 - p).powi(rest)
}

fn binomial_coefficient(n: u8, k: u8) -> f64 {
    let k = k.min(n - k);
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}
