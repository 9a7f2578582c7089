use thiserror::Error;

use crate::hit_rate::Side;
use crate::injury::InjuryStatus;
use crate::pipeline::Projection;
use crate::sports::SportInfo;

pub const MIN_LEGS: u8 = 2;
pub const MAX_LEGS: u8 = 6;
pub const MIN_AMOUNT: f64 = 1.0;
pub const MAX_AMOUNT: f64 = 100.0;

/// A projection committed to an entry on a chosen side.
#[derive(Debug, Clone, PartialEq)]
pub struct Pick {
    pub projection_id: String,
    pub player: String,
    pub sport: SportInfo,
    pub stat_type: String,
    pub line: f64,
    pub side: Side,
    pub hit_rate: f64,
    pub injury: InjuryStatus,
    pub team: String,
}

impl Pick {
    pub fn from_projection(projection: &Projection, side: Side) -> Self {
        Self {
            projection_id: projection.id.clone(),
            player: projection.subject_name.clone(),
            sport: projection.sport,
            stat_type: projection.stat_type.clone(),
            line: projection.line,
            side,
            hit_rate: projection.hit_rate,
            injury: projection.injury.status,
            team: projection.team.clone(),
        }
    }

    /// Takes the model's recommended side.
    pub fn recommended(projection: &Projection) -> Self {
        Self::from_projection(projection, projection.recommendation)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntryError {
    #[error("Max {max} picks")]
    Full { max: u8 },
    #[error("{player} is already in the entry")]
    Duplicate { player: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    picks: Vec<Pick>,
    num_legs: u8,
    amount: f64,
}

impl Entry {
    pub fn new(num_legs: u8, amount: f64) -> Self {
        Self {
            picks: Vec::new(),
            num_legs: clamp_legs(num_legs),
            amount: clamp_amount(amount),
        }
    }

    pub fn picks(&self) -> &[Pick] {
        &self.picks
    }

    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    pub fn num_legs(&self) -> u8 {
        self.num_legs
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn set_amount(&mut self, amount: f64) {
        self.amount = clamp_amount(amount);
    }

    /// Changes the leg count. Picks beyond the new size are dropped from the end.
    pub fn set_num_legs(&mut self, num_legs: u8) {
        self.num_legs = clamp_legs(num_legs);
        self.picks.truncate(self.num_legs as usize);
    }

    pub fn is_full(&self) -> bool {
        self.picks.len() >= self.num_legs as usize
    }

    pub fn is_complete(&self) -> bool {
        self.picks.len() == self.num_legs as usize
    }

    pub fn contains(&self, projection_id: &str) -> bool {
        self.picks.iter().any(|p| p.projection_id == projection_id)
    }

    /// Appends a pick. A full entry or a prop already present is rejected and
    /// the entry is left as it was.
    pub fn add(&mut self, pick: Pick) -> Result<(), EntryError> {
        if self.is_full() {
            return Err(EntryError::Full { max: self.num_legs });
        }
        if self.contains(&pick.projection_id) {
            return Err(EntryError::Duplicate { player: pick.player });
        }
        self.picks.push(pick);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Option<Pick> {
        if index < self.picks.len() {
            Some(self.picks.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.picks.clear();
    }

    pub fn average_hit_rate(&self) -> Option<f64> {
        if self.picks.is_empty() {
            return None;
        }
        let sum: f64 = self.picks.iter().map(|p| p.hit_rate).sum();
        Some(sum / self.picks.len() as f64)
    }
}

pub fn clamp_legs(num_legs: u8) -> u8 {
    num_legs.clamp(MIN_LEGS, MAX_LEGS)
}

pub fn clamp_amount(amount: f64) -> f64 {
    if !amount.is_finite() {
        return MIN_AMOUNT;
    }
    amount.clamp(MIN_AMOUNT, MAX_AMOUNT)
}
