use crate::config::SessionSettings;
use crate::entry::{Entry, EntryError, Pick};
use crate::ev::{self, EvSummary, PayoutTable};
use crate::hit_rate::Side;
use crate::pipeline::Projection;
use crate::selector::{self, Filters};
use crate::sports::Sport;

#[derive(Debug, Clone)]
pub struct Session {
    entry: Entry,
    pub filters: Filters,
    pub auto_select: bool,
    // Set while the entry is fresh; the first auto-select or manual add consumes it.
    auto_armed: bool,
}

impl Session {
    pub fn new(settings: &SessionSettings) -> Self {
        Self {
            entry: Entry::new(settings.num_legs, settings.entry_amount),
            filters: Filters {
                sports: settings.sports.clone(),
                recommended_only: settings.recommended_only,
                players_only: settings.players_only,
            },
            auto_select: settings.auto_select,
            auto_armed: true,
        }
    }

    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    pub fn num_legs(&self) -> u8 {
        self.entry.num_legs()
    }

    pub fn set_num_legs(&mut self, num_legs: u8) {
        self.entry.set_num_legs(num_legs);
    }

    pub fn set_amount(&mut self, amount: f64) {
        self.entry.set_amount(amount);
    }

    pub fn toggle_sport(&mut self, sport: Sport) {
        if !self.filters.sports.remove(&sport) {
            self.filters.sports.insert(sport);
        }
    }

    pub fn candidates<'a>(&self, projections: &'a [Projection]) -> Vec<&'a Projection> {
        selector::ranked(projections, &self.filters)
    }

    pub fn add_pick(&mut self, projection: &Projection, side: Side) -> Result<(), EntryError> {
        self.entry.add(Pick::from_projection(projection, side))?;
        self.auto_armed = false;
        Ok(())
    }

    pub fn remove_pick(&mut self, index: usize) -> Option<Pick> {
        self.entry.remove(index)
    }

    pub fn clear_entry(&mut self) {
        self.entry.clear();
        self.auto_armed = true;
    }

    /// Fills an empty, armed entry completely or not at all. Returns the
    /// number of picks added.
    pub fn maybe_auto_select(&mut self, projections: &[Projection]) -> usize {
        if !self.auto_select || !self.auto_armed || !self.entry.is_empty() {
            return 0;
        }
        let legs = self.entry.num_legs() as usize;
        let best = selector::select(projections, &self.filters, legs);
        if best.len() < legs {
            return 0;
        }
        let mut filled = self.entry.clone();
        for projection in best {
            if filled.add(Pick::recommended(projection)).is_err() {
                // Stays armed; a later batch may fill it cleanly.
                return 0;
            }
        }
        self.entry = filled;
        self.auto_armed = false;
        legs
    }

    pub fn summary(&self) -> Option<EvSummary> {
        let table = PayoutTable::flex(self.entry.num_legs())?;
        ev::evaluate(&self.entry, &table).ok()
    }
}
