use std::collections::BTreeSet;

use crate::hit_rate::BREAK_EVEN_6_LEG;
use crate::pipeline::Projection;
use crate::sports::Sport;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    /// Empty means every sport passes.
    pub sports: BTreeSet<Sport>,
    pub recommended_only: bool,
    pub players_only: bool,
}

impl Filters {
    pub fn accepts(&self, projection: &Projection) -> bool {
        if self.players_only && !projection.is_player {
            return false;
        }
        if !self.sports.is_empty() && !self.sports.contains(&projection.sport.sport) {
            return false;
        }
        if self.recommended_only && projection.hit_rate <= BREAK_EVEN_6_LEG {
            return false;
        }
        true
    }
}

/// Filters, then orders by hit rate (highest first, ties in feed order) and
/// keeps at most `limit` projections.
pub fn select<'a>(projections: &'a [Projection], filters: &Filters, limit: usize) -> Vec<&'a Projection> {
    let mut out: Vec<&Projection> = projections.iter().filter(|p| filters.accepts(p)).collect();
    // `sort_by` is stable, so equal hit rates keep their feed order.
    out.sort_by(|a, b| b.hit_rate.total_cmp(&a.hit_rate));
    out.truncate(limit);
    out
}

/// Every projection passing the filters, best first.
pub fn ranked<'a>(projections: &'a [Projection], filters: &Filters) -> Vec<&'a Projection> {
    select(projections, filters, usize::MAX)
}
