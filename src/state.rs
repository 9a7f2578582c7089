use std::collections::{BTreeSet, VecDeque};

use crate::config::SessionSettings;
use crate::entry::{MAX_LEGS, MIN_LEGS};
use crate::pipeline::{Projection, ProjectionBatch};
use crate::session::Session;
use crate::sports::Sport;

/// Props shown in the list at once.
pub const VISIBLE_PROPS: usize = 15;
const MAX_LOGS: usize = 200;
const AMOUNT_STEP: f64 = 1.0;

pub struct AppState {
    pub session: Session,
    pub batch: Option<ProjectionBatch>,
    pub selected: usize,
    pub logs: VecDeque<String>,
    pub loading: bool,
    pub last_updated: Option<String>,
    pub help_overlay: bool,
}

#[derive(Debug, Clone)]
pub enum Delta {
    SetProjections(ProjectionBatch),
    Log(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCommand {
    /// Refetch now, quoting sportsbook lines for the session's sport filter.
    Refresh { sports: BTreeSet<Sport> },
}

impl AppState {
    pub fn new(settings: &SessionSettings) -> Self {
        Self {
            session: Session::new(settings),
            batch: None,
            selected: 0,
            logs: VecDeque::new(),
            loading: true,
            last_updated: None,
            help_overlay: false,
        }
    }

    pub fn projections(&self) -> &[Projection] {
        self.batch
            .as_ref()
            .map(|b| b.projections.as_slice())
            .unwrap_or(&[])
    }

    /// Filtered, ranked props currently on screen.
    pub fn visible_props(&self) -> Vec<&Projection> {
        let mut props = self.session.candidates(self.projections());
        props.truncate(VISIBLE_PROPS);
        props
    }

    pub fn filtered_count(&self) -> usize {
        self.session.candidates(self.projections()).len()
    }

    pub fn selected_projection(&self) -> Option<&Projection> {
        self.visible_props().get(self.selected).copied()
    }

    pub fn select_next(&mut self) {
        let total = self.visible_props().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % total;
    }

    pub fn select_prev(&mut self) {
        let total = self.visible_props().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        if self.selected == 0 {
            self.selected = total - 1;
        } else {
            self.selected -= 1;
        }
    }

    pub fn clamp_selection(&mut self) {
        let total = self.visible_props().len();
        if total == 0 {
            self.selected = 0;
        } else if self.selected >= total {
            self.selected = total - 1;
        }
    }

    /// Adds the highlighted prop on its recommended side, or the other side
    /// when `opposite` is set.
    pub fn add_selected(&mut self, opposite: bool) {
        let Some(projection) = self.selected_projection().cloned() else {
            self.push_log("[INFO] No prop selected");
            return;
        };
        let side = if opposite {
            projection.recommendation.opposite()
        } else {
            projection.recommendation
        };
        match self.session.add_pick(&projection, side) {
            Ok(()) => self.push_log(format!(
                "[INFO] Added {} {} {} {}",
                projection.subject_name,
                side,
                projection.stat_type,
                projection.line
            )),
            Err(err) => self.push_log(format!("[WARN] {err}")),
        }
    }

    pub fn remove_last_pick(&mut self) {
        let len = self.session.entry().len();
        if len == 0 {
            self.push_log("[INFO] Entry is empty");
            return;
        }
        if let Some(pick) = self.session.remove_pick(len - 1) {
            self.push_log(format!("[INFO] Removed {}", pick.player));
        }
    }

    pub fn clear_entry(&mut self) {
        self.session.clear_entry();
        self.push_log("[INFO] Entry cleared");
        self.run_auto_select();
    }

    /// Steps the sport filter: all sports, then each sport in the batch alone.
    pub fn cycle_sport_filter(&mut self) {
        let options = self.batch.as_ref().map(|b| b.sports()).unwrap_or_default();
        let filters = &mut self.session.filters;
        let next = match filters.sports.len() {
            0 => options.first().copied(),
            1 => {
                let current = filters.sports.iter().next().copied();
                match current.and_then(|c| options.iter().position(|o| *o == c)) {
                    Some(idx) => options.get(idx + 1).copied(),
                    None => options.first().copied(),
                }
            }
            _ => None,
        };
        filters.sports.clear();
        if let Some(sport) = next {
            filters.sports.insert(sport);
        }
        self.selected = 0;
        self.push_log(format!("[INFO] Sports: {}", self.sport_filter_label()));
        self.run_auto_select();
    }

    pub fn sport_filter_label(&self) -> String {
        let sports = &self.session.filters.sports;
        if sports.is_empty() {
            return "All".to_string();
        }
        sports
            .iter()
            .map(|s| s.badge())
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn toggle_recommended_only(&mut self) {
        let filters = &mut self.session.filters;
        filters.recommended_only = !filters.recommended_only;
        self.clamp_selection();
        self.run_auto_select();
    }

    pub fn toggle_players_only(&mut self) {
        let filters = &mut self.session.filters;
        filters.players_only = !filters.players_only;
        self.clamp_selection();
        self.run_auto_select();
    }

    pub fn toggle_auto_select(&mut self) {
        self.session.auto_select = !self.session.auto_select;
        self.run_auto_select();
    }

    pub fn adjust_amount(&mut self, steps: i32) {
        let amount = self.session.entry().amount() + AMOUNT_STEP * steps as f64;
        self.session.set_amount(amount);
    }

    /// 6 → 5 → … → 2 → 6.
    pub fn cycle_legs(&mut self) {
        let legs = self.session.num_legs();
        let next = if legs <= MIN_LEGS { MAX_LEGS } else { legs - 1 };
        self.session.set_num_legs(next);
        self.push_log(format!("[INFO] Legs: {next}"));
    }

    pub fn run_auto_select(&mut self) {
        let added = match &self.batch {
            Some(batch) => self.session.maybe_auto_select(&batch.projections),
            None => 0,
        };
        if added > 0 {
            self.push_log(format!("[INFO] Auto-selected {added} picks"));
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetProjections(batch) => {
            state.push_log(format!(
                "[INFO] Loaded {} props ({}, {} skipped)",
                batch.projections.len(),
                batch.source.label(),
                batch.skipped
            ));
            state.batch = Some(batch);
            state.loading = false;
            state.last_updated = Some(chrono::Local::now().format("%I:%M:%S %p").to_string());
            state.clamp_selection();
            state.run_auto_select();
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
