use flex_terminal::config::SessionSettings;
use flex_terminal::entry::EntryError;
use flex_terminal::hit_rate::Side;
use flex_terminal::injury::InjuryTable;
use flex_terminal::pipeline::{ProjectionBatch, ScoringContext, sample_batch};
use flex_terminal::session::Session;
use flex_terminal::state::{AppState, Delta, apply_delta};

fn sample() -> ProjectionBatch {
    let injuries = InjuryTable::builtin();
    sample_batch(&ScoringContext::new(&injuries))
}

fn open_settings() -> SessionSettings {
    SessionSettings {
        recommended_only: false,
        ..SessionSettings::default()
    }
}

#[test]
fn auto_select_fills_once_per_fresh_entry() {
    let batch = sample();
    let mut session = Session::new(&open_settings());

    assert_eq!(session.maybe_auto_select(&batch.projections), 6);
    assert!(session.entry().is_complete());
    let sides: Vec<Side> = session.entry().picks().iter().map(|p| p.side).collect();
    assert_eq!(
        sides,
        vec![Side::More, Side::More, Side::More, Side::Less, Side::Less, Side::Less]
    );

    session.remove_pick(5);
    assert_eq!(session.maybe_auto_select(&batch.projections), 0);
    assert_eq!(session.entry().len(), 5);
}

#[test]
fn auto_select_waits_for_enough_candidates() {
    let batch = sample();
    let mut session = Session::new(&SessionSettings::default());
    assert_eq!(session.maybe_auto_select(&batch.projections), 0);
    assert!(session.entry().is_empty());

    session.filters.recommended_only = false;
    assert_eq!(session.maybe_auto_select(&batch.projections), 6);
}

#[test]
fn clearing_rearms_auto_select() {
    let batch = sample();
    let mut session = Session::new(&open_settings());
    session.maybe_auto_select(&batch.projections);
    session.clear_entry();
    assert!(session.entry().is_empty());
    assert_eq!(session.maybe_auto_select(&batch.projections), 6);
}

#[test]
fn manual_pick_disarms_auto_select() {
    let batch = sample();
    let mut session = Session::new(&open_settings());
    session
        .add_pick(&batch.projections[6], Side::Less)
        .expect("room in entry");
    session.remove_pick(0);
    assert_eq!(session.maybe_auto_select(&batch.projections), 0);
}

#[test]
fn full_entry_rejects_more_picks_unchanged() {
    let batch = sample();
    let mut session = Session::new(&open_settings());
    session.maybe_auto_select(&batch.projections);
    let before = session.entry().clone();

    let err = session
        .add_pick(&batch.projections[9], Side::More)
        .expect_err("entry is full");
    assert_eq!(err, EntryError::Full { max: 6 });
    assert_eq!(err.to_string(), "Max 6 picks");
    assert_eq!(session.entry(), &before);
}

#[test]
fn auto_select_is_all_or_nothing() {
    let batch = sample();
    let mut clashing = batch.projections.clone();
    for projection in clashing.iter_mut() {
        projection.id = "same".to_string();
    }
    let mut session = Session::new(&open_settings());

    assert_eq!(session.maybe_auto_select(&clashing), 0);
    assert!(session.entry().is_empty());

    assert_eq!(session.maybe_auto_select(&batch.projections), 6);
    assert!(session.entry().is_complete());
}

#[test]
fn duplicate_pick_is_rejected() {
    let batch = sample();
    let mut session = Session::new(&SessionSettings {
        auto_select: false,
        ..open_settings()
    });
    session.add_pick(&batch.projections[0], Side::More).expect("first add");
    let err = session
        .add_pick(&batch.projections[0], Side::Less)
        .expect_err("same prop twice");
    assert!(matches!(err, EntryError::Duplicate { .. }));
    assert_eq!(session.entry().len(), 1);
}

#[test]
fn summary_appears_only_for_complete_six_leg_entry() {
    let batch = sample();
    let mut session = Session::new(&open_settings());
    assert!(session.summary().is_none());
    session.maybe_auto_select(&batch.projections);
    let summary = session.summary().expect("complete entry");
    assert_eq!(summary.tiers.len(), 3);

    session.set_num_legs(5);
    assert_eq!(session.entry().len(), 5);
    assert!(session.summary().is_none());
}

#[test]
fn sessions_are_independent() {
    let batch = sample();
    let mut a = Session::new(&open_settings());
    let b = Session::new(&open_settings());
    a.maybe_auto_select(&batch.projections);
    assert_eq!(a.entry().len(), 6);
    assert!(b.entry().is_empty());
}

#[test]
fn app_state_logs_capacity_warning() {
    let mut state = AppState::new(&open_settings());
    apply_delta(&mut state, Delta::SetProjections(sample()));
    assert_eq!(state.session.entry().len(), 6);
    assert!(!state.loading);

    state.add_selected(false);
    assert_eq!(state.session.entry().len(), 6);
    assert_eq!(state.logs.back().map(String::as_str), Some("[WARN] Max 6 picks"));
}

#[test]
fn app_state_controls_clamp() {
    let mut state = AppState::new(&SessionSettings {
        entry_amount: 99.0,
        ..open_settings()
    });
    state.adjust_amount(5);
    assert_eq!(state.session.entry().amount(), 100.0);
    state.adjust_amount(-500);
    assert_eq!(state.session.entry().amount(), 1.0);

    for expected in [5, 4, 3, 2, 6] {
        state.cycle_legs();
        assert_eq!(state.session.num_legs(), expected);
    }
}

#[test]
fn sport_filter_cycles_through_batch_sports() {
    let mut state = AppState::new(&open_settings());
    apply_delta(&mut state, Delta::SetProjections(sample()));
    assert_eq!(state.sport_filter_label(), "NBA");
    state.cycle_sport_filter();
    assert_eq!(state.sport_filter_label(), "All");
    state.cycle_sport_filter();
    assert_eq!(state.sport_filter_label(), "NBA");
}
