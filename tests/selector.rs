use std::collections::{BTreeSet, HashSet};

use flex_terminal::injury::InjuryTable;
use flex_terminal::pipeline::{ProjectionBatch, ScoringContext, sample_batch};
use flex_terminal::selector::{Filters, ranked, select};
use flex_terminal::sports::Sport;

fn sample() -> ProjectionBatch {
    let injuries = InjuryTable::builtin();
    sample_batch(&ScoringContext::new(&injuries))
}

fn open_filters() -> Filters {
    Filters::default()
}

#[test]
fn respects_limit_and_returns_each_projection_once() {
    let batch = sample();
    for limit in [0, 1, 6, 10, 50] {
        let out = select(&batch.projections, &open_filters(), limit);
        assert_eq!(out.len(), limit.min(batch.projections.len()));
        let ids: HashSet<&str> = out.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), out.len());
    }
}

#[test]
fn output_is_ordered_by_hit_rate() {
    let batch = sample();
    let out = ranked(&batch.projections, &open_filters());
    for pair in out.windows(2) {
        assert!(pair[0].hit_rate >= pair[1].hit_rate);
    }
}

#[test]
fn ties_keep_feed_order() {
    let batch = sample();
    let out = select(&batch.projections, &open_filters(), 6);
    let names: Vec<&str> = out.iter().map(|p| p.subject_name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Desmond Bane",
            "Anthony Black",
            "Dillon Brooks",
            "Cade Cunningham",
            "Kevin Durant",
            "Karl-Anthony Towns",
        ]
    );
}

#[test]
fn recommended_only_keeps_more_side() {
    let batch = sample();
    let filters = Filters {
        recommended_only: true,
        ..open_filters()
    };
    let out = ranked(&batch.projections, &filters);
    assert_eq!(out.len(), 3);
    assert!(out.iter().all(|p| p.is_recommended()));
}

#[test]
fn sport_filter_excludes_other_sports() {
    let batch = sample();
    let nfl_only = Filters {
        sports: BTreeSet::from([Sport::Nfl]),
        ..open_filters()
    };
    assert!(select(&batch.projections, &nfl_only, 6).is_empty());

    let nba_only = Filters {
        sports: BTreeSet::from([Sport::Nba]),
        ..open_filters()
    };
    assert_eq!(select(&batch.projections, &nba_only, 6).len(), 6);
}

#[test]
fn players_only_drops_team_props() {
    let batch = sample();
    let mut projections = batch.projections.clone();
    let mut team = projections[0].clone();
    team.id = "team-1".to_string();
    team.subject_name = "OKC".to_string();
    team.is_player = false;
    projections.push(team);

    let filters = Filters {
        players_only: true,
        ..open_filters()
    };
    let out = ranked(&projections, &filters);
    assert_eq!(out.len(), 10);
    assert!(out.iter().all(|p| p.is_player));
}
