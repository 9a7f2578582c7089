use std::collections::BTreeSet;
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::config::AppConfig;
use crate::feed::{self, RawRecord};
use crate::http_cache::BodyOrigin;
use crate::injury::InjuryTable;
use crate::odds::{self, SportsbookBook};
use crate::pipeline::{self, FeedSource, ProjectionBatch, ScoringContext};
use crate::sports::{Sport, map_sport};
use crate::state::{Delta, ProviderCommand};

/// Runs feed loading off the UI thread. Sends a batch on start, on every
/// `Refresh` and every `feed_poll`; exits when either channel closes.
pub fn spawn_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>, cfg: AppConfig) {
    thread::spawn(move || {
        let mut sports = cfg.session.sports.clone();
        let mut last_load = Instant::now();
        let batch = load_batch(&cfg, &tx, &sports, false);
        if tx.send(Delta::SetProjections(batch)).is_err() {
            return;
        }

        loop {
            thread::sleep(Duration::from_millis(500));

            let mut refresh = last_load.elapsed() >= cfg.feed_poll;
            let mut force = false;
            loop {
                match cmd_rx.try_recv() {
                    Ok(ProviderCommand::Refresh { sports: requested }) => {
                        sports = requested;
                        refresh = true;
                        force = true;
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => return,
                }
            }

            if refresh {
                let batch = load_batch(&cfg, &tx, &sports, force);
                if tx.send(Delta::SetProjections(batch)).is_err() {
                    return;
                }
                last_load = Instant::now();
            }
        }
    });
}

/// One full pipeline run: injuries, feed, sportsbook lines, scoring. Never
/// fails; every problem is logged and degrades to a fallback.
///
/// `force` skips the cache TTL; a failed request still falls back to the
/// cached body.
pub fn load_batch(
    cfg: &AppConfig,
    tx: &Sender<Delta>,
    sports: &BTreeSet<Sport>,
    force: bool,
) -> ProjectionBatch {
    let injuries = load_injuries(cfg, tx);

    let ttl = if force { Duration::ZERO } else { cfg.feed_ttl };
    let (records, source) = match feed::fetch_projection_feed(&cfg.feed_url, ttl) {
        Ok((records, cached)) => {
            let source = match cached.origin {
                BodyOrigin::Network => FeedSource::Live,
                BodyOrigin::Fresh | BodyOrigin::Stale => FeedSource::Cached,
            };
            let _ = tx.send(Delta::Log(format!(
                "[INFO] Feed returned {} items ({})",
                records.len(),
                source.label()
            )));
            (records, source)
        }
        Err(err) => {
            warn!(error = %err, "projection feed unavailable");
            let _ = tx.send(Delta::Log(format!(
                "[WARN] Feed unavailable, using sample data: {err:#}"
            )));
            (Vec::new(), FeedSource::Sample)
        }
    };

    let book = load_sportsbook(cfg, tx, &odds_sports(sports, &records));
    let ctx = ScoringContext {
        injuries: &injuries,
        sportsbook: (!book.is_empty()).then_some(&book),
        jitter: cfg.jitter,
    };
    pipeline::build_projections(&records, source, &ctx)
}

/// Sports to quote sportsbook lines for: the filter when one is set,
/// otherwise every quotable sport in the feed, otherwise NBA.
pub fn odds_sports(filter: &BTreeSet<Sport>, records: &[RawRecord]) -> Vec<Sport> {
    if !filter.is_empty() {
        return filter.iter().copied().collect();
    }
    let in_feed: BTreeSet<Sport> = records
        .iter()
        .map(|raw| {
            map_sport(
                raw.league_id.as_deref().unwrap_or_default(),
                raw.subject_name().unwrap_or_default(),
            )
            .sport
        })
        .filter(|sport| sport.odds_api_key().is_some())
        .collect();
    if in_feed.is_empty() {
        vec![Sport::Nba]
    } else {
        in_feed.into_iter().collect()
    }
}

fn load_injuries(cfg: &AppConfig, tx: &Sender<Delta>) -> InjuryTable {
    let Some(path) = cfg.injury_table_path.as_deref() else {
        return InjuryTable::builtin();
    };
    match InjuryTable::load(path) {
        Ok(table) => table,
        Err(err) => {
            warn!(error = %err, "injury table unreadable");
            let _ = tx.send(Delta::Log(format!(
                "[WARN] Injury table error, using built-in: {err:#}"
            )));
            InjuryTable::builtin()
        }
    }
}

fn load_sportsbook(cfg: &AppConfig, tx: &Sender<Delta>, sports: &[Sport]) -> SportsbookBook {
    let mut book = SportsbookBook::default();
    if cfg.odds.api_key.is_none() {
        return book;
    }
    for &sport in sports {
        match odds::fetch_player_props(sport, &cfg.odds) {
            Ok(lines) => book.merge(lines),
            Err(err) => {
                let _ = tx.send(Delta::Log(format!(
                    "[WARN] Odds error ({}): {err:#}",
                    sport.badge()
                )));
            }
        }
    }
    book
}
