use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::classify::is_player_name;
use crate::feed::RawRecord;
use crate::hit_rate::{self, Confidence, HitRateInputs, HitRateScore, Side};
use crate::injury::{InjuryRecord, InjuryTable, UNKNOWN_TEAM};
use crate::odds::SportsbookBook;
use crate::sample::sample_records;
use crate::sports::{Sport, SportInfo, map_sport};

pub const DEFAULT_LEAGUE_ID: &str = "default";

#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub id: String,
    pub subject_name: String,
    pub is_player: bool,
    pub sport: SportInfo,
    pub league_id: String,
    pub stat_type: String,
    pub line: f64,
    pub start_time: Option<String>,
    pub is_live: bool,
    pub team: String,
    pub injury: InjuryRecord,
    pub opportunity: bool,
    pub sportsbook_prob: Option<f64>,
    pub hit_rate: f64,
    pub recommendation: Side,
    pub confidence: Confidence,
}

impl Projection {
    pub fn hit_rate_inputs(&self) -> HitRateInputs {
        HitRateInputs {
            line: self.line,
            sport: self.sport.sport,
            injury: self.injury.status,
            opportunity: self.opportunity,
            sportsbook_prob: self.sportsbook_prob,
        }
    }

    pub fn is_recommended(&self) -> bool {
        self.hit_rate > hit_rate::BREAK_EVEN_6_LEG
    }

    fn set_score(&mut self, score: HitRateScore) {
        self.hit_rate = score.hit_rate;
        self.recommendation = score.recommendation;
        self.confidence = score.confidence;
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("record without an id")]
    MissingId,
    #[error("record {id}: missing line score")]
    MissingLine { id: String },
    #[error("record {id}: line {line} is not a positive number")]
    InvalidLine { id: String, line: f64 },
    #[error("record {id}: missing subject name")]
    MissingName { id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSource {
    Live,
    Cached,
    Sample,
}

impl FeedSource {
    pub fn label(self) -> &'static str {
        match self {
            FeedSource::Live => "live",
            FeedSource::Cached => "cached",
            FeedSource::Sample => "sample",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub injuries: &'a InjuryTable,
    pub sportsbook: Option<&'a SportsbookBook>,
    // Opt-in; makes hit rates non-reproducible.
    pub jitter: bool,
}

impl<'a> ScoringContext<'a> {
    pub fn new(injuries: &'a InjuryTable) -> Self {
        Self {
            injuries,
            sportsbook: None,
            jitter: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProjectionBatch {
    pub projections: Vec<Projection>,
    pub source: FeedSource,
    pub skipped: usize,
    pub league_ids: BTreeSet<String>,
}

impl ProjectionBatch {
    pub fn sport_counts(&self) -> Vec<(Sport, usize)> {
        let mut counts: BTreeMap<Sport, usize> = BTreeMap::new();
        for p in &self.projections {
            *counts.entry(p.sport.sport).or_insert(0) += 1;
        }
        let mut out: Vec<(Sport, usize)> = counts.into_iter().collect();
        out.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        out
    }

    pub fn sports(&self) -> Vec<Sport> {
        let set: BTreeSet<Sport> = self.projections.iter().map(|p| p.sport.sport).collect();
        set.into_iter().collect()
    }
}

pub fn normalize_record(raw: &RawRecord, ctx: &ScoringContext<'_>) -> Result<Projection, RecordError> {
    // Entries key picks by projection id.
    if raw.id.trim().is_empty() {
        return Err(RecordError::MissingId);
    }
    let line = raw.line_score.ok_or_else(|| RecordError::MissingLine { id: raw.id.clone() })?;
    if !line.is_finite() || line <= 0.0 {
        return Err(RecordError::InvalidLine {
            id: raw.id.clone(),
            line,
        });
    }
    let subject_name = raw
        .subject_name()
        .ok_or_else(|| RecordError::MissingName { id: raw.id.clone() })?
        .to_string();

    let league_id = raw
        .league_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(DEFAULT_LEAGUE_ID)
        .to_string();
    let is_player = is_player_name(&subject_name);
    let sport = map_sport(&league_id, &subject_name);
    let stat_type = raw.stat_label().to_string();
    let injury = ctx.injuries.resolve(&subject_name);
    // Boosts apply to players only.
    let opportunity = is_player && hit_rate::opportunity_for(&subject_name).is_some();
    let sportsbook_prob = ctx
        .sportsbook
        .and_then(|book| book.over_prob(&subject_name, &stat_type, line));

    let team = raw
        .team
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or_else(|| (injury.team != UNKNOWN_TEAM).then(|| injury.team.clone()))
        .unwrap_or_else(|| UNKNOWN_TEAM.to_string());

    let score = hit_rate::score(&HitRateInputs {
        line,
        sport: sport.sport,
        injury: injury.status,
        opportunity,
        sportsbook_prob,
    });

    Ok(Projection {
        id: raw.id.clone(),
        subject_name,
        is_player,
        sport,
        league_id,
        stat_type,
        line,
        start_time: raw.start_time.clone(),
        is_live: raw.is_live,
        team,
        injury,
        opportunity,
        sportsbook_prob,
        hit_rate: score.hit_rate,
        recommendation: score.recommendation,
        confidence: score.confidence,
    })
}

/// Malformed records are skipped and counted. A batch with nothing usable
/// left falls back to the sample set.
pub fn build_projections(
    records: &[RawRecord],
    source: FeedSource,
    ctx: &ScoringContext<'_>,
) -> ProjectionBatch {
    let batch = score_records(records, source, ctx);
    if !batch.projections.is_empty() {
        info!(
            source = source.label(),
            props = batch.projections.len(),
            skipped = batch.skipped,
            "scored projections"
        );
        return batch;
    }

    warn!(
        source = source.label(),
        records = records.len(),
        "feed produced no usable props, using sample data"
    );
    let sample = score_records(&sample_records(), FeedSource::Sample, ctx);
    ProjectionBatch {
        skipped: batch.skipped + sample.skipped,
        league_ids: batch.league_ids,
        ..sample
    }
}

pub fn sample_batch(ctx: &ScoringContext<'_>) -> ProjectionBatch {
    build_projections(&[], FeedSource::Sample, ctx)
}

fn score_records(records: &[RawRecord], source: FeedSource, ctx: &ScoringContext<'_>) -> ProjectionBatch {
    let mut rng = ctx.jitter.then(rand::thread_rng);
    let mut projections = Vec::with_capacity(records.len());
    let mut league_ids = BTreeSet::new();
    let mut skipped = 0usize;

    for raw in records {
        if let Some(id) = raw.league_id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
            league_ids.insert(id.to_string());
        }
        match normalize_record(raw, ctx) {
            Ok(mut projection) => {
                if let Some(rng) = rng.as_mut() {
                    apply_jitter(&mut projection, rng);
                }
                projections.push(projection);
            }
            Err(err) => {
                debug!(error = %err, "skipping feed record");
                skipped += 1;
            }
        }
    }

    ProjectionBatch {
        projections,
        source,
        skipped,
        league_ids,
    }
}

pub fn apply_jitter<R: Rng + ?Sized>(projection: &mut Projection, rng: &mut R) {
    let score = hit_rate::score_with_jitter(&projection.hit_rate_inputs(), rng);
    projection.set_score(score);
}
