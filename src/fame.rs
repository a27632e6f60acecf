// src/fame.rs

use crate::billing::select_top_billed;
use crate::history::HistoryIndex;
use crate::model::*;
use crate::normalize::normalize;
use indicatif::{ParallelProgressIterator, ProgressBar};
use rayon::prelude::*;

/// Windowed score of one selected actor
#[derive(Debug, Clone, PartialEq)]
pub struct ActorScore<'a> {
    pub name: &'a str,
    pub score: f64,
}

/// Per-actor scores behind a movie's fame.
///
/// `Unresolved` means the cast could not be read at all and contributes
/// nothing; an actor without history is `Resolved` with a score of 0.
#[derive(Debug, Clone, PartialEq)]
pub enum CastScores<'a> {
    Resolved(Vec<ActorScore<'a>>),
    Unresolved,
    /// Release date unreadable, nothing was queried
    Undated,
}

impl CastScores<'_> {
    /// Mean over resolved actors, or 0 when there is nothing to average.
    pub fn fame(&self) -> f64 {
        match self {
            CastScores::Resolved(scores) if !scores.is_empty() => {
                let total: f64 = scores.iter().map(|s| s.score).sum();
                total / scores.len() as f64
            }
            _ => 0.0,
        }
    }
}

pub fn cast_scores<'a>(index: &HistoryIndex, record: &'a NormalizedRecord) -> CastScores<'a> {
    let Ok(reference) = record.release_date else {
        return CastScores::Undated;
    };
    let Ok(cast) = &record.cast else {
        return CastScores::Unresolved;
    };

    let scores = select_top_billed(cast, index.config().top_billed)
        .into_iter()
        .map(|credit| ActorScore { name: credit.name.as_str(), score: index.score(&credit.name, reference) })
        .collect();
    CastScores::Resolved(scores)
}

/// Fame of an already normalized record. Revenue is not consulted, so
/// movies that cannot enter the history still get a score.
pub fn fame_of(index: &HistoryIndex, record: &NormalizedRecord) -> f64 {
    cast_scores(index, record).fame()
}

pub fn compute_fame_score(index: &HistoryIndex, record: &MovieRecord) -> f64 {
    fame_of(index, &normalize(record))
}

/// Scores every record on the rayon pool. Output is in input order and
/// carries each record's position and id.
pub fn score_corpus(index: &HistoryIndex, records: &[MovieRecord], bar: ProgressBar) -> Vec<ScoredMovie> {
    bar.set_length(records.len() as u64);
    records
        .par_iter()
        .enumerate()
        .progress_with(bar)
        .map(|(position, record)| ScoredMovie { position, id: record.id.clone(), fame: compute_fame_score(index, record) })
        .collect()
}
