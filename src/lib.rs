// src/lib.rs

//! Lead-actor "fame" feature for movie corpora.
//!
//! For every movie, the fame score is the mean over its top-billed actors of
//! the average revenue of each actor's own top-billed releases in the 1095
//! days before the movie's release date. The history is built once over the
//! whole corpus and queried read-only afterwards.

pub mod billing;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod error;
pub mod fame;
pub mod history;
pub mod literal;
pub mod model;
pub mod normalize;
pub mod sample;

pub use config::FameConfig;
pub use error::{Error, Result};
pub use fame::{compute_fame_score, score_corpus};
pub use history::{BuildStats, HistoryIndex, TimelineBuilder};
pub use model::{CastCredit, HistoryEntry, MovieRecord, ScoredMovie};

/// Builds the history index over the full, unfiltered corpus with the
/// default window and billing depth.
pub fn build_history_index(records: &[MovieRecord]) -> HistoryIndex {
    let index = HistoryIndex::build(records, FameConfig::default());
    log_build_stats(index.stats());
    index
}

pub fn log_build_stats(stats: &BuildStats) {
    tracing::info!(
        seen = stats.records_seen,
        indexed = stats.records_indexed,
        rejected = stats.records_rejected(),
        actors = stats.actors,
        entries = stats.entries,
        "history index built"
    );
    for (kind, count) in &stats.rejections {
        tracing::debug!(%kind, count, "records left out of history");
    }
}
