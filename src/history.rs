// src/history.rs

use crate::billing::select_top_billed;
use crate::config::FameConfig;
use crate::model::*;
use crate::normalize::{normalize, Rejection};
use chrono::{Duration, NaiveDate};
use indicatif::{ParallelProgressIterator, ProgressBar};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};

/// Maps an actor's name to their dated appearances
pub type TimelineMap = HashMap<String, ActorTimeline>;

/// An actor's appearances, sorted by date. Same-day entries keep corpus order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActorTimeline {
    entries: Vec<HistoryEntry>,
}

impl ActorTimeline {
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Entries with `from <= date < until`.
    pub fn window(&self, from: NaiveDate, until: NaiveDate) -> &[HistoryEntry] {
        let lo = self.entries.partition_point(|e| e.date < from);
        let hi = self.entries.partition_point(|e| e.date < until);
        if lo >= hi {
            return &[];
        }
        &self.entries[lo..hi]
    }

    pub fn mean_revenue(&self, from: NaiveDate, until: NaiveDate) -> Option<f64> {
        let window = self.window(from, until);
        if window.is_empty() {
            return None;
        }
        let total: f64 = window.iter().map(|e| e.revenue).sum();
        Some(total / window.len() as f64)
    }
}

/// Counters collected while building the index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub records_seen: usize,
    pub records_indexed: usize,
    pub rejections: BTreeMap<Rejection, usize>,
    pub actors: usize,
    pub entries: usize,
}

impl BuildStats {
    pub fn records_rejected(&self) -> usize {
        self.rejections.values().sum()
    }

    fn absorb(&mut self, other: BuildStats) {
        self.records_seen += other.records_seen;
        self.records_indexed += other.records_indexed;
        for (kind, count) in other.rejections {
            *self.rejections.entry(kind).or_default() += count;
        }
    }
}

/// An entry waiting for the final sort. `seq` is (record position, billing
/// slot), which reproduces sequential insertion order for equal dates.
#[derive(Debug, Clone, Copy)]
struct PendingEntry {
    date: NaiveDate,
    seq: (usize, usize),
    revenue: f64,
}

/// Accumulates timelines for one partition of the corpus.
///
/// Builders for any split of the same records can be merged in any order;
/// `finish` yields the same index as a single sequential pass.
#[derive(Debug)]
pub struct TimelineBuilder {
    config: FameConfig,
    pending: HashMap<String, Vec<PendingEntry>>,
    stats: BuildStats,
}

impl TimelineBuilder {
    pub fn new(config: FameConfig) -> Self {
        Self { config, pending: HashMap::new(), stats: BuildStats::default() }
    }

    /// Adds the record found at `position` in the full corpus.
    pub fn ingest(&mut self, position: usize, record: &MovieRecord) {
        self.stats.records_seen += 1;
        let normalized = normalize(record);
        let historical = match normalized.historical() {
            Ok(h) => h,
            Err(reason) => {
                tracing::trace!(id = %record.id, %reason, "record left out of history");
                *self.stats.rejections.entry(reason).or_default() += 1;
                return;
            }
        };
        self.stats.records_indexed += 1;

        for (slot, credit) in select_top_billed(historical.cast, self.config.top_billed).into_iter().enumerate() {
            self.pending.entry(credit.name.clone()).or_default().push(PendingEntry {
                date: historical.date,
                seq: (position, slot),
                revenue: historical.revenue,
            });
        }
    }

    pub fn merge(mut self, other: TimelineBuilder) -> TimelineBuilder {
        for (actor, mut entries) in other.pending {
            self.pending.entry(actor).or_default().append(&mut entries);
        }
        self.stats.absorb(other.stats);
        self
    }

    /// Sorts every timeline once and freezes the index.
    pub fn finish(self) -> HistoryIndex {
        let mut stats = self.stats;
        let timelines: TimelineMap = self
            .pending
            .into_iter()
            .map(|(actor, mut pending)| {
                pending.sort_unstable_by(|a, b| a.date.cmp(&b.date).then(a.seq.cmp(&b.seq)));
                let entries = pending.into_iter().map(|p| HistoryEntry { date: p.date, revenue: p.revenue }).collect();
                (actor, ActorTimeline { entries })
            })
            .collect();

        stats.actors = timelines.len();
        stats.entries = timelines.values().map(|t| t.entries.len()).sum();

        HistoryIndex { timelines, config: self.config, stats }
    }
}

/// Read-only, per-actor history of prior box-office results.
#[derive(Debug, Clone)]
pub struct HistoryIndex {
    timelines: TimelineMap,
    config: FameConfig,
    stats: BuildStats,
}

impl HistoryIndex {
    /// One sequential pass over the whole corpus.
    pub fn build(records: &[MovieRecord], config: FameConfig) -> Self {
        let mut builder = TimelineBuilder::new(config);
        for (position, record) in records.iter().enumerate() {
            builder.ingest(position, record);
        }
        builder.finish()
    }

    /// Splits the corpus into `partitions` contiguous chunks, builds them on
    /// the rayon pool and merges the partial timelines before sorting.
    pub fn build_parallel(records: &[MovieRecord], config: FameConfig, partitions: usize, bar: ProgressBar) -> Self {
        let partitions = partitions.max(1);
        let chunk_len = records.len().div_ceil(partitions).max(1);
        bar.set_length(records.len().div_ceil(chunk_len) as u64);

        let builder = records
            .par_chunks(chunk_len)
            .enumerate()
            .progress_with(bar)
            .map(|(chunk_idx, chunk)| {
                let mut builder = TimelineBuilder::new(config);
                for (offset, record) in chunk.iter().enumerate() {
                    builder.ingest(chunk_idx * chunk_len + offset, record);
                }
                builder
            })
            .reduce(|| TimelineBuilder::new(config), TimelineBuilder::merge);

        builder.finish()
    }

    pub fn config(&self) -> FameConfig {
        self.config
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    pub fn timeline(&self, actor: &str) -> Option<&ActorTimeline> {
        self.timelines.get(actor)
    }

    pub fn actors(&self) -> impl Iterator<Item = &str> {
        self.timelines.keys().map(String::as_str)
    }

    /// First date inside the window that ends just before `reference`.
    pub fn window_start(&self, reference: NaiveDate) -> NaiveDate {
        Duration::try_days(self.config.window_days)
            .and_then(|window| reference.checked_sub_signed(window))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Mean revenue of `actor`'s appearances in `[reference - window, reference)`,
    /// or 0 when there are none.
    pub fn score(&self, actor: &str, reference: NaiveDate) -> f64 {
        self.timeline(actor)
            .and_then(|timeline| timeline.mean_revenue(self.window_start(reference), reference))
            .unwrap_or(0.0)
    }
}
