// src/corpus.rs

use crate::error::{Error, Result};
use crate::model::{MovieRecord, ScoredMovie};
use serde_json::{json, Value};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

pub const FAME_COLUMN: &str = "actor_fame";
pub const FAME_LOG_COLUMN: &str = "actor_fame_log";

/// Reads a JSON Lines corpus, one movie per line. Blank lines are skipped.
pub fn read_corpus(path: &Path) -> Result<Vec<MovieRecord>> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| Error::Record { line: idx + 1, source })?;
        records.push(record);
    }
    tracing::debug!(path = %path.display(), records = records.len(), "corpus loaded");
    Ok(records)
}

/// The record's own columns plus the fame feature and its `ln(1 + x)`.
pub fn scored_row(record: &MovieRecord, fame: f64) -> Result<Value> {
    let mut row = serde_json::to_value(record)?;
    if let Value::Object(map) = &mut row {
        map.insert(FAME_COLUMN.to_string(), json!(fame));
        map.insert(FAME_LOG_COLUMN.to_string(), json!(fame.ln_1p()));
    }
    Ok(row)
}

/// Writes `scores` joined back to their records by position.
pub fn write_scored(path: &Path, records: &[MovieRecord], scores: &[ScoredMovie]) -> Result<usize> {
    let mut out = BufWriter::new(File::create(path)?);
    let mut written = 0;
    for scored in scores {
        let Some(record) = records.get(scored.position) else {
            tracing::warn!(position = scored.position, id = %scored.id, "score without a record");
            continue;
        };
        serde_json::to_writer(&mut out, &scored_row(record, scored.fame)?)?;
        out.write_all(b"\n")?;
        written += 1;
    }
    out.flush()?;
    Ok(written)
}
