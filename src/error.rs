// src/error.rs

//! Errors raised while reading and writing corpora.
//!
//! Scoring itself never fails; only the surrounding I/O does.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A corpus line that is not a JSON object
    #[error("Invalid record on line {line}: {source}")]
    Record {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),
}

pub type Result<T> = std::result::Result<T, Error>;
