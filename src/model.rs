// src/model.rs

use crate::normalize::Rejection;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Billing order given to credits that carry no usable `order` value
pub const MISSING_ORDER: u32 = 999;

/// One raw movie row as handed over by the loading pipeline.
///
/// Fields are kept loosely typed; coercion happens in the normalizer.
/// `None` means the column was absent, `Some(Value::Null)` that it was null.
/// The raw `id` column stays in `extra` so it is written back as read;
/// `id` is its text form, used as the join key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "RawMovieRecord")]
pub struct MovieRecord {
    #[serde(skip)]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cast: Option<Value>,
    /// Every other column, carried through to the output untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
struct RawMovieRecord {
    #[serde(default, deserialize_with = "present")]
    release_date: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    revenue: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    cast: Option<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RawMovieRecord> for MovieRecord {
    fn from(raw: RawMovieRecord) -> Self {
        let id = match raw.extra.get("id") {
            Some(Value::String(s)) => s.clone(),
            None | Some(Value::Null) => String::new(),
            Some(other) => other.to_string(),
        };
        Self { id, release_date: raw.release_date, revenue: raw.revenue, cast: raw.cast, extra: raw.extra }
    }
}

/// A single credit in a movie's cast list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastCredit {
    pub name: String,
    pub order: u32,
}

/// One appearance of an actor as a top-billed member of a usable movie
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub revenue: f64,
}

/// A raw record after field coercion. Each field keeps the reason it
/// could not be used, so history building and scoring can apply their
/// own acceptance rules to the same value.
#[derive(Debug, Clone)]
pub struct NormalizedRecord {
    pub id: String,
    pub release_date: Result<NaiveDate, Rejection>,
    pub revenue: Result<f64, Rejection>,
    pub cast: Result<Vec<CastCredit>, Rejection>,
}

/// Fame score of one movie, tagged with where it came from in the input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredMovie {
    pub position: usize,
    pub id: String,
    pub fame: f64,
}

/// Keeps an explicit `null` as `Some(Value::Null)`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
