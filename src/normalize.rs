// src/normalize.rs

use crate::literal;
use crate::model::*;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use thiserror::Error;

/// Why a field of a record cannot be used as historical evidence.
///
/// These are counted for diagnostics and never surfaced to callers as errors.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rejection {
    #[error("release date is missing")]
    MissingReleaseDate,
    #[error("release date is not a calendar date")]
    UnparseableReleaseDate,
    #[error("revenue is missing")]
    MissingRevenue,
    #[error("revenue is not numeric")]
    NonNumericRevenue,
    #[error("revenue is not positive")]
    NonPositiveRevenue,
    #[error("cast is missing")]
    MissingCast,
    #[error("cast is not a list of credits")]
    MalformedCast,
}

/// A record that passed every history check
#[derive(Debug, Clone, Copy)]
pub struct HistoricalRecord<'a> {
    pub date: NaiveDate,
    pub revenue: f64,
    pub cast: &'a [CastCredit],
}

impl NormalizedRecord {
    /// Checks date, then revenue, then cast; the first failure wins.
    pub fn historical(&self) -> Result<HistoricalRecord<'_>, Rejection> {
        let date = self.release_date?;
        let revenue = self.revenue?;
        if revenue <= 0.0 {
            return Err(Rejection::NonPositiveRevenue);
        }
        let cast = self.cast.as_deref().map_err(|e| *e)?;
        Ok(HistoricalRecord { date, revenue, cast })
    }
}

pub fn normalize(raw: &MovieRecord) -> NormalizedRecord {
    NormalizedRecord {
        id: raw.id.clone(),
        release_date: parse_release_date(raw.release_date.as_ref()),
        revenue: parse_revenue(raw.revenue.as_ref()),
        cast: parse_cast(raw.cast.as_ref()),
    }
}

pub fn parse_release_date(value: Option<&Value>) -> Result<NaiveDate, Rejection> {
    match value {
        None | Some(Value::Null) => Err(Rejection::MissingReleaseDate),
        Some(Value::String(s)) if s.trim().is_empty() => Err(Rejection::MissingReleaseDate),
        Some(Value::String(s)) => parse_date_text(s).ok_or(Rejection::UnparseableReleaseDate),
        Some(_) => Err(Rejection::UnparseableReleaseDate),
    }
}

const DATETIME_FORMATS: [&str; 4] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"];

/// Accepts `YYYY-MM-DD`, optionally followed by a well-formed time of day
/// (with or without an RFC 3339 offset). The calendar date is kept as written.
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(day) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(day);
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
}

/// Coerces a JSON number or numeric string. Sign is not checked here.
pub fn parse_revenue(value: Option<&Value>) -> Result<f64, Rejection> {
    let number = match value {
        None | Some(Value::Null) => return Err(Rejection::MissingRevenue),
        Some(Value::String(s)) if s.trim().is_empty() => return Err(Rejection::MissingRevenue),
        Some(other) => coerce_number(other).ok_or(Rejection::NonNumericRevenue)?,
    };
    Ok(number)
}

pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

pub fn parse_cast(value: Option<&Value>) -> Result<Vec<CastCredit>, Rejection> {
    let parsed;
    let entries = match value {
        None | Some(Value::Null) => return Err(Rejection::MissingCast),
        Some(Value::Array(entries)) => entries,
        Some(Value::String(text)) => {
            if text.trim().is_empty() {
                return Err(Rejection::MissingCast);
            }
            parsed = literal::parse(text).map_err(|e| {
                tracing::trace!(error = %e, "cast literal unreadable");
                Rejection::MalformedCast
            })?;
            match &parsed {
                Value::Array(entries) => entries,
                _ => return Err(Rejection::MalformedCast),
            }
        }
        Some(_) => return Err(Rejection::MalformedCast),
    };

    Ok(entries.iter().filter_map(credit_from_value).collect())
}

fn credit_from_value(value: &Value) -> Option<CastCredit> {
    let entry = value.as_object()?;
    let name = entry.get("name")?.as_str()?.to_string();
    let order = entry.get("order").and_then(billing_order).unwrap_or(MISSING_ORDER);
    Some(CastCredit { name, order })
}

fn billing_order(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => match n.as_u64() {
            Some(i) => u32::try_from(i).ok(),
            None => {
                let f = n.as_f64()?;
                (f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64).then_some(f as u32)
            }
        },
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}
