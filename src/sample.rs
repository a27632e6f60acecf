// src/sample.rs

//! Selection of the analysis sample.
//!
//! Runs after every movie has been scored against the full corpus. Nothing
//! here feeds back into the history index.

use crate::error::{Error, Result};
use crate::model::MovieRecord;
use crate::normalize::{coerce_number, parse_date_text, parse_release_date};
use chrono::NaiveDate;
use serde_json::Value;

pub const DEFAULT_SAMPLE_START: &str = "2008-01-01";
pub const DEFAULT_SAMPLE_END: &str = "2016-12-31";
pub const DEFAULT_COUNTRY: &str = "United States of America";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleFilter {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub country: String,
}

impl Default for SampleFilter {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2008, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2016, 12, 31).unwrap_or_default(),
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl SampleFilter {
    pub fn new(start: &str, end: &str, country: impl Into<String>) -> Result<Self> {
        let parse = |s: &str| parse_date_text(s).ok_or_else(|| Error::InvalidDate(s.to_string()));
        Ok(Self { start: parse(start)?, end: parse(end)?, country: country.into() })
    }

    /// Release date within `[start, end]`, produced in the target country,
    /// and positive budget and revenue.
    pub fn admits(&self, record: &MovieRecord) -> bool {
        let Ok(released) = parse_release_date(record.release_date.as_ref()) else {
            return false;
        };
        if released < self.start || released > self.end {
            return false;
        }
        if !self.produced_in_country(record) {
            return false;
        }
        is_positive(record.extra.get("budget")) && is_positive(record.revenue.as_ref())
    }

    fn produced_in_country(&self, record: &MovieRecord) -> bool {
        match record.extra.get("production_countries") {
            None | Some(Value::Null) => false,
            Some(Value::String(text)) => text.contains(&self.country),
            Some(other) => other.to_string().contains(&self.country),
        }
    }
}

fn is_positive(value: Option<&Value>) -> bool {
    value.and_then(coerce_number).is_some_and(|n| n > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(fields: Value) -> MovieRecord {
        serde_json::from_value(fields).unwrap()
    }

    fn us_movie(date: &str) -> MovieRecord {
        record(json!({
            "id": "1",
            "release_date": date,
            "revenue": "1000",
            "budget": "10",
            "production_countries": "[{'iso_3166_1': 'US', 'name': 'United States of America'}]"
        }))
    }

    #[test]
    fn window_is_inclusive() {
        let filter = SampleFilter::default();
        assert!(filter.admits(&us_movie("2008-01-01")));
        assert!(filter.admits(&us_movie("2016-12-31")));
        assert!(!filter.admits(&us_movie("2007-12-31")));
        assert!(!filter.admits(&us_movie("2017-01-01")));
        assert!(!filter.admits(&us_movie("")));
    }

    #[test]
    fn needs_country_budget_and_revenue() {
        let filter = SampleFilter::default();
        let mut movie = us_movie("2010-01-01");
        movie.extra.insert("production_countries".into(), json!([{"name": "France"}]));
        assert!(!filter.admits(&movie));

        movie.extra.insert("production_countries".into(), json!([{"name": "United States of America"}]));
        assert!(filter.admits(&movie));

        movie.extra.insert("budget".into(), json!(0));
        assert!(!filter.admits(&movie));

        let mut movie = us_movie("2010-01-01");
        movie.revenue = None;
        assert!(!filter.admits(&movie));
    }

    #[test]
    fn rejects_bad_bounds() {
        assert!(matches!(SampleFilter::new("2008-01-01", "soon", "X"), Err(Error::InvalidDate(d)) if d == "soon"));
        let filter = SampleFilter::new(DEFAULT_SAMPLE_START, DEFAULT_SAMPLE_END, DEFAULT_COUNTRY).unwrap();
        assert_eq!(filter, SampleFilter::default());
    }
}
