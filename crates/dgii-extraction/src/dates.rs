//! Date parsing for extracted invoice dates.
//!
//! Dominican receipts print dates day-first (`25/01/2025`) but models
//! often answer in ISO form or, occasionally, US order. Formats are tried
//! in a fixed order and the first successful parse wins, so an ambiguous
//! `03/04/2025` is read day-first.

use chrono::{DateTime, NaiveDate};

const FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a date in any of the accepted formats, or an RFC 3339 timestamp
/// (the date part is kept). Empty or unparseable input yields `None`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for format in FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, format) {
            return Some(d);
        }
    }

    match DateTime::parse_from_rfc3339(s) {
        Ok(ts) => Some(ts.date_naive()),
        Err(_) => {
            tracing::warn!(value = %s, "unrecognised date format, leaving date unset");
            None
        }
    }
}
