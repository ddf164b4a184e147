//! Stay-date helpers.
//!
//! Booking rows carry their dates as text. Rows written by this service are
//! `YYYY-MM-DD`, older rows may be `MM-DD-YYYY`. Everything that compares
//! dates goes through [`normalize_date`] first so that plain string ordering
//! matches calendar ordering.

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

pub const CANONICAL_FORMAT: &str = "%Y-%m-%d";

/// Rewrite a stay date to `YYYY-MM-DD`.
///
/// `YYYY-MM-DD` is returned unchanged and `MM-DD-YYYY` is reordered. Any
/// other shape is passed through untouched; comparisons against it are
/// unreliable, but this never fails.
pub fn normalize_date(s: &str) -> String {
    if matches_shape(s, &[4, 2, 2]) {
        return s.to_string();
    }
    if matches_shape(s, &[2, 2, 4]) {
        let month = &s[0..2];
        let day = &s[3..5];
        let year = &s[6..10];
        return format!("{year}-{month}-{day}");
    }
    s.to_string()
}

/// Normalize and strictly parse a stay date.
///
/// Only four-digit years are accepted so that every parsed date formats
/// back to a string that sorts like the date.
pub fn parse_stay_date(s: &str) -> anyhow::Result<NaiveDate> {
    let normalized = normalize_date(s.trim());
    if !matches_shape(&normalized, &[4, 2, 2]) {
        anyhow::bail!("invalid date: {s}");
    }
    NaiveDate::parse_from_str(&normalized, CANONICAL_FORMAT)
        .map_err(|_| anyhow::anyhow!("invalid date: {s}"))
}

/// Today's calendar date at the property.
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(CANONICAL_FORMAT).to_string()
}

// Digit groups separated by single dashes, e.g. [4, 2, 2] for 2024-01-05.
fn matches_shape(s: &str, groups: &[usize]) -> bool {
    let parts: Vec<&str> = s.split('-').collect();
    parts.len() == groups.len()
        && parts
            .iter()
            .zip(groups)
            .all(|(part, len)| part.len() == *len && part.bytes().all(|b| b.is_ascii_digit()))
}
