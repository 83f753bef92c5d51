//! The synthetic time axis attached to every ingested record.
//!
//! Source datasets carry no trustworthy timestamp column, so ingestion
//! assigns the *N*-th data row (0-indexed) the instant `base_epoch + N`
//! seconds. Any timestamp-like column already present in the source is
//! passed through untouched and never consulted.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Name of the column appended to every canonical record.
pub const SYNTHETIC_TIMESTAMP_COLUMN: &str = "synthetic_timestamp";

/// Wall-clock format used for `synthetic_timestamp` values in canonical files.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Key format for one calendar day, e.g. `"2021-01-15"`.
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Display label format for one calendar day, e.g. `"Jan 15"`.
pub const DAY_LABEL_FORMAT: &str = "%b %-d";

/// Year of the fixed visualization month.
pub const VIS_YEAR: i32 = 2021;

/// Month (1-based) of the fixed visualization month.
pub const VIS_MONTH: u32 = 1;

// ── Axis derivation ───────────────────────────────────────────────────────────

/// First instant of the synthetic axis: 2021-01-01 00:00:00.
pub fn base_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(VIS_YEAR, VIS_MONTH, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("base epoch constant is a valid instant")
}

/// Timestamp assigned to the `row_index`-th data row (0-indexed).
pub fn timestamp_for_row(row_index: u64) -> NaiveDateTime {
    base_epoch() + Duration::seconds(row_index as i64)
}

/// Render a timestamp in the canonical on-disk format.
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a timestamp string as written by ingestion (or hand-supplied).
///
/// Accepts the canonical `%Y-%m-%d %H:%M:%S` form, the `T`-separated
/// variant, and a bare date (interpreted as midnight). Returns `None` for
/// anything else; callers decide whether that is a skip or an error.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    const FMTS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
    for fmt in FMTS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(ts);
        }
    }

    NaiveDate::parse_from_str(trimmed, DAY_KEY_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

// ── Visualization month ───────────────────────────────────────────────────────

/// Number of days in the given calendar month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .expect("month boundaries are valid dates")
}

/// `true` when `ts` falls inside the fixed visualization month.
pub fn in_visualization_month(ts: NaiveDateTime) -> bool {
    ts.year() == VIS_YEAR && ts.month() == VIS_MONTH
}

/// Every calendar day of the visualization month, in order.
pub fn visualization_days() -> Vec<NaiveDate> {
    (1..=days_in_month(VIS_YEAR, VIS_MONTH))
        .filter_map(|day| NaiveDate::from_ymd_opt(VIS_YEAR, VIS_MONTH, day))
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
