//! Per-day aggregation over the visualization month, plus the deterministic
//! display smoothing.
//!
//! Pass 1 streams the canonical file and builds exact per-calendar-day
//! counts, each tagged with a dominant partition label. Pass 2 applies two
//! deterministic transforms that exist purely for visualization variety —
//! a date-string-hash jitter and a sinusoidal sweep — so the output is
//! bit-for-bit reproducible while avoiding perfectly flat bars on uniform
//! data. The formulas are load-bearing for downstream display code; do not
//! "improve" them.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;

use chrono::NaiveDate;
use qcprep_core::error::{PrepError, Result};
use qcprep_core::models::{CanonicalDataset, DailyPoint, DateWindows, Partition};
use qcprep_core::time_axis::{
    in_visualization_month, parse_timestamp, visualization_days, DAY_KEY_FORMAT,
    DAY_LABEL_FORMAT, SYNTHETIC_TIMESTAMP_COLUMN,
};
use tracing::debug;

// ── Exact tally ───────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone)]
struct DayTally {
    count: u64,
    period: Option<Partition>,
}

/// Build the smoothed daily series for the visualization month.
///
/// The dominant label per day is "first non-empty label wins": once a day
/// has any partition label, later rows cannot change it, but a day first
/// seen as baseline can still be upgraded. This tie-break is deliberately
/// order-dependent on file scan order — a canonical file not sorted by
/// timestamp can end up with a misleading dominant label — and is kept
/// as-is rather than replaced with a majority vote.
pub fn aggregate_daily(
    dataset: &CanonicalDataset,
    windows: &DateWindows,
) -> Result<Vec<DailyPoint>> {
    let file = File::open(&dataset.path).map_err(|e| PrepError::storage(&dataset.path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(BufReader::new(file));

    let headers = reader.headers()?.clone();
    let ts_idx = headers
        .iter()
        .position(|h| h == SYNTHETIC_TIMESTAMP_COLUMN);

    let mut tallies: BTreeMap<NaiveDate, DayTally> = BTreeMap::new();
    let mut record = csv::StringRecord::new();

    while reader.read_record(&mut record)? {
        let Some(ts) = ts_idx
            .and_then(|i| record.get(i))
            .and_then(parse_timestamp)
        else {
            debug!(dataset = %dataset.name, "skipping record with unparseable timestamp");
            continue;
        };

        if !in_visualization_month(ts) {
            continue;
        }

        let tally = tallies.entry(ts.date()).or_default();
        tally.count += 1;
        if tally.period.is_none() {
            tally.period = windows.classify(ts);
        }
    }

    Ok(build_series(&tallies))
}

// ── Smoothing ─────────────────────────────────────────────────────────────────

/// Stable hash of a calendar-date string mapped to the jitter base value.
///
/// `h = 17; h = h * 31 + ch` over wrapping 32-bit arithmetic, then
/// `(h % 2000) / 1000 - 1`. Pure function of the date string.
pub fn deterministic_jitter(date_key: &str) -> f64 {
    let mut hash: i32 = 17;
    for ch in date_key.chars() {
        hash = hash.wrapping_mul(31).wrapping_add(ch as i32);
    }
    f64::from(hash % 2000) / 1000.0 - 1.0
}

/// Sinusoidal display scale for the 1-based day index `i` of a series of
/// `len` days: `1 + 0.15 * sin(2π * i / len)`.
pub fn sinusoidal_scale(index: usize, len: usize) -> f64 {
    let phase = (index + 1) as f64 / len as f64 * std::f64::consts::TAU;
    1.0 + 0.15 * phase.sin()
}

/// Scale a count and round to the nearest non-negative integer.
fn apply_scale(count: u64, scale: f64) -> u64 {
    let scaled = (count as f64 * scale).round();
    if scaled.is_sign_negative() {
        0
    } else {
        scaled as u64
    }
}

/// Expand tallies into a gapless series over the visualization month and
/// run both smoothing transforms. Zero-count days are exempt and stay 0.
fn build_series(tallies: &BTreeMap<NaiveDate, DayTally>) -> Vec<DailyPoint> {
    let mut points: Vec<DailyPoint> = visualization_days()
        .into_iter()
        .map(|date| {
            let key = date.format(DAY_KEY_FORMAT).to_string();
            let label = date.format(DAY_LABEL_FORMAT).to_string();

            match tallies.get(&date) {
                Some(tally) if tally.count > 0 => {
                    let jitter = deterministic_jitter(&key) * 0.1;
                    DailyPoint {
                        date: key,
                        day: label,
                        volume: apply_scale(tally.count, 1.0 + jitter),
                        period: tally.period,
                    }
                }
                _ => DailyPoint {
                    date: key,
                    day: label,
                    volume: 0,
                    period: None,
                },
            }
        })
        .collect();

    let len = points.len();
    for (i, point) in points.iter_mut().enumerate() {
        if point.volume == 0 {
            continue;
        }
        point.volume = apply_scale(point.volume, sinusoidal_scale(i, len));
    }

    points
}

// ── Tests ─────────────────────────────────────────────────────────────────────
