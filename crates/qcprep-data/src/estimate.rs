//! Coarse proportional estimate of per-window record counts.
//!
//! Used when a preliminary summary is needed before the exact streaming
//! passes finish. Assumes uniform record density over the window day spans
//! and approximates the total record count from the file's byte size. This
//! estimator is NOT authoritative: partition file contents and the window
//! report always come from the exact passes, never from here.

use qcprep_core::models::{DateWindows, Partition, PeriodSummary};

/// Assumed average encoded row width in bytes. Known-approximate.
pub const ASSUMED_ROW_BYTES: u64 = 100;

/// Approximate total record count from a canonical file's byte size.
pub fn estimate_total_records(file_bytes: u64) -> u64 {
    file_bytes / ASSUMED_ROW_BYTES
}

/// Distribute an estimated total across the three windows in proportion to
/// their inclusive day spans.
pub fn estimate_period_counts(
    windows: &DateWindows,
    estimated_total: u64,
) -> Vec<PeriodSummary> {
    let total_days: i64 = Partition::ALL
        .iter()
        .map(|p| windows.get(*p).duration_days())
        .sum();

    Partition::ALL
        .into_iter()
        .map(|partition| {
            let window = windows.get(partition);
            let days = window.duration_days();
            let share = if total_days > 0 {
                (estimated_total as f64 * days as f64 / total_days as f64) as u64
            } else {
                0
            };
            PeriodSummary {
                partition,
                start: window.start,
                end: window.end,
                duration_days: days,
                record_count: share,
            }
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDateTime};
    use qcprep_core::models::DateWindow;
    use qcprep_core::time_axis::base_epoch;

    fn day(d: u32) -> NaiveDateTime {
        base_epoch() + Duration::days(i64::from(d) - 1)
    }

    fn windows(t: (u32, u32), e: (u32, u32), s: (u32, u32)) -> DateWindows {
        DateWindows {
            training: DateWindow::new(day(t.0), day(t.1)),
            testing: DateWindow::new(day(e.0), day(e.1)),
            simulation: DateWindow::new(day(s.0), day(s.1)),
        }
    }

    #[test]
    fn test_total_record_estimate_from_bytes() {
        assert_eq!(estimate_total_records(0), 0);
        assert_eq!(estimate_total_records(99), 0);
        assert_eq!(estimate_total_records(1_000), 10);
        assert_eq!(estimate_total_records(1_050), 10);
    }

    #[test]
    fn test_equal_spans_share_equally() {
        let summaries = estimate_period_counts(&windows((1, 3), (4, 6), (7, 9)), 300);
        assert_eq!(summaries.len(), 3);
        for summary in &summaries {
            assert_eq!(summary.duration_days, 3);
            assert_eq!(summary.record_count, 100);
        }
    }

    #[test]
    fn test_shares_are_proportional_to_day_spans() {
        // 2 + 4 + 10 days; 1600 estimated records.
        let summaries = estimate_period_counts(&windows((1, 2), (5, 8), (11, 20)), 1_600);
        assert_eq!(summaries[0].record_count, 200);
        assert_eq!(summaries[1].record_count, 400);
        assert_eq!(summaries[2].record_count, 1_000);
    }

    #[test]
    fn test_estimates_are_never_negative_and_bounded_by_total() {
        let summaries = estimate_period_counts(&windows((1, 3), (4, 6), (7, 9)), 7);
        let sum: u64 = summaries.iter().map(|s| s.record_count).sum();
        assert!(sum <= 7);
    }

    #[test]
    fn test_order_of_magnitude_against_exact_uniform_data() {
        // 9 days of perfectly uniform data at ~100 rows/day, encoded at
        // roughly the assumed row width: the estimate must land in the same
        // order of magnitude as the exact per-window count (300 each).
        let file_bytes = 9 * 100 * ASSUMED_ROW_BYTES;
        let summaries = estimate_period_counts(
            &windows((1, 3), (4, 6), (7, 9)),
            estimate_total_records(file_bytes),
        );
        for summary in &summaries {
            assert!(
                (30..=3_000).contains(&summary.record_count),
                "estimate {} is orders of magnitude off",
                summary.record_count
            );
        }
    }
}
