//! Window evaluation pipeline.
//!
//! Validates the three date windows against a dataset handle, then runs the
//! partition split and the daily aggregation as two concurrent blocking
//! tasks — each is an independent top-to-bottom scan of the same stable
//! canonical file, which is safe as long as no ingestion is overwriting
//! that file (the caller's at-most-one-writer obligation).

use anyhow::anyhow;
use qcprep_core::error::{PrepError, Result};
use qcprep_core::models::{
    CanonicalDataset, DateWindows, Partition, PeriodSummary, WindowReport,
};
use qcprep_core::windows::validate_windows;
use qcprep_data::daily::aggregate_daily;
use qcprep_data::estimate::{estimate_period_counts, estimate_total_records};
use qcprep_data::layout::StorageLayout;
use qcprep_data::splitter::{split_partitions, SplitOutcome};
use tracing::info;

// ── Exact evaluation ──────────────────────────────────────────────────────────

/// Validate the windows, split the canonical file into partition files, and
/// build the smoothed daily series.
///
/// Returns the matching typed window error when validation fails; no
/// partition work starts in that case.
pub async fn evaluate_windows(
    dataset: &CanonicalDataset,
    windows: &DateWindows,
    layout: &StorageLayout,
) -> Result<WindowReport> {
    validate_windows(windows, dataset.earliest, dataset.latest).into_result()?;

    let split_task = {
        let dataset = dataset.clone();
        let windows = windows.clone();
        let layout = layout.clone();
        tokio::task::spawn_blocking(move || split_partitions(&dataset, &windows, &layout))
    };
    let daily_task = {
        let dataset = dataset.clone();
        let windows = windows.clone();
        tokio::task::spawn_blocking(move || aggregate_daily(&dataset, &windows))
    };

    let (split, daily) = tokio::try_join!(split_task, daily_task)
        .map_err(|e| PrepError::Other(anyhow!("evaluation worker failed: {e}")))?;
    let split = split?;
    let daily = daily?;

    info!(
        dataset = %dataset.name,
        training = split.training,
        testing = split.testing,
        simulation = split.simulation,
        "window evaluation complete"
    );

    Ok(WindowReport {
        periods: exact_periods(windows, &split),
        unassigned: split.unassigned,
        skipped: split.skipped,
        daily,
        files: split.files,
    })
}

/// Per-window summaries backed by the exact split counts.
fn exact_periods(windows: &DateWindows, split: &SplitOutcome) -> Vec<PeriodSummary> {
    Partition::ALL
        .into_iter()
        .map(|partition| {
            let window = windows.get(partition);
            PeriodSummary {
                partition,
                start: window.start,
                end: window.end,
                duration_days: window.duration_days(),
                record_count: split.count(partition),
            }
        })
        .collect()
}

// ── Coarse preview ────────────────────────────────────────────────────────────

/// Fast proportional preview of the per-window counts.
///
/// Approximates the total from the canonical file's byte size and spreads
/// it over the window day spans. Never a substitute for
/// [`evaluate_windows`] — partition files and the report always come from
/// the exact passes.
pub fn quick_estimate(
    dataset: &CanonicalDataset,
    windows: &DateWindows,
) -> Result<Vec<PeriodSummary>> {
    validate_windows(windows, dataset.earliest, dataset.latest).into_result()?;

    let bytes = std::fs::metadata(&dataset.path)
        .map_err(|e| PrepError::storage(&dataset.path, e))?
        .len();

    Ok(estimate_period_counts(windows, estimate_total_records(bytes)))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
