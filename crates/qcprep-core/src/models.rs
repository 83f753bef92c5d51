use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Partition ─────────────────────────────────────────────────────────────────

/// One of the three modeling partitions a canonical record can be routed to.
///
/// Records outside all three date windows belong to no partition: they are
/// excluded from partition files but still counted as baseline in the daily
/// series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Partition {
    Training,
    Testing,
    Simulation,
}

impl Partition {
    /// The three partitions in routing order.
    pub const ALL: [Partition; 3] = [
        Partition::Training,
        Partition::Testing,
        Partition::Simulation,
    ];

    /// Canonical display label, as used in reports and daily series.
    pub fn label(&self) -> &'static str {
        match self {
            Partition::Training => "Training",
            Partition::Testing => "Testing",
            Partition::Simulation => "Simulation",
        }
    }

    /// Report heading, e.g. `"Training Period"`.
    pub fn period_name(&self) -> String {
        format!("{} Period", self.label())
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Date windows ──────────────────────────────────────────────────────────────

/// An inclusive `[start, end]` slice of the synthetic time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Inclusive membership test on both bounds.
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        self.start <= ts && ts <= self.end
    }

    /// Inclusive day span, e.g. `[Jan 1, Jan 3]` covers 3 days.
    pub fn duration_days(&self) -> i64 {
        (self.end.date() - self.start.date()).num_days() + 1
    }
}

/// The three user-supplied windows, in their required chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindows {
    pub training: DateWindow,
    pub testing: DateWindow,
    pub simulation: DateWindow,
}

impl DateWindows {
    /// The window for a given partition.
    pub fn get(&self, partition: Partition) -> &DateWindow {
        match partition {
            Partition::Training => &self.training,
            Partition::Testing => &self.testing,
            Partition::Simulation => &self.simulation,
        }
    }

    /// First window containing `ts`, probed in fixed
    /// Training → Testing → Simulation order.
    ///
    /// The windows are validated non-overlapping upstream, so the fixed
    /// order is a safety net rather than a resolution mechanism.
    pub fn classify(&self, ts: NaiveDateTime) -> Option<Partition> {
        Partition::ALL
            .into_iter()
            .find(|p| self.get(*p).contains(ts))
    }
}

// ── Ingestion outputs ─────────────────────────────────────────────────────────

/// Aggregate summary computed in the same pass that writes the canonical
/// file. Held by the caller; the canonical file is the durable artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionSummary {
    /// Original upload filename.
    pub file_name: String,
    /// Number of data rows written to the canonical file.
    pub total_records: u64,
    /// Source columns plus the one synthetic timestamp column.
    pub total_columns: usize,
    /// Percentage of rows whose `Response` value strict-parses to the
    /// integer 1, rounded to two decimals. 0.0 for an empty dataset.
    pub pass_rate: f64,
    /// Synthetic timestamp of the first record.
    pub earliest_timestamp: NaiveDateTime,
    /// Synthetic timestamp of the last record.
    pub latest_timestamp: NaiveDateTime,
    /// Human-readable upload size, e.g. `"1.5 MB"`.
    pub file_size: String,
}

/// Handle to one prepared canonical file.
///
/// Returned by ingestion and threaded explicitly into every later pass —
/// downstream work never rediscovers the canonical file by scanning a
/// directory for the newest entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalDataset {
    /// Dataset name: the source filename's stem.
    pub name: String,
    /// Location of the canonical file.
    pub path: PathBuf,
    /// Full canonical header, `synthetic_timestamp` last.
    pub headers: Vec<String>,
    /// Number of data rows.
    pub records: u64,
    /// First synthetic timestamp.
    pub earliest: NaiveDateTime,
    /// Last synthetic timestamp.
    pub latest: NaiveDateTime,
}

// ── Window evaluation outputs ─────────────────────────────────────────────────

/// Per-window record count with its bounds and day span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub partition: Partition,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Inclusive day span of the window.
    pub duration_days: i64,
    pub record_count: u64,
}

/// One day of the visualization series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPoint {
    /// Day key, `%Y-%m-%d`.
    pub date: String,
    /// Display label, e.g. `"Jan 1"`.
    pub day: String,
    /// Smoothed record volume for the day.
    pub volume: u64,
    /// Dominant partition label, `None` for baseline/zero days.
    pub period: Option<Partition>,
}

/// Locations of the three partition files for one dataset. Names are fixed
/// per dataset, so re-partitioning overwrites rather than accumulates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionFiles {
    pub training: PathBuf,
    pub testing: PathBuf,
    pub simulation: PathBuf,
}

impl PartitionFiles {
    pub fn get(&self, partition: Partition) -> &PathBuf {
        match partition {
            Partition::Training => &self.training,
            Partition::Testing => &self.testing,
            Partition::Simulation => &self.simulation,
        }
    }
}

/// Everything a validated partition run hands to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowReport {
    /// Exact per-window counts, Training → Testing → Simulation.
    pub periods: Vec<PeriodSummary>,
    /// Records outside all three windows (baseline).
    pub unassigned: u64,
    /// Records whose synthetic timestamp failed to parse and were skipped.
    pub skipped: u64,
    /// Continuous smoothed series over the visualization month.
    pub daily: Vec<DailyPoint>,
    /// Where the partition files were written.
    pub files: PartitionFiles,
}

// ── History listing ───────────────────────────────────────────────────────────

/// One previously prepared dataset found on disk. Informational listing
/// only — the pipeline always works from an explicit [`CanonicalDataset`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetEntry {
    pub name: String,
    pub path: PathBuf,
    pub bytes: u64,
    pub modified: DateTime<Utc>,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
