//! One-pass routing of canonical records into the three partition files.

use std::fs::File;
use std::io::BufReader;

use qcprep_core::error::{PrepError, Result};
use qcprep_core::models::{CanonicalDataset, DateWindows, Partition, PartitionFiles};
use qcprep_core::time_axis::{parse_timestamp, SYNTHETIC_TIMESTAMP_COLUMN};
use tracing::{debug, info};

use crate::layout::StorageLayout;

// ── SplitOutcome ──────────────────────────────────────────────────────────────

/// Counts and output locations from one partition split pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOutcome {
    pub files: PartitionFiles,
    pub training: u64,
    pub testing: u64,
    pub simulation: u64,
    /// Records with a parseable timestamp outside all three windows.
    pub unassigned: u64,
    /// Records whose synthetic timestamp failed to parse.
    pub skipped: u64,
}

impl SplitOutcome {
    pub fn count(&self, partition: Partition) -> u64 {
        match partition {
            Partition::Training => self.training,
            Partition::Testing => self.testing,
            Partition::Simulation => self.simulation,
        }
    }
}

// ── Split pass ────────────────────────────────────────────────────────────────

/// Stream the canonical file once, routing each record into at most one of
/// three newly created partition files.
///
/// Membership is an inclusive bounds check probed in fixed
/// Training → Testing → Simulation order; records outside all windows are
/// counted but written nowhere. Records whose `synthetic_timestamp` does
/// not parse are skipped silently — our own writer never produces them, but
/// a hand-edited canonical file might.
pub fn split_partitions(
    dataset: &CanonicalDataset,
    windows: &DateWindows,
    layout: &StorageLayout,
) -> Result<SplitOutcome> {
    layout.ensure()?;

    let file = File::open(&dataset.path).map_err(|e| PrepError::storage(&dataset.path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(BufReader::new(file));

    let headers = reader.headers()?.clone();
    let ts_idx = headers
        .iter()
        .position(|h| h == SYNTHETIC_TIMESTAMP_COLUMN);

    let files = layout.partition_files(&dataset.name);
    let mut writers = Vec::with_capacity(Partition::ALL.len());
    for partition in Partition::ALL {
        let path = files.get(partition);
        let out = File::create(path).map_err(|e| PrepError::storage(path, e))?;
        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(&headers)?;
        writers.push(writer);
    }

    let mut outcome = SplitOutcome {
        files: files.clone(),
        training: 0,
        testing: 0,
        simulation: 0,
        unassigned: 0,
        skipped: 0,
    };

    let mut record = csv::StringRecord::new();
    while reader.read_record(&mut record)? {
        let timestamp = ts_idx
            .and_then(|i| record.get(i))
            .and_then(parse_timestamp);

        let Some(ts) = timestamp else {
            outcome.skipped += 1;
            debug!(dataset = %dataset.name, "skipping record with unparseable timestamp");
            continue;
        };

        match windows.classify(ts) {
            Some(Partition::Training) => {
                writers[0].write_record(&record)?;
                outcome.training += 1;
            }
            Some(Partition::Testing) => {
                writers[1].write_record(&record)?;
                outcome.testing += 1;
            }
            Some(Partition::Simulation) => {
                writers[2].write_record(&record)?;
                outcome.simulation += 1;
            }
            None => outcome.unassigned += 1,
        }
    }

    for (partition, writer) in Partition::ALL.into_iter().zip(writers.iter_mut()) {
        writer
            .flush()
            .map_err(|e| PrepError::storage(files.get(partition), e))?;
    }

    info!(
        dataset = %dataset.name,
        training = outcome.training,
        testing = outcome.testing,
        simulation = outcome.simulation,
        unassigned = outcome.unassigned,
        skipped = outcome.skipped,
        "partition split complete"
    );

    Ok(outcome)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
