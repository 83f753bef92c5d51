//! Filesystem layout for prepared datasets.
//!
//! Every on-disk artifact for a dataset derives from its source filename's
//! stem, so re-running any stage overwrites the previous output instead of
//! accumulating stale files.

use std::path::{Path, PathBuf};

use qcprep_core::error::{PrepError, Result};
use qcprep_core::models::{Partition, PartitionFiles};

/// Suffix of every canonical file, e.g. `sensors_prepared.csv`.
pub const CANONICAL_SUFFIX: &str = "_prepared.csv";

/// Suffix of every serialized dataset handle, e.g. `sensors_prepared.json`.
pub const HANDLE_SUFFIX: &str = "_prepared.json";

/// Directory layout rooted at the configured data directory.
#[derive(Debug, Clone)]
pub struct StorageLayout {
    prepared_dir: PathBuf,
}

impl StorageLayout {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            prepared_dir: data_dir.into().join("prepared"),
        }
    }

    /// Create the on-disk directories if absent.
    pub fn ensure(&self) -> Result<()> {
        std::fs::create_dir_all(&self.prepared_dir)
            .map_err(|e| PrepError::storage(&self.prepared_dir, e))
    }

    /// Directory holding canonical and partition files.
    pub fn prepared_dir(&self) -> &Path {
        &self.prepared_dir
    }

    /// Canonical file location for a dataset, `<stem>_prepared.csv`.
    pub fn canonical_path(&self, name: &str) -> PathBuf {
        self.prepared_dir.join(format!("{name}{CANONICAL_SUFFIX}"))
    }

    /// Serialized handle location for a dataset, `<stem>_prepared.json`.
    pub fn handle_path(&self, name: &str) -> PathBuf {
        self.prepared_dir.join(format!("{name}{HANDLE_SUFFIX}"))
    }

    /// Partition file location, e.g. `<stem>_training.csv`.
    pub fn partition_path(&self, name: &str, partition: Partition) -> PathBuf {
        let suffix = partition.label().to_lowercase();
        self.prepared_dir.join(format!("{name}_{suffix}.csv"))
    }

    /// All three partition file locations for a dataset.
    pub fn partition_files(&self, name: &str) -> PartitionFiles {
        PartitionFiles {
            training: self.partition_path(name, Partition::Training),
            testing: self.partition_path(name, Partition::Testing),
            simulation: self.partition_path(name, Partition::Simulation),
        }
    }

    /// Dataset name for a source filename: the stem before the extension.
    pub fn dataset_name(file_name: &str) -> String {
        Path::new(file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.to_string())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
