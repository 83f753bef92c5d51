//! In-memory registry of prepared datasets.
//!
//! Every later pass receives its [`CanonicalDataset`] from this registry
//! (or from a handle file), never by scanning the prepared directory for
//! the most recently modified entry — two concurrent ingestions of
//! different datasets must not be able to steal each other's canonical
//! file.

use std::collections::HashMap;

use qcprep_core::error::{PrepError, Result};
use qcprep_core::models::CanonicalDataset;
use tracing::debug;

/// Registry of the current canonical dataset per name.
///
/// Insertion is the write point of the at-most-one-writer discipline: a new
/// ingestion for a name replaces the handle that subsequent readers see.
#[derive(Debug, Default)]
pub struct DatasetStore {
    datasets: HashMap<String, CanonicalDataset>,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the handle for a dataset name.
    ///
    /// Returns the previous handle when the ingestion superseded one.
    pub fn insert(&mut self, dataset: CanonicalDataset) -> Option<CanonicalDataset> {
        debug!(dataset = %dataset.name, records = dataset.records, "registering dataset handle");
        self.datasets.insert(dataset.name.clone(), dataset)
    }

    /// Current handle for a name, or `NoCanonicalFile` when nothing has
    /// been ingested under it.
    pub fn get(&self, name: &str) -> Result<&CanonicalDataset> {
        self.datasets
            .get(name)
            .ok_or_else(|| PrepError::NoCanonicalFile(name.to_string()))
    }

    /// Registered dataset names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.datasets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
