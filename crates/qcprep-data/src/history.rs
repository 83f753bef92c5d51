//! Listing of previously prepared datasets.
//!
//! Informational only: the pipeline itself always works from an explicit
//! [`CanonicalDataset`] handle, never from "the newest file in the
//! directory".
//!
//! [`CanonicalDataset`]: qcprep_core::models::CanonicalDataset

use chrono::{DateTime, Utc};
use qcprep_core::models::DatasetEntry;
use tracing::warn;

use crate::layout::{StorageLayout, CANONICAL_SUFFIX};

/// Find all canonical files under the prepared directory, newest first.
pub fn list_datasets(layout: &StorageLayout) -> Vec<DatasetEntry> {
    let dir = layout.prepared_dir();
    if !dir.exists() {
        warn!("Prepared directory does not exist: {}", dir.display());
        return Vec::new();
    }

    let mut entries: Vec<DatasetEntry> = walkdir::WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let name = file_name.strip_suffix(CANONICAL_SUFFIX)?.to_string();
            let metadata = entry.metadata().ok()?;
            let modified = metadata.modified().ok()?;
            Some(DatasetEntry {
                name,
                path: entry.into_path(),
                bytes: metadata.len(),
                modified: DateTime::<Utc>::from(modified),
            })
        })
        .collect();

    entries.sort_by(|a, b| b.modified.cmp(&a.modified).then(a.name.cmp(&b.name)));
    entries
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(layout: &StorageLayout, name: &str, content: &str) {
        layout.ensure().unwrap();
        let path = layout.prepared_dir().join(name);
        let mut file = std::fs::File::create(path).unwrap();
        write!(file, "{content}").unwrap();
    }

    #[test]
    fn test_lists_only_canonical_files() {
        let tmp = TempDir::new().unwrap();
        let layout = StorageLayout::new(tmp.path());
        write_file(&layout, "a_prepared.csv", "A,Response\n1,1\n");
        write_file(&layout, "a_prepared.json", "{}");
        write_file(&layout, "a_training.csv", "A,Response\n");
        write_file(&layout, "notes.txt", "scratch");

        let entries = list_datasets(&layout);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "a");
        assert!(entries[0].bytes > 0);
    }

    #[test]
    fn test_newest_first_ordering() {
        let tmp = TempDir::new().unwrap();
        let layout = StorageLayout::new(tmp.path());
        write_file(&layout, "old_prepared.csv", "x\n1\n");
        // Push the second file's mtime measurably past the first.
        std::thread::sleep(std::time::Duration::from_millis(20));
        write_file(&layout, "new_prepared.csv", "x\n1\n");

        let entries = list_datasets(&layout);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["new", "old"]);
    }

    #[test]
    fn test_missing_directory_yields_empty_list() {
        let tmp = TempDir::new().unwrap();
        let layout = StorageLayout::new(tmp.path().join("nope"));
        assert!(list_datasets(&layout).is_empty());
    }
}
