//! Single-pass ingestion of an uploaded CSV stream.
//!
//! Validates the schema, assigns the synthetic timestamp to every data row,
//! and writes the canonical prepared file while accumulating the ingestion
//! summary — one forward pass, row-at-a-time, so peak memory is O(1) in the
//! record count.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use qcprep_core::error::{PrepError, Result};
use qcprep_core::formatting::{format_file_size, percentage};
use qcprep_core::models::{CanonicalDataset, IngestionSummary};
use qcprep_core::time_axis::{
    base_epoch, format_timestamp, timestamp_for_row, SYNTHETIC_TIMESTAMP_COLUMN,
};
use tracing::{debug, info};

use crate::layout::StorageLayout;

/// The one mandatory source column.
pub const RESPONSE_COLUMN: &str = "Response";

/// The only recognised source extension.
const CSV_EXTENSION: &str = ".csv";

// ── Public API ────────────────────────────────────────────────────────────────

/// Ingest a byte stream with a claimed filename and length.
///
/// On success the canonical file `<stem>_prepared.csv` and its serialized
/// handle `<stem>_prepared.json` exist under the layout's prepared
/// directory; a second ingestion for the same source name overwrites both
/// (last-write-wins, no versioning).
pub fn ingest_stream<R: Read>(
    input: R,
    file_name: &str,
    declared_len: u64,
    max_len: u64,
    layout: &StorageLayout,
) -> Result<(CanonicalDataset, IngestionSummary)> {
    if declared_len == 0 {
        return Err(PrepError::EmptyInput);
    }

    let extension = file_extension(file_name);
    if !extension.eq_ignore_ascii_case(CSV_EXTENSION) {
        return Err(PrepError::UnsupportedFormat(extension.to_string()));
    }

    if declared_len > max_len {
        return Err(PrepError::FileTooLarge {
            size: declared_len,
            max: max_len,
        });
    }

    layout.ensure()?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(PrepError::EmptyInput);
    }

    let response_idx = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(RESPONSE_COLUMN))
        .ok_or(PrepError::MissingResponseColumn)?;

    let name = StorageLayout::dataset_name(file_name);
    let canonical_path = layout.canonical_path(&name);

    let out_file =
        File::create(&canonical_path).map_err(|e| PrepError::storage(&canonical_path, e))?;
    let mut writer = csv::Writer::from_writer(out_file);

    writer.write_record(
        headers
            .iter()
            .chain(std::iter::once(SYNTHETIC_TIMESTAMP_COLUMN)),
    )?;

    let mut total: u64 = 0;
    let mut passes: u64 = 0;
    let mut record = csv::StringRecord::new();

    while reader.read_record(&mut record)? {
        // Row index doubles as the second offset from the base epoch.
        let stamp = format_timestamp(timestamp_for_row(total));

        if record.get(response_idx).is_some_and(is_pass) {
            passes += 1;
        }

        writer.write_record(record.iter().chain(std::iter::once(stamp.as_str())))?;
        total += 1;
    }
    writer
        .flush()
        .map_err(|e| PrepError::storage(&canonical_path, e))?;

    if total == 0 {
        // A header with no data rows never becomes a canonical file.
        let _ = std::fs::remove_file(&canonical_path);
        return Err(PrepError::EmptyInput);
    }

    let earliest = base_epoch();
    let latest = timestamp_for_row(total - 1);

    let summary = IngestionSummary {
        file_name: file_name.to_string(),
        total_records: total,
        total_columns: headers.len() + 1,
        pass_rate: percentage(passes as f64, total as f64, 2),
        earliest_timestamp: earliest,
        latest_timestamp: latest,
        file_size: format_file_size(declared_len),
    };

    let mut canonical_headers: Vec<String> = headers.iter().map(str::to_string).collect();
    canonical_headers.push(SYNTHETIC_TIMESTAMP_COLUMN.to_string());

    let dataset = CanonicalDataset {
        name,
        path: canonical_path,
        headers: canonical_headers,
        records: total,
        earliest,
        latest,
    };
    write_handle(&dataset, layout)?;

    info!(
        dataset = %dataset.name,
        records = total,
        pass_rate = summary.pass_rate,
        "ingestion complete"
    );

    Ok((dataset, summary))
}

/// Ingest a file already on disk; length is taken from its metadata.
pub fn ingest_file(
    path: &Path,
    max_len: u64,
    layout: &StorageLayout,
) -> Result<(CanonicalDataset, IngestionSummary)> {
    let metadata = std::fs::metadata(path).map_err(|e| PrepError::storage(path, e))?;
    let file = File::open(path).map_err(|e| PrepError::storage(path, e))?;

    let file_name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    ingest_stream(
        BufReader::new(file),
        &file_name,
        metadata.len(),
        max_len,
        layout,
    )
}

/// Load the serialized handle written by a previous ingestion.
///
/// This is the only sanctioned way to resume work on a dataset across
/// processes — the prepared directory is never scanned for "the newest
/// file".
pub fn load_handle(layout: &StorageLayout, name: &str) -> Result<CanonicalDataset> {
    let handle_path = layout.handle_path(name);
    if !handle_path.exists() {
        return Err(PrepError::NoCanonicalFile(name.to_string()));
    }

    let content =
        std::fs::read_to_string(&handle_path).map_err(|e| PrepError::storage(&handle_path, e))?;
    let dataset: CanonicalDataset = serde_json::from_str(&content)?;

    if !dataset.path.exists() {
        debug!(dataset = name, "handle present but canonical file missing");
        return Err(PrepError::NoCanonicalFile(name.to_string()));
    }

    Ok(dataset)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Strict pass test: the value must integer-parse to exactly 1.
/// Boolean or decimal spellings ("true", "1.0") are not passes.
fn is_pass(value: &str) -> bool {
    value.trim().parse::<i64>().map(|v| v == 1).unwrap_or(false)
}

/// Extension substring from the last `.`, empty when absent or trailing.
fn file_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) if idx + 1 < file_name.len() => &file_name[idx..],
        _ => "",
    }
}

/// Serialize the handle next to the canonical file, via temp-file rename.
fn write_handle(dataset: &CanonicalDataset, layout: &StorageLayout) -> Result<()> {
    let path = layout.handle_path(&dataset.name);
    let json = serde_json::to_string_pretty(dataset)?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json).map_err(|e| PrepError::storage(&tmp, e))?;
    std::fs::rename(&tmp, &path).map_err(|e| PrepError::storage(&path, e))?;

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn layout() -> (StorageLayout, TempDir) {
        let tmp = TempDir::new().unwrap();
        (StorageLayout::new(tmp.path()), tmp)
    }

    fn ingest_str(
        content: &str,
        file_name: &str,
        layout: &StorageLayout,
    ) -> Result<(CanonicalDataset, IngestionSummary)> {
        ingest_stream(
            content.as_bytes(),
            file_name,
            content.len() as u64,
            u64::MAX,
            layout,
        )
    }

    const SAMPLE: &str = "A,Response\n1,1\n2,0\n3,1\n4,1\n5,0\n";

    // ── happy path ────────────────────────────────────────────────────────────

    #[test]
    fn test_ingest_summary_matches_sample() {
        let (layout, _tmp) = layout();
        let (dataset, summary) = ingest_str(SAMPLE, "qc.csv", &layout).unwrap();

        assert_eq!(summary.total_records, 5);
        assert_eq!(summary.total_columns, 3);
        assert!((summary.pass_rate - 60.0).abs() < 1e-9);
        assert_eq!(summary.earliest_timestamp, base_epoch());
        assert_eq!(
            summary.latest_timestamp,
            base_epoch() + Duration::seconds(4)
        );
        assert_eq!(summary.file_size, format!("{} B", SAMPLE.len()));

        assert_eq!(dataset.name, "qc");
        assert_eq!(dataset.records, 5);
        assert_eq!(
            dataset.headers,
            vec!["A", "Response", "synthetic_timestamp"]
        );
    }

    #[test]
    fn test_canonical_file_round_trips_synthetic_timestamps() {
        let (layout, _tmp) = layout();
        let (dataset, _) = ingest_str(SAMPLE, "qc.csv", &layout).unwrap();

        let mut reader = csv::Reader::from_path(&dataset.path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec!["A", "Response", "synthetic_timestamp"]
        );

        for (index, row) in reader.records().enumerate() {
            let row = row.unwrap();
            let expected = format_timestamp(timestamp_for_row(index as u64));
            assert_eq!(row.get(2), Some(expected.as_str()));
        }
    }

    #[test]
    fn test_third_row_gets_epoch_plus_two() {
        let (layout, _tmp) = layout();
        ingest_str(SAMPLE, "qc.csv", &layout).unwrap();

        let mut reader = csv::Reader::from_path(layout.canonical_path("qc")).unwrap();
        let third = reader.records().nth(2).unwrap().unwrap();
        assert_eq!(third.get(2), Some("2021-01-01 00:00:02"));
    }

    #[test]
    fn test_existing_timestamp_column_is_passthrough_only() {
        // A source timestamp column must never influence the synthetic axis.
        let content = "ts,Response\n1999-05-05 10:00:00,1\n2030-01-01 00:00:00,0\n";
        let (layout, _tmp) = layout();
        let (dataset, _) = ingest_str(content, "qc.csv", &layout).unwrap();

        let mut reader = csv::Reader::from_path(&dataset.path).unwrap();
        let rows: Vec<csv::StringRecord> =
            reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows[0].get(0), Some("1999-05-05 10:00:00"));
        assert_eq!(rows[0].get(2), Some("2021-01-01 00:00:00"));
        assert_eq!(rows[1].get(2), Some("2021-01-01 00:00:01"));
    }

    #[test]
    fn test_reingest_same_name_overwrites() {
        let (layout, _tmp) = layout();
        ingest_str(SAMPLE, "qc.csv", &layout).unwrap();
        let (dataset, summary) =
            ingest_str("A,Response\n9,1\n", "qc.csv", &layout).unwrap();

        assert_eq!(summary.total_records, 1);
        assert_eq!(dataset.records, 1);

        let mut reader = csv::Reader::from_path(&dataset.path).unwrap();
        assert_eq!(reader.records().count(), 1);
    }

    #[test]
    fn test_response_header_match_is_case_insensitive() {
        let (layout, _tmp) = layout();
        let (_, summary) = ingest_str("a,response\n1,1\n", "qc.csv", &layout).unwrap();
        assert!((summary.pass_rate - 100.0).abs() < 1e-9);
    }

    // ── pass counting ─────────────────────────────────────────────────────────

    #[test]
    fn test_pass_requires_strict_integer_one() {
        let content = "Response\n1\n 1 \n01\ntrue\n1.0\nyes\n2\nno\n";
        let (layout, _tmp) = layout();
        let (_, summary) = ingest_str(content, "qc.csv", &layout).unwrap();

        // "1", " 1 " and "01" parse to 1; the rest do not.
        assert_eq!(summary.total_records, 8);
        assert!((summary.pass_rate - 37.5).abs() < 1e-9);
    }

    // ── rejection paths ───────────────────────────────────────────────────────

    #[test]
    fn test_zero_declared_length_is_empty_input() {
        let (layout, _tmp) = layout();
        let err = ingest_stream("x".as_bytes(), "qc.csv", 0, u64::MAX, &layout).unwrap_err();
        assert!(matches!(err, PrepError::EmptyInput));
    }

    #[test]
    fn test_wrong_extension_is_unsupported_format() {
        let (layout, _tmp) = layout();
        let err = ingest_str(SAMPLE, "qc.xlsx", &layout).unwrap_err();
        assert!(matches!(err, PrepError::UnsupportedFormat(ext) if ext == ".xlsx"));

        let err = ingest_str(SAMPLE, "noext", &layout).unwrap_err();
        assert!(matches!(err, PrepError::UnsupportedFormat(ext) if ext.is_empty()));
    }

    #[test]
    fn test_uppercase_extension_is_accepted() {
        let (layout, _tmp) = layout();
        assert!(ingest_str(SAMPLE, "QC.CSV", &layout).is_ok());
    }

    #[test]
    fn test_oversized_declared_length_is_rejected() {
        let (layout, _tmp) = layout();
        let err =
            ingest_stream(SAMPLE.as_bytes(), "qc.csv", 200, 100, &layout).unwrap_err();
        assert!(matches!(
            err,
            PrepError::FileTooLarge { size: 200, max: 100 }
        ));
    }

    #[test]
    fn test_missing_response_column_is_schema_error() {
        let (layout, _tmp) = layout();
        let err = ingest_str("A,B\n1,2\n", "qc.csv", &layout).unwrap_err();
        assert!(matches!(err, PrepError::MissingResponseColumn));
    }

    #[test]
    fn test_header_only_file_is_empty_input() {
        let (layout, _tmp) = layout();
        let err = ingest_str("A,Response\n", "qc.csv", &layout).unwrap_err();
        assert!(matches!(err, PrepError::EmptyInput));
        // No canonical artifact may survive the rejection.
        assert!(!layout.canonical_path("qc").exists());
    }

    // ── handle file ───────────────────────────────────────────────────────────

    #[test]
    fn test_handle_round_trips() {
        let (layout, _tmp) = layout();
        let (dataset, _) = ingest_str(SAMPLE, "qc.csv", &layout).unwrap();

        let loaded = load_handle(&layout, "qc").unwrap();
        assert_eq!(loaded, dataset);
    }

    #[test]
    fn test_load_handle_unknown_name() {
        let (layout, _tmp) = layout();
        layout.ensure().unwrap();
        let err = load_handle(&layout, "ghost").unwrap_err();
        assert!(matches!(err, PrepError::NoCanonicalFile(name) if name == "ghost"));
    }

    #[test]
    fn test_load_handle_with_deleted_canonical_file() {
        let (layout, _tmp) = layout();
        let (dataset, _) = ingest_str(SAMPLE, "qc.csv", &layout).unwrap();
        std::fs::remove_file(&dataset.path).unwrap();

        let err = load_handle(&layout, "qc").unwrap_err();
        assert!(matches!(err, PrepError::NoCanonicalFile(_)));
    }

    // ── helpers ───────────────────────────────────────────────────────────────

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("a.csv"), ".csv");
        assert_eq!(file_extension("a.tar.gz"), ".gz");
        assert_eq!(file_extension("noext"), "");
        assert_eq!(file_extension("trailing."), "");
    }
}
