use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the preparation pipeline.
#[derive(Error, Debug)]
pub enum PrepError {
    /// The uploaded stream was zero-length or contained no data rows.
    #[error("File is empty or contains no data rows")]
    EmptyInput,

    /// The source filename does not carry the recognised delimited-text
    /// extension.
    #[error("Unsupported file format \"{0}\": expected a .csv file")]
    UnsupportedFormat(String),

    /// The declared upload length exceeds the configured cap.
    #[error("File size {size} bytes exceeds the maximum allowed {max} bytes")]
    FileTooLarge { size: u64, max: u64 },

    /// The header row lacks the mandatory `Response` column.
    #[error("CSV file must contain a \"Response\" column")]
    MissingResponseColumn,

    /// Partitioning or aggregation was requested for a dataset that has
    /// never been ingested.
    #[error("No prepared dataset named \"{0}\" found; upload a dataset first")]
    NoCanonicalFile(String),

    /// A date window's own start/end is inverted.
    #[error("{0}")]
    WindowOrder(String),

    /// The three windows are not strictly sequential.
    #[error("{0}")]
    WindowSequence(String),

    /// The windows exceed the ingested dataset's timestamp span.
    #[error("{0}")]
    WindowOutOfRange(String),

    /// A file could not be created, read, or written.
    #[error("Storage failure at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The delimited stream itself was malformed.
    #[error("Malformed CSV input: {0}")]
    Csv(#[from] csv::Error),

    /// A stored dataset handle could not be parsed.
    #[error("Failed to parse dataset handle: {0}")]
    HandleParse(#[from] serde_json::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PrepError {
    /// Build a [`PrepError::Storage`] from a path and the underlying I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias used throughout the qcprep crates.
pub type Result<T> = std::result::Result<T, PrepError>;
