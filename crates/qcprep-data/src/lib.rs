//! Streaming passes over dataset files for qcprep.
//!
//! Responsible for ingesting uploaded CSV files into canonical prepared
//! files, splitting a canonical file into partition files, building the
//! smoothed daily series, the coarse proportional estimator, and the
//! prepared-dataset history listing. Every pass streams row-at-a-time so
//! multi-gigabyte inputs never need to fit in memory.

pub mod daily;
pub mod estimate;
pub mod history;
pub mod ingest;
pub mod layout;
pub mod splitter;

pub use qcprep_core as core;
