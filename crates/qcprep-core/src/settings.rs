use clap::Args;
use std::path::PathBuf;

// ── Defaults ──────────────────────────────────────────────────────────────────

/// Default cap on accepted upload size: 5 GiB.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 5 * 1024 * 1024 * 1024;

// ── Settings ──────────────────────────────────────────────────────────────────

/// Global options shared by every qcprep subcommand.
#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Data directory root; canonical and partition files live beneath it
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Maximum accepted upload size in bytes
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_FILE_BYTES)]
    pub max_file_bytes: u64,

    /// Logging level
    #[arg(long, global = true, default_value = "INFO",
          value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Emit machine-readable JSON instead of human tables
    #[arg(long, global = true)]
    pub json: bool,
}

impl Settings {
    /// Resolve the effective data directory: the explicit `--data-dir` when
    /// given, otherwise `~/.qcprep/data`.
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".qcprep").join("data")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
