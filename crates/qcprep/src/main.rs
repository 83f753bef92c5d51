mod bootstrap;

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use qcprep_core::models::{
    DailyPoint, DatasetEntry, DateWindow, DateWindows, IngestionSummary, PeriodSummary,
    WindowReport,
};
use qcprep_core::settings::Settings;
use qcprep_core::time_axis::{parse_timestamp, TIMESTAMP_FORMAT};
use qcprep_data::history::list_datasets;
use qcprep_data::ingest;
use qcprep_data::layout::StorageLayout;
use qcprep_runtime::pipeline::{evaluate_windows, quick_estimate};
use qcprep_runtime::store::DatasetStore;
use serde_json::json;

// ── CLI definition ────────────────────────────────────────────────────────────

/// Prepare quality-control datasets for a modeling workflow
#[derive(Parser, Debug)]
#[command(
    name = "qcprep",
    about = "Prepare quality-control datasets for a modeling workflow",
    version
)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ingest a CSV dataset into its canonical prepared file
    Ingest {
        /// Source CSV file
        file: PathBuf,
    },

    /// Validate date windows, split partitions, and build the daily series
    Windows {
        /// Dataset name (the source file's stem)
        dataset: String,

        /// Ingest this file first, then evaluate in the same run
        #[arg(long)]
        file: Option<PathBuf>,

        #[command(flatten)]
        windows: WindowArgs,
    },

    /// Coarse proportional preview of per-window record counts
    Estimate {
        /// Dataset name (the source file's stem)
        dataset: String,

        #[command(flatten)]
        windows: WindowArgs,
    },

    /// List previously prepared datasets, newest first
    History,
}

#[derive(Args, Debug, Clone)]
struct WindowArgs {
    /// Training window start (YYYY-MM-DD or "YYYY-MM-DD HH:MM:SS")
    #[arg(long, value_parser = parse_instant)]
    train_start: NaiveDateTime,

    /// Training window end
    #[arg(long, value_parser = parse_instant)]
    train_end: NaiveDateTime,

    /// Testing window start
    #[arg(long, value_parser = parse_instant)]
    test_start: NaiveDateTime,

    /// Testing window end
    #[arg(long, value_parser = parse_instant)]
    test_end: NaiveDateTime,

    /// Simulation window start
    #[arg(long, value_parser = parse_instant)]
    sim_start: NaiveDateTime,

    /// Simulation window end
    #[arg(long, value_parser = parse_instant)]
    sim_end: NaiveDateTime,
}

impl WindowArgs {
    fn into_windows(self) -> DateWindows {
        DateWindows {
            training: DateWindow::new(self.train_start, self.train_end),
            testing: DateWindow::new(self.test_start, self.test_end),
            simulation: DateWindow::new(self.sim_start, self.sim_end),
        }
    }
}

fn parse_instant(s: &str) -> Result<NaiveDateTime, String> {
    parse_timestamp(s)
        .ok_or_else(|| format!("unrecognised date \"{s}\"; use YYYY-MM-DD or \"YYYY-MM-DD HH:MM:SS\""))
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    bootstrap::setup_logging(&cli.settings.log_level)?;

    let layout = StorageLayout::new(cli.settings.resolve_data_dir());
    bootstrap::ensure_directories(&layout)?;

    tracing::info!("qcprep v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Ingest { file } => {
            let (_, summary) = ingest::ingest_file(&file, cli.settings.max_file_bytes, &layout)?;
            if cli.settings.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
        }

        Command::Windows {
            dataset,
            file,
            windows,
        } => {
            let mut store = DatasetStore::new();
            match file {
                Some(path) => {
                    let (handle, _) =
                        ingest::ingest_file(&path, cli.settings.max_file_bytes, &layout)?;
                    store.insert(handle);
                }
                None => {
                    store.insert(ingest::load_handle(&layout, &dataset)?);
                }
            }
            let handle = store.get(&dataset)?;

            let report = evaluate_windows(handle, &windows.into_windows(), &layout).await?;
            if cli.settings.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }

        Command::Estimate { dataset, windows } => {
            let handle = ingest::load_handle(&layout, &dataset)?;
            let estimates = quick_estimate(&handle, &windows.into_windows())?;
            if cli.settings.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({ "estimated_periods": estimates }))?
                );
            } else {
                println!("Coarse estimate (uniform-density approximation, not exact):");
                print_periods(&estimates);
            }
        }

        Command::History => {
            let entries = list_datasets(&layout);
            if cli.settings.json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                print_history(&entries);
            }
        }
    }

    Ok(())
}

// ── Output helpers ────────────────────────────────────────────────────────────

fn print_summary(summary: &IngestionSummary) {
    println!("Ingested {}", summary.file_name);
    println!("  records:    {}", summary.total_records);
    println!("  columns:    {}", summary.total_columns);
    println!("  pass rate:  {}%", summary.pass_rate);
    println!(
        "  span:       {} .. {}",
        summary.earliest_timestamp.format(TIMESTAMP_FORMAT),
        summary.latest_timestamp.format(TIMESTAMP_FORMAT)
    );
    println!("  file size:  {}", summary.file_size);
}

fn print_periods(periods: &[PeriodSummary]) {
    for p in periods {
        println!(
            "  {:<18} {} .. {}  ({} days, {} records)",
            p.partition.period_name(),
            p.start.format(TIMESTAMP_FORMAT),
            p.end.format(TIMESTAMP_FORMAT),
            p.duration_days,
            p.record_count
        );
    }
}

fn print_report(report: &WindowReport) {
    println!("Date ranges validated successfully!");
    print_periods(&report.periods);
    println!("  unassigned: {} records", report.unassigned);
    if report.skipped > 0 {
        println!("  skipped:    {} records with unparseable timestamps", report.skipped);
    }

    println!("Partition files:");
    println!("  {}", report.files.training.display());
    println!("  {}", report.files.testing.display());
    println!("  {}", report.files.simulation.display());

    println!("Daily series:");
    for point in &report.daily {
        print_daily_point(point);
    }
}

fn print_daily_point(point: &DailyPoint) {
    let label = point
        .period
        .map(|p| p.label())
        .unwrap_or("-");
    println!("  {:<7} {:>8}  {}", point.day, point.volume, label);
}

fn print_history(entries: &[DatasetEntry]) {
    if entries.is_empty() {
        println!("No prepared datasets found.");
        return;
    }
    for entry in entries {
        println!(
            "  {:<24} {:>12} bytes  modified {}",
            entry.name,
            entry.bytes,
            entry.modified.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
