use qcprep_data::layout::StorageLayout;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ───────────────────────────────────────────────────────

/// Ensure the prepared-data directory hierarchy exists before any
/// subcommand touches it.
pub fn ensure_directories(layout: &StorageLayout) -> anyhow::Result<()> {
    layout.ensure()?;
    Ok(())
}

// ── Logging bootstrap ─────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// `log_level` is mapped to a [`tracing_subscriber::EnvFilter`] directive.
/// Falls back to `"info"` if the level string is not recognised.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let normalised = match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARNING" => "warn",
        "ERROR" => "error",
        other => return setup_with_directive(&other.to_lowercase()),
    };
    setup_with_directive(normalised)
}

fn setup_with_directive(directive: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer().with_target(false).with_thread_ids(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .init();

    Ok(())
}
