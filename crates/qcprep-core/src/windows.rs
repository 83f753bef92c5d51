//! Pure validation of the three user-supplied date windows.
//!
//! An invalid set of windows is a frequent, expected outcome while a user
//! drags range pickers around, so the check returns a structured
//! [`WindowCheck`] value rather than an error. The runtime converts a
//! violation into the matching [`PrepError`] variant only once a caller
//! actually asks for partitioning work.

use chrono::NaiveDateTime;

use crate::error::{PrepError, Result};
use crate::models::{DateWindows, Partition};
use crate::time_axis::DAY_KEY_FORMAT;

// ── WindowCheck ───────────────────────────────────────────────────────────────

/// Outcome of checking three windows against each other and the dataset span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowCheck {
    Valid,
    /// A window's own start is not strictly before its end.
    InvertedWindow(Partition),
    /// `earlier` does not end strictly before `later` begins.
    NonSequential {
        earlier: Partition,
        later: Partition,
    },
    /// The windows reach outside the dataset's `[earliest, latest]` span.
    OutOfDatasetRange {
        earliest: NaiveDateTime,
        latest: NaiveDateTime,
    },
}

impl WindowCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, WindowCheck::Valid)
    }

    /// Human-readable reason for the outcome.
    pub fn message(&self) -> String {
        match self {
            WindowCheck::Valid => "Date ranges validated successfully!".to_string(),
            WindowCheck::InvertedWindow(p) => format!(
                "{} start date must be before {} end date",
                p.label(),
                p.label().to_lowercase()
            ),
            WindowCheck::NonSequential { earlier, later } => format!(
                "{} period must end before {} period begins",
                earlier.label(),
                later.label().to_lowercase()
            ),
            WindowCheck::OutOfDatasetRange { earliest, latest } => format!(
                "Date ranges must be within dataset range: {} to {}",
                earliest.format(DAY_KEY_FORMAT),
                latest.format(DAY_KEY_FORMAT)
            ),
        }
    }

    /// Convert a violation into its typed error; `Valid` becomes `Ok(())`.
    pub fn into_result(self) -> Result<()> {
        let message = self.message();
        match self {
            WindowCheck::Valid => Ok(()),
            WindowCheck::InvertedWindow(_) => Err(PrepError::WindowOrder(message)),
            WindowCheck::NonSequential { .. } => Err(PrepError::WindowSequence(message)),
            WindowCheck::OutOfDatasetRange { .. } => Err(PrepError::WindowOutOfRange(message)),
        }
    }
}

// ── Validation ────────────────────────────────────────────────────────────────

/// Check the three windows, first failing reason wins.
///
/// Order of checks: each window's own start < end; Training ends before
/// Testing begins; Testing ends before Simulation begins; the whole span
/// sits inside `[earliest, latest]` of the dataset.
pub fn validate_windows(
    windows: &DateWindows,
    earliest: NaiveDateTime,
    latest: NaiveDateTime,
) -> WindowCheck {
    for partition in Partition::ALL {
        let w = windows.get(partition);
        if w.start >= w.end {
            return WindowCheck::InvertedWindow(partition);
        }
    }

    if windows.training.end >= windows.testing.start {
        return WindowCheck::NonSequential {
            earlier: Partition::Training,
            later: Partition::Testing,
        };
    }
    if windows.testing.end >= windows.simulation.start {
        return WindowCheck::NonSequential {
            earlier: Partition::Testing,
            later: Partition::Simulation,
        };
    }

    if windows.training.start < earliest || windows.simulation.end > latest {
        return WindowCheck::OutOfDatasetRange { earliest, latest };
    }

    WindowCheck::Valid
}

// ── Tests ─────────────────────────────────────────────────────────────────────
