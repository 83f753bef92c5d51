/// Render a byte count the way the ingestion summary reports file size.
///
/// Walks the `B → KB → MB → GB` ladder in steps of 1024 and formats with at
/// most two decimal places, trailing zeros trimmed.
///
/// # Examples
///
/// ```
/// use qcprep_core::formatting::format_file_size;
///
/// assert_eq!(format_file_size(500), "500 B");
/// assert_eq!(format_file_size(1536), "1.5 KB");
/// assert_eq!(format_file_size(1_048_576), "1 MB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut len = bytes as f64;
    let mut order = 0;
    while len >= 1024.0 && order < UNITS.len() - 1 {
        order += 1;
        len /= 1024.0;
    }

    format!("{} {}", trim_decimals(len), UNITS[order])
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero to avoid division by zero.
///
/// # Examples
///
/// ```
/// use qcprep_core::formatting::percentage;
///
/// assert!((percentage(3.0, 5.0, 2) - 60.0).abs() < 1e-9);
/// assert_eq!(percentage(0.0, 0.0, 2), 0.0);
/// ```
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let raw = (part / whole) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Format with at most two decimal places, trailing zeros removed.
fn trim_decimals(value: f64) -> String {
    let s = format!("{value:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── format_file_size ──────────────────────────────────────────────────────

    #[test]
    fn test_format_file_size_bytes() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(500), "500 B");
        assert_eq!(format_file_size(1023), "1023 B");
    }

    #[test]
    fn test_format_file_size_kilobytes() {
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(2000), "1.95 KB");
    }

    #[test]
    fn test_format_file_size_megabytes() {
        assert_eq!(format_file_size(1_048_576), "1 MB");
        assert_eq!(format_file_size(5 * 1_048_576 + 524_288), "5.5 MB");
    }

    #[test]
    fn test_format_file_size_caps_at_gigabytes() {
        assert_eq!(format_file_size(5 * 1024 * 1024 * 1024), "5 GB");
        // A terabyte still renders in GB; the ladder stops there.
        assert_eq!(format_file_size(1024_u64.pow(4)), "1024 GB");
    }

    // ── percentage ────────────────────────────────────────────────────────────

    #[test]
    fn test_percentage_basic() {
        let p = percentage(3.0, 5.0, 2);
        assert!((p - 60.0).abs() < 1e-9, "percentage = {p}");
    }

    #[test]
    fn test_percentage_zero_whole() {
        assert_eq!(percentage(10.0, 0.0, 2), 0.0);
    }

    #[test]
    fn test_percentage_rounding() {
        let p = percentage(1.0, 3.0, 2);
        assert!((p - 33.33).abs() < 1e-9, "percentage = {p}");
    }

    #[test]
    fn test_percentage_full() {
        let p = percentage(100.0, 100.0, 0);
        assert!((p - 100.0).abs() < 1e-9);
    }
}
