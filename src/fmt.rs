//! Shared formatting utilities for size display and console output
//!
//! Only exporters and CLI output use these. The comparison engine works
//! with raw byte counts.

use console::Emoji;

/// Checkmark emoji for success
pub const CHECKMARK: Emoji = Emoji("✅", "[OK]");

/// Crossmark emoji for failure
pub const CROSSMARK: Emoji = Emoji("❌", "[FAIL]");

/// Warning emoji for caution/alerts
pub const WARNING: Emoji = Emoji("⚠️", "!");

/// Format bytes as human-readable size string
///
/// # Examples
///
/// ```
/// use build_tracker::fmt::format_bytes;
///
/// assert_eq!(format_bytes(512), "512 B");
/// assert_eq!(format_bytes(1024), "1.00 KB");
/// assert_eq!(format_bytes(1_048_576), "1.00 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format a signed byte delta with an explicit sign
///
/// # Examples
///
/// ```
/// use build_tracker::fmt::format_delta;
///
/// assert_eq!(format_delta(2048), "+2.00 KB");
/// assert_eq!(format_delta(-100), "-100 B");
/// assert_eq!(format_delta(0), "0 B");
/// ```
pub fn format_delta(delta: i64) -> String {
    let magnitude = format_bytes(delta.unsigned_abs());
    match delta.signum() {
        1 => format!("+{}", magnitude),
        -1 => format!("-{}", magnitude),
        _ => magnitude,
    }
}

/// Format a size ratio as a percentage of the base
///
/// # Examples
///
/// ```
/// use build_tracker::fmt::format_ratio;
///
/// assert_eq!(format_ratio(1.0), "100.0%");
/// assert_eq!(format_ratio(1.256), "125.6%");
/// ```
pub fn format_ratio(ratio: f64) -> String {
    if ratio.is_infinite() {
        return "∞".to_string();
    }
    format!("{:.1}%", ratio * 100.0)
}
