//! Formatting utilities

use humansize::{DECIMAL, format_size};

/// Format file size in human-readable format
pub fn format_bytes(bytes: u64) -> String {
    format_size(bytes, DECIMAL)
}

/// Format a CRC32 the way patch tools print them
pub fn format_checksum(checksum: u32) -> String {
    format!("{checksum:08x}")
}

/// Format a share of a total
pub fn format_percentage(part: u64, total: u64) -> String {
    if total == 0 {
        "N/A".to_string()
    } else {
        format!("{:.1}%", part as f64 / total as f64 * 100.0)
    }
}
