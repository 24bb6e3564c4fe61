//! Formatting helpers shared by the batch driver and the binary.

use crate::batch::BatchSummary;
use crate::constants::{COMPRESSED_SIZE_PREFIX, COMPRESSION_RATIO_PREFIX, ORIGINAL_SIZE_PREFIX};
use crate::{info, warn};

/// Format file size in human-readable form (1024-based)
///
/// # Example
/// ```
/// use img_shrink::utils::format_file_size;
///
/// assert_eq!(format_file_size(512), "512 B");
/// assert_eq!(format_file_size(1536), "1.5 KB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    let mut size = bytes as f64;
    let mut unit_index = 0;
    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Size reduction as a percentage; negative when the file grew
pub fn calculate_compression_ratio(original_size: u64, compressed_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    ((original_size as f64 - compressed_size as f64) / original_size as f64) * 100.0
}

pub fn print_summary(summary: &BatchSummary) {
    let total_before = summary.total_before();
    let total_after = summary.total_after();

    info!("\n📊 Batch Summary:");
    info!("  📁 Processed: {}", summary.processed);
    info!("  ⏭️  Skipped: {}", summary.skipped);
    info!("  ❌ Failed: {}", summary.failed);
    if summary.unreadable > 0 {
        info!("  🚫 Unreadable: {}", summary.unreadable);
    }
    info!("  {} {}", ORIGINAL_SIZE_PREFIX, format_file_size(total_before));
    info!("  {} {}", COMPRESSED_SIZE_PREFIX, format_file_size(total_after));
    info!("  {} {:.1}%", COMPRESSION_RATIO_PREFIX, summary.compression_ratio());
    info!("  ⏱️  Total time: {:.2?}", summary.elapsed);

    if summary.target_unmet > 0 {
        warn!(
            "{} file(s) could not reach the target size and were saved best effort",
            summary.target_unmet
        );
    }
}
