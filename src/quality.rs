use crate::constants::{
    HIGH_RATIO_FLOOR, LOW_RATIO_FLOOR, MAX_QUALITY, MID_RATIO_FLOOR, MIN_QUALITY,
};

/// Maps `target / original` to a starting quality for the compression search.
///
/// Piecewise linear, each segment closed at its lower bound, so a ratio of
/// exactly 0.8 uses the top segment and yields 85. The result is rounded and
/// clamped to `MIN_QUALITY..=MAX_QUALITY`. A non-finite ratio (empty original)
/// means the file is already small and gets the ceiling.
///
/// # Example
/// ```
/// use img_shrink::estimate_quality;
///
/// assert_eq!(estimate_quality(1.0), 95);
/// assert_eq!(estimate_quality(0.8), 85);
/// assert_eq!(estimate_quality(0.5), 70);
/// ```
pub fn estimate_quality(size_ratio: f64) -> u8 {
    if !size_ratio.is_finite() {
        return MAX_QUALITY;
    }

    let raw = if size_ratio >= HIGH_RATIO_FLOOR {
        85.0 + (size_ratio - HIGH_RATIO_FLOOR) * 50.0
    } else if size_ratio >= MID_RATIO_FLOOR {
        70.0 + (size_ratio - MID_RATIO_FLOOR) * 50.0
    } else if size_ratio >= LOW_RATIO_FLOOR {
        50.0 + (size_ratio - LOW_RATIO_FLOOR) * 100.0
    } else {
        30.0 + size_ratio * 66.7
    };

    raw.round().clamp(MIN_QUALITY as f64, MAX_QUALITY as f64) as u8
}

/// Ratio fed to `estimate_quality`; infinite when the original is empty.
pub fn size_ratio(target_size: u64, original_size: u64) -> f64 {
    if original_size == 0 {
        return f64::INFINITY;
    }
    target_size as f64 / original_size as f64
}
