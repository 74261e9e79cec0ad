//! CSV interchange for pixel samples and detections.

use std::path::Path;

use vision::{Result, VisionError};

pub mod detection_table;
pub mod pixel_sample;
pub mod references;

pub use detection_table::{filter_detection_table, read_detections, write_detections, DetectionSchema};
pub use pixel_sample::{read_pixel_samples, write_pixel_samples};
pub use references::{load_reference, load_reference_dir, load_references, subject_name};

fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(VisionError::NotFound(path.to_path_buf()))
    }
}

/// `Some(n)` when `value` is a non-negative whole number.
pub(crate) fn lenient_integer(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64)
        .then_some(value as u64)
}
