use std::path::PathBuf;

use crate::error::{Result, VisionError};
use crate::vision::{color::ToleranceWindow, proposals::filter::AreaBand};

#[derive(Debug, Clone)]
pub struct DetectorConfig {
    pub tolerance: ToleranceWindow,
    pub area_band: AreaBand,
    /// Side of the square structuring element used for opening and closing.
    pub kernel_size: i32,
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.kernel_size < 1 {
            return Err(VisionError::InvalidInput(format!(
                "kernel size must be positive, got {}",
                self.kernel_size
            )));
        }
        if !(self.area_band.min >= 0.0 && self.area_band.min <= self.area_band.max) {
            return Err(VisionError::InvalidInput(format!(
                "area band [{}, {}] is empty or negative",
                self.area_band.min, self.area_band.max
            )));
        }

        Ok(())
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            tolerance: ToleranceWindow::default(),
            area_band: AreaBand::default(),
            kernel_size: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub model_path: PathBuf,
    /// Square input side the network was exported with.
    pub input_size: usize,
    pub confidence_threshold: f32,
    pub iou_threshold: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("yolov8n.onnx"),
            input_size: 640,
            confidence_threshold: 0.3,
            iou_threshold: 0.45,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(DetectorConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_inverted_band() {
        let config = DetectorConfig {
            area_band: AreaBand::new(100.0, 10.0),
            ..DetectorConfig::default()
        };

        assert!(config.validate().is_err());
    }
}
