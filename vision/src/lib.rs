pub mod config;
pub mod error;
pub mod preprocess;
pub mod utils;
mod vision;

use opencv::core::Mat;

pub use config::{DetectorConfig, ModelConfig};
pub use error::{Result, VisionError};
pub use vision::color::{
    reference::{build_reference, mean_bgr, reference_from_rows},
    sample::PixelSampleRow,
    ColorReference, Hsv, HsvRange, ToleranceWindow, HUE_MAX, SAT_MAX, VAL_MAX,
};
pub use vision::model::{labels, yolo, ModelDetector};
pub use vision::proposals::{
    color_region::ColorRegionDetector,
    detection::{BoundingBox, Detection, DetectionSet, FrameStamp},
    filter::{filter_by_area, filter_set_by_area, AreaBand},
};

/// Scans frames for every reference colour and keeps one growing `DetectionSet` per reference.
pub struct ColorScan {
    detector: ColorRegionDetector,
    references: Vec<ColorReference>,
    sets: Vec<DetectionSet>,
}

impl ColorScan {
    pub fn new(config: DetectorConfig, references: Vec<ColorReference>) -> Result<Self> {
        let sets = references.iter().map(|r| DetectionSet::new(r.name())).collect();

        Ok(Self {
            detector: ColorRegionDetector::new(config)?,
            references,
            sets,
        })
    }

    /// Detects all references in `frame`, records the hits and returns them grouped by reference.
    pub fn process_frame(&mut self, frame: &Mat, stamp: FrameStamp) -> Result<Vec<(&ColorReference, Vec<Detection>)>> {
        let results = self.detector.detect_all(frame, &self.references, stamp)?;

        for (set, (_, detections)) in self.sets.iter_mut().zip(results.iter()) {
            set.extend(detections.iter().cloned());
        }

        Ok(results)
    }

    pub fn into_sets(self) -> Vec<DetectionSet> {
        self.sets
    }
}
