use opencv::{
    core::{in_range, Mat, Point, Size, Vector},
    imgproc::{
        bounding_rect, contour_area_def, find_contours_def, get_structuring_element_def,
        morphology_ex_def, CHAIN_APPROX_SIMPLE, MORPH_CLOSE, MORPH_OPEN, MORPH_RECT, RETR_EXTERNAL,
    },
};

use super::{
    detection::{Detection, FrameStamp},
    filter::filter_by_area,
};
use crate::{
    config::DetectorConfig,
    error::Result,
    preprocess::to_hsv,
    vision::color::{ColorReference, HsvRange},
};

/// Finds regions of a frame whose HSV colour lies within a tolerance band of a reference.
pub struct ColorRegionDetector {
    config: DetectorConfig,
    kernel: Mat,
}

impl ColorRegionDetector {
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        let kernel = get_structuring_element_def(
            MORPH_RECT,
            Size::new(config.kernel_size, config.kernel_size),
        )?;

        Ok(Self { config, kernel })
    }

    pub fn range_for(&self, reference: &ColorReference) -> HsvRange {
        self.config.tolerance.range_around(reference.hsv())
    }

    /// Cleaned binary mask (255 = match) for one reference.
    pub fn mask(&self, frame: &Mat, reference: &ColorReference) -> Result<Mat> {
        let img_hsv = to_hsv(frame)?;
        self.mask_hsv(&img_hsv, reference)
    }

    fn mask_hsv(&self, img_hsv: &Mat, reference: &ColorReference) -> Result<Mat> {
        let range = self.range_for(reference);

        let mut masked = Mat::default();
        in_range(img_hsv, &range.lower_bound(), &range.upper_bound(), &mut masked)?;

        let mut opened = Mat::default();
        morphology_ex_def(&masked, &mut opened, MORPH_OPEN, &self.kernel)?;
        let mut closed = Mat::default();
        morphology_ex_def(&opened, &mut closed, MORPH_CLOSE, &self.kernel)?;

        Ok(closed)
    }

    pub fn detect(&self, frame: &Mat, reference: &ColorReference, stamp: FrameStamp) -> Result<Vec<Detection>> {
        let img_hsv = to_hsv(frame)?;
        self.detect_hsv(&img_hsv, reference, stamp)
    }

    /// Runs every reference against one frame, converting it to HSV only once.
    pub fn detect_all<'r>(
        &self,
        frame: &Mat,
        references: &'r [ColorReference],
        stamp: FrameStamp,
    ) -> Result<Vec<(&'r ColorReference, Vec<Detection>)>> {
        let img_hsv = to_hsv(frame)?;

        references
            .iter()
            .map(|reference| Ok((reference, self.detect_hsv(&img_hsv, reference, stamp)?)))
            .collect()
    }

    fn detect_hsv(&self, img_hsv: &Mat, reference: &ColorReference, stamp: FrameStamp) -> Result<Vec<Detection>> {
        let mask = self.mask_hsv(img_hsv, reference)?;

        let mut contours: Vector<Vector<Point>> = Vector::new();
        find_contours_def(&mask, &mut contours, RETR_EXTERNAL, CHAIN_APPROX_SIMPLE)?;

        let regions: Result<Vec<Detection>> = contours
            .iter()
            .map(|contour| {
                let area = contour_area_def(&contour)?;
                let rect = bounding_rect(&contour)?;

                Ok(Detection::new(stamp, rect.into(), area))
            })
            .collect();
        let regions = filter_by_area(regions?, &self.config.area_band);

        if !regions.is_empty() {
            log::debug!(
                "Frame {}: {} region(s) matching {}",
                stamp.index,
                regions.len(),
                reference.name()
            );
        }

        Ok(regions)
    }
}
