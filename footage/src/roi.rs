use opencv::{
    core::{Mat, Rect},
    highgui,
    prelude::*,
};
use vision::{utils::colored_rect_pixels, PixelSampleRow, Result, VisionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roi {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Roi {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Checks the region against `img` and converts it for OpenCV.
    pub fn within(&self, img: &Mat) -> Result<Rect> {
        if self.is_empty() {
            return Err(VisionError::EmptySelection);
        }
        let fits = self.x as u64 + self.width as u64 <= img.cols().max(0) as u64
            && self.y as u64 + self.height as u64 <= img.rows().max(0) as u64;
        if !fits {
            return Err(VisionError::InvalidInput(format!(
                "region {:?} exceeds the {}x{} image",
                self,
                img.cols(),
                img.rows()
            )));
        }

        Ok(Rect::new(self.x as i32, self.y as i32, self.width as i32, self.height as i32))
    }
}

impl From<Rect> for Roi {
    fn from(rect: Rect) -> Self {
        Roi::new(
            rect.x.max(0) as u32,
            rect.y.max(0) as u32,
            rect.width.max(0) as u32,
            rect.height.max(0) as u32,
        )
    }
}

/// Lets the user drag a rectangle over `img` (ENTER/SPACE confirms, C cancels).
pub fn select_roi(window: &str, img: &Mat) -> Result<Roi> {
    let rect = highgui::select_roi_def(window, img)?;
    highgui::destroy_window(window)?;

    let roi = Roi::from(rect);
    if roi.is_empty() {
        return Err(VisionError::EmptySelection);
    }

    Ok(roi)
}

/// Every pixel of the region as a direct sample with absolute coordinates, row by row.
pub fn sample_roi(img: &Mat, roi: Roi) -> Result<Vec<PixelSampleRow>> {
    vision::preprocess::validate_frame(img)?;
    let rect = roi.within(img)?;

    Ok(colored_rect_pixels(img, &rect)?
        .into_iter()
        .map(|(x, y, bgr)| PixelSampleRow::direct(x as u32, y as u32, bgr.x, bgr.y, bgr.z))
        .collect())
}

pub fn roi_image(img: &Mat, roi: Roi) -> Result<Mat> {
    let rect = roi.within(img)?;
    Ok(Mat::roi(img, rect)?.clone_pointee())
}
