use std::{collections::VecDeque, path::Path};

use opencv::{
    core::Mat,
    prelude::*,
    videoio::{self, VideoCapture},
};
use vision::{Result, VisionError};

/// Anything that hands out decoded BGR frames one at a time.
pub trait FrameSource {
    /// `Ok(None)` once the source is exhausted.
    fn next_frame(&mut self) -> Result<Option<Mat>>;

    /// Frames per second, when the source knows it.
    fn fps(&self) -> Option<f64>;
}

pub struct VideoSource {
    cap: VideoCapture,
    fps: Option<f64>,
}

impl VideoSource {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(VisionError::NotFound(path.to_path_buf()));
        }

        let cap = VideoCapture::from_file(&path.to_string_lossy(), videoio::CAP_ANY)?;
        if !cap.is_opened()? {
            return Err(VisionError::NotFound(path.to_path_buf()));
        }

        let fps = cap.get(videoio::CAP_PROP_FPS)?;
        let fps = (fps.is_finite() && fps > 0.0).then_some(fps);
        log::info!(
            "Opened {} ({}x{}, {} fps)",
            path.display(),
            cap.get(videoio::CAP_PROP_FRAME_WIDTH)?,
            cap.get(videoio::CAP_PROP_FRAME_HEIGHT)?,
            fps.map(|f| format!("{f:.2}")).unwrap_or_else(|| "unknown".to_string())
        );

        Ok(Self { cap, fps })
    }
}

impl FrameSource for VideoSource {
    fn next_frame(&mut self) -> Result<Option<Mat>> {
        let mut frame = Mat::default();
        if !self.cap.read(&mut frame)? || frame.empty() {
            return Ok(None);
        }

        Ok(Some(frame))
    }

    fn fps(&self) -> Option<f64> {
        self.fps
    }
}

pub struct FrameList {
    frames: VecDeque<Mat>,
    fps: Option<f64>,
}

impl FrameList {
    pub fn new(frames: Vec<Mat>, fps: Option<f64>) -> Self {
        Self {
            frames: frames.into(),
            fps,
        }
    }
}

impl FrameSource for FrameList {
    fn next_frame(&mut self) -> Result<Option<Mat>> {
        Ok(self.frames.pop_front())
    }

    fn fps(&self) -> Option<f64> {
        self.fps
    }
}
