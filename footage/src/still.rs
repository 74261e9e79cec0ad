use std::path::Path;

use opencv::{
    core::Mat,
    imgcodecs::{self, IMREAD_COLOR},
    prelude::*,
};
use vision::{Result, VisionError};

pub fn load_image(path: &Path) -> Result<Mat> {
    if !path.is_file() {
        return Err(VisionError::NotFound(path.to_path_buf()));
    }

    let img = imgcodecs::imread(&path.to_string_lossy(), IMREAD_COLOR)?;
    if img.empty() {
        return Err(VisionError::InvalidInput(format!("could not decode image {}", path.display())));
    }

    Ok(img)
}

pub fn save_frame(path: &Path, frame: &Mat) -> Result<()> {
    if !imgcodecs::imwrite_def(&path.to_string_lossy(), frame)? {
        return Err(VisionError::InvalidInput(format!("could not encode image {}", path.display())));
    }

    Ok(())
}
