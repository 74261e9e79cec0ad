use candle_core::{Device, Tensor};
use opencv::{
    core::{Mat, MatTraitConst, Size, CV_8UC3},
    imgproc::{cvt_color, resize, COLOR_BGR2HSV, COLOR_BGR2RGB, INTER_LINEAR},
};

use crate::error::{Result, VisionError};

pub fn validate_frame(img: &Mat) -> Result<()> {
    if img.empty() || img.rows() <= 0 || img.cols() <= 0 {
        return Err(VisionError::InvalidInput("frame has zero dimensions".to_string()));
    }

    match img.typ() {
        CV_8UC3 => Ok(()),
        _ => Err(VisionError::InvalidInput(format!(
            "expected an 8-bit BGR frame, got {} channel(s) at depth {}",
            img.channels(),
            img.depth()
        ))),
    }
}

pub fn to_hsv(img: &Mat) -> Result<Mat> {
    validate_frame(img)?;

    let mut img_hsv = Mat::default();
    cvt_color(img, &mut img_hsv, COLOR_BGR2HSV, 0)?;

    Ok(img_hsv)
}

/// Resizes a BGR frame to `size`x`size`, converts to RGB and lays it out as a
/// `[1, 3, size, size]` tensor scaled to 0..1.
pub fn to_model_input(img: &Mat, size: usize) -> Result<Tensor> {
    validate_frame(img)?;

    let mut img_small = Mat::default();
    resize(img, &mut img_small, Size::new(size as i32, size as i32), 0.0, 0.0, INTER_LINEAR)?;
    let mut img_rgb = Mat::default();
    cvt_color(&img_small, &mut img_rgb, COLOR_BGR2RGB, 0)?;

    let bytes = img_rgb.data_bytes()?;
    let plane = size * size;
    let mut chw = vec![0f32; 3 * plane];
    for (i, px) in bytes.chunks_exact(3).enumerate() {
        for c in 0..3 {
            chw[c * plane + i] = px[c] as f32 / 255.0;
        }
    }

    Ok(Tensor::from_vec(chw, (1, 3, size, size), &Device::Cpu)?)
}
