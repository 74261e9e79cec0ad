use nalgebra::Vector3;
use opencv::{
    core::{Mat, Rect, Scalar, Vec3b, CV_8UC3},
    imgproc::{cvt_color, COLOR_BGR2HSV},
    prelude::*,
};

use crate::{error::Result, vision::color::Hsv};

/// Converts a single BGR colour through the same OpenCV path the frames take.
pub fn bgr_to_hsv(bgr: &Vector3<u8>) -> Result<Hsv> {
    let pixel = Mat::new_rows_cols_with_default(
        1,
        1,
        CV_8UC3,
        Scalar::new(bgr.x as f64, bgr.y as f64, bgr.z as f64, 0.0),
    )?;
    let mut hsv = Mat::default();
    cvt_color(&pixel, &mut hsv, COLOR_BGR2HSV, 0)?;

    let value = hsv.at_2d::<Vec3b>(0, 0)?;
    Hsv::new(value[0], value[1], value[2])
}

pub fn pixel_at(mat: &Mat, row: i32, col: i32) -> Result<Vector3<u8>> {
    let pixel = mat.at_2d::<Vec3b>(row, col)?;
    Ok(Vector3::new(pixel[0], pixel[1], pixel[2]))
}

/// Iterates every BGR pixel inside `rect`, yielding absolute coordinates.
pub fn colored_rect_pixels(mat: &Mat, rect: &Rect) -> Result<Vec<(i32, i32, Vector3<u8>)>> {
    let mut res = Vec::with_capacity((rect.width.max(0) * rect.height.max(0)) as usize);

    for r in rect.y..rect.y + rect.height {
        for c in rect.x..rect.x + rect.width {
            res.push((c, r, pixel_at(mat, r, c)?));
        }
    }

    Ok(res)
}
