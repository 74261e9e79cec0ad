use nalgebra::Vector3;

use super::{sample::PixelSampleRow, ColorReference};
use crate::{
    error::{Result, VisionError},
    utils::bgr_to_hsv,
};

pub fn mean_bgr(samples: impl IntoIterator<Item = Vector3<f64>>) -> Result<Vector3<f64>> {
    let (sum, count) = samples
        .into_iter()
        .fold((Vector3::zeros(), 0usize), |(sum, count), s| (sum + s, count + 1));

    if count == 0 {
        return Err(VisionError::EmptyInput(
            "cannot average zero colour samples".to_string(),
        ));
    }

    Ok(sum / count as f64)
}

/// Averages the samples, truncates the mean to 8 bits and converts it to HSV.
pub fn build_reference(
    name: impl Into<String>,
    samples: impl IntoIterator<Item = Vector3<f64>>,
) -> Result<ColorReference> {
    let name = name.into();
    let mean = mean_bgr(samples)?;
    let mean_u8 = mean.map(|c| c.clamp(0.0, 255.0) as u8);
    let hsv = bgr_to_hsv(&mean_u8)?;

    log::debug!(
        "Reference {name}: mean BGR ({:.2}, {:.2}, {:.2}) -> HSV ({}, {}, {})",
        mean.x,
        mean.y,
        mean.z,
        hsv.h,
        hsv.s,
        hsv.v
    );

    Ok(ColorReference::new(name, hsv))
}

pub fn reference_from_rows(name: impl Into<String>, rows: &[PixelSampleRow]) -> Result<ColorReference> {
    build_reference(name, rows.iter().map(PixelSampleRow::bgr))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_samples() {
        let mean = mean_bgr([Vector3::new(10.0, 20.0, 30.0), Vector3::new(20.0, 40.0, 61.0)]).unwrap();

        assert_eq!(mean, Vector3::new(15.0, 30.0, 45.5));
    }

    #[test]
    fn zero_samples_is_an_error() {
        let err = build_reference("EMPTY", Vec::<Vector3<f64>>::new()).unwrap_err();

        assert!(matches!(err, VisionError::EmptyInput(_)));
    }

    #[test]
    fn pure_blue_reference() {
        let rows = vec![PixelSampleRow::direct(0, 0, 255, 0, 0), PixelSampleRow::direct(1, 0, 255, 0, 0)];
        let reference = reference_from_rows("BLUE", &rows).unwrap();

        assert_eq!(reference.name(), "BLUE");
        assert_eq!(reference.hsv().channels(), [120, 255, 255]);
    }

    #[test]
    fn averaged_rows_are_truncated() {
        // mean B = 0.9 truncates to 0, leaving pure red
        let rows = vec![PixelSampleRow::averaged(0.9, 0.0, 255.0)];
        let reference = reference_from_rows("RED", &rows).unwrap();

        assert_eq!(reference.hsv().channels(), [0, 255, 255]);
    }
}
