use nalgebra::Vector3;

/// One row of a pixel-sample table.
///
/// `Direct` rows come straight from a region of interest (`x, y, B, G, R`).
/// `Averaged` rows carry an already averaged colour (`media_B, media_G, media_R`)
/// and therefore no coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelSampleRow {
    Direct { x: u32, y: u32, bgr: Vector3<f64> },
    Averaged { bgr: Vector3<f64> },
}

impl PixelSampleRow {
    pub fn direct(x: u32, y: u32, b: u8, g: u8, r: u8) -> Self {
        PixelSampleRow::Direct {
            x,
            y,
            bgr: Vector3::new(b as f64, g as f64, r as f64),
        }
    }

    pub fn averaged(b: f64, g: f64, r: f64) -> Self {
        PixelSampleRow::Averaged {
            bgr: Vector3::new(b, g, r),
        }
    }

    pub fn bgr(&self) -> Vector3<f64> {
        match self {
            PixelSampleRow::Direct { bgr, .. } | PixelSampleRow::Averaged { bgr } => *bgr,
        }
    }
}
