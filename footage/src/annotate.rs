use std::collections::HashMap;

use opencv::{
    core::{Mat, Point, Scalar},
    imgproc::{put_text, rectangle, FONT_HERSHEY_SIMPLEX, LINE_8},
};
use rand::Rng;
use vision::{BoundingBox, Detection, Result};

pub fn yellow() -> Scalar {
    Scalar::new(0.0, 255.0, 255.0, 0.0)
}

pub fn green() -> Scalar {
    Scalar::new(0.0, 255.0, 0.0, 0.0)
}

pub struct Palette {
    colors: HashMap<String, Scalar>,
}

impl Palette {
    /// Random bright colour per name (every channel in 50..=255).
    pub fn random<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut rng = rand::thread_rng();
        let colors = names
            .into_iter()
            .map(|name| {
                let color = Scalar::new(
                    rng.gen_range(50..=255) as f64,
                    rng.gen_range(50..=255) as f64,
                    rng.gen_range(50..=255) as f64,
                    0.0,
                );
                (name.to_string(), color)
            })
            .collect();

        Self { colors }
    }

    pub fn color(&self, name: &str) -> Scalar {
        self.colors.get(name).copied().unwrap_or_else(yellow)
    }
}

pub fn draw_box(frame: &mut Mat, bbox: &BoundingBox, color: Scalar, label: Option<&str>) -> Result<()> {
    rectangle(frame, bbox.to_rect(), color, 2, LINE_8, 0)?;

    if let Some(label) = label {
        let origin = Point::new(bbox.x as i32, bbox.y as i32 - 10);
        put_text(frame, label, origin, FONT_HERSHEY_SIMPLEX, 0.6, color, 2, LINE_8, false)?;
    }

    Ok(())
}

/// Caption for a model detection, e.g. `person (0.87)`.
pub fn model_caption(detection: &Detection) -> String {
    match (&detection.label, detection.score) {
        (Some(label), Some(score)) => format!("{label} ({score:.2})"),
        (Some(label), None) => label.clone(),
        (None, Some(score)) => format!("{score:.2}"),
        (None, None) => String::new(),
    }
}
