use itertools::Itertools;

use crate::{
    error::{Result, VisionError},
    vision::proposals::detection::BoundingBox,
};

/// Box in model input coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub score: f32,
    pub class_id: usize,
}

impl ModelBox {
    pub fn area(&self) -> f32 {
        (self.x2 - self.x1).max(0.0) * (self.y2 - self.y1).max(0.0)
    }

    pub fn iou(&self, other: &ModelBox) -> f32 {
        let w = (self.x2.min(other.x2) - self.x1.max(other.x1)).max(0.0);
        let h = (self.y2.min(other.y2) - self.y1.max(other.y1)).max(0.0);
        let intersection = w * h;
        let union = self.area() + other.area() - intersection;

        if union <= 0.0 {
            0.0
        } else {
            intersection / union
        }
    }

    pub fn scaled(&self, x: f32, y: f32) -> ModelBox {
        ModelBox {
            x1: self.x1 * x,
            y1: self.y1 * y,
            x2: self.x2 * x,
            y2: self.y2 * y,
            ..self.clone()
        }
    }
}

/// Decodes a YOLOv8 head laid out as `[4 + classes][anchors]`: centre x, centre y,
/// width, height, then one score row per class.
pub fn decode(output: &[Vec<f32>], confidence_threshold: f32) -> Result<Vec<ModelBox>> {
    if output.len() < 5 {
        return Err(VisionError::InvalidInput(format!(
            "model output has {} rows, expected 4 box rows plus class scores",
            output.len()
        )));
    }
    let anchors = output[0].len();
    if output.iter().any(|row| row.len() != anchors) {
        return Err(VisionError::InvalidInput("model output rows differ in length".to_string()));
    }

    let mut boxes = Vec::new();
    for a in 0..anchors {
        let Some((class_id, score)) = output[4..]
            .iter()
            .map(|row| row[a])
            .enumerate()
            .max_by(|(_, x), (_, y)| x.total_cmp(y))
        else {
            continue;
        };
        if score < confidence_threshold {
            continue;
        }

        let (cx, cy, w, h) = (output[0][a], output[1][a], output[2][a], output[3][a]);
        boxes.push(ModelBox {
            x1: cx - w / 2.0,
            y1: cy - h / 2.0,
            x2: cx + w / 2.0,
            y2: cy + h / 2.0,
            score,
            class_id,
        });
    }

    Ok(boxes)
}

/// Greedy per-class suppression, highest score first.
pub fn non_max_suppression(boxes: Vec<ModelBox>, iou_threshold: f32) -> Vec<ModelBox> {
    let mut kept: Vec<ModelBox> = Vec::new();

    for candidate in boxes.into_iter().sorted_by(|a, b| b.score.total_cmp(&a.score)) {
        let suppressed = kept
            .iter()
            .any(|k| k.class_id == candidate.class_id && k.iou(&candidate) > iou_threshold);
        if !suppressed {
            kept.push(candidate);
        }
    }

    kept
}

/// Scales a box from the square model input back onto a `cols`x`rows` frame, clipped to its edges.
pub fn to_frame_box(b: &ModelBox, input_size: usize, cols: i32, rows: i32) -> BoundingBox {
    let (cols, rows) = (cols.max(0) as f32, rows.max(0) as f32);
    let b = b.scaled(cols / input_size as f32, rows / input_size as f32);

    let x1 = b.x1.clamp(0.0, cols);
    let y1 = b.y1.clamp(0.0, rows);
    let x2 = b.x2.clamp(x1, cols);
    let y2 = b.y2.clamp(y1, rows);

    BoundingBox::new(x1 as u32, y1 as u32, (x2 - x1) as u32, (y2 - y1) as u32)
}
