use std::collections::HashMap;

use candle_core::DType;
use candle_onnx::onnx::ModelProto;
use opencv::{core::Mat, prelude::*};

use crate::{
    config::ModelConfig,
    error::{Result, VisionError},
    preprocess::to_model_input,
    vision::proposals::detection::{Detection, FrameStamp},
};

pub mod labels;
pub mod yolo;

/// Pre-trained YOLOv8 detector evaluated through candle's ONNX runtime.
pub struct ModelDetector {
    model: ModelProto,
    config: ModelConfig,
    input_name: String,
    output_name: String,
}

impl ModelDetector {
    pub fn load(config: ModelConfig) -> Result<Self> {
        if !config.model_path.is_file() {
            return Err(VisionError::NotFound(config.model_path.clone()));
        }

        let model = candle_onnx::read_file(&config.model_path)?;
        let graph = model
            .graph
            .as_ref()
            .ok_or_else(|| VisionError::InvalidInput("model has no graph".to_string()))?;
        let input_name = graph
            .input
            .first()
            .map(|i| i.name.clone())
            .ok_or_else(|| VisionError::InvalidInput("model declares no inputs".to_string()))?;
        let output_name = graph
            .output
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| VisionError::InvalidInput("model declares no outputs".to_string()))?;

        log::info!(
            "Loaded model {} ({input_name} -> {output_name})",
            config.model_path.display()
        );

        Ok(Self {
            model,
            config,
            input_name,
            output_name,
        })
    }

    pub fn detect(&self, frame: &Mat, stamp: FrameStamp) -> Result<Vec<Detection>> {
        let size = self.config.input_size;
        let input = to_model_input(frame, size)?;

        let inputs = HashMap::from([(self.input_name.clone(), input)]);
        let mut outputs = candle_onnx::simple_eval(&self.model, inputs)?;
        let output = outputs.remove(&self.output_name).ok_or_else(|| {
            VisionError::InvalidInput(format!("model produced no '{}' output", self.output_name))
        })?;
        let head = output.squeeze(0)?.to_dtype(DType::F32)?.to_vec2::<f32>()?;

        let boxes = yolo::decode(&head, self.config.confidence_threshold)?;
        let boxes = yolo::non_max_suppression(boxes, self.config.iou_threshold);

        let (cols, rows) = (frame.cols(), frame.rows());

        Ok(boxes
            .into_iter()
            .map(|b| {
                let bbox = yolo::to_frame_box(&b, size, cols, rows);
                Detection::scored(stamp, bbox, b.score as f64, labels::label(b.class_id))
            })
            .collect())
    }
}
