use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use footage::{annotate::green, draw_box, model_caption, save_frame, Flow, FrameSource, Preview, VideoSource};
use tabular::{write_detections, DetectionSchema};
use vision::{DetectionSet, FrameStamp, ModelConfig, ModelDetector};

/// Runs a pre-trained YOLOv8 detector over a video and saves frames with detections.
#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    video: PathBuf,
    /// ONNX export of the detector
    #[arg(long, default_value = "yolov8n.onnx")]
    model: PathBuf,
    #[arg(long, default_value = "deteccoes")]
    output_dir: PathBuf,
    /// Process only every n-th frame
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    skip_frames: u64,
    #[arg(long, default_value_t = 0.3)]
    confidence: f32,
    #[arg(long, default_value_t = 0.45)]
    iou: f32,
    #[arg(long, default_value_t = 640)]
    input_size: usize,
    /// Do not open a preview window
    #[arg(long)]
    headless: bool,
    /// Name of the detection table written to the output directory
    #[arg(long, default_value = "deteccao_modelo.csv")]
    table: String,
}

fn main() -> anyhow::Result<()> {
    setup_logging();
    let args = Args::parse();

    let detector = ModelDetector::load(ModelConfig {
        model_path: args.model.clone(),
        input_size: args.input_size,
        confidence_threshold: args.confidence,
        iou_threshold: args.iou,
    })
    .with_context(|| format!("Failed to load model {}", args.model.display()))?;

    let mut source = VideoSource::open(&args.video)
        .with_context(|| format!("Failed to open video {}", args.video.display()))?;
    let fps = source.fps();
    fs::create_dir_all(&args.output_dir)?;
    let preview = Preview::new("YOLOv8 detection", !args.headless);
    log::info!("Video opened, press ESC to stop");

    let mut set = DetectionSet::new("modelo");
    let mut index = 0;
    let mut saved = 0;
    while let Some(mut frame) = source.next_frame()? {
        index += 1;
        if index % args.skip_frames != 0 {
            continue;
        }

        let detections = detector.detect(&frame, FrameStamp::new(index, fps))?;
        for detection in &detections {
            draw_box(&mut frame, &detection.bbox, green(), Some(model_caption(detection).as_str()))?;
        }

        if !detections.is_empty() {
            log::debug!("Frame {index}: {} detections", detections.len());
            save_frame(&args.output_dir.join(format!("frame_{index:06}.jpg")), &frame)?;
            saved += 1;
            set.extend(detections);
        }

        if preview.show(&frame)? == Flow::Stop {
            break;
        }
    }
    preview.close()?;

    let table = args.output_dir.join(&args.table);
    write_detections(&table, &set, DetectionSchema::Scored)
        .with_context(|| format!("Failed to write {}", table.display()))?;
    log::info!(
        "Done: {saved} frames saved and {} detections written to {}",
        set.len(),
        args.output_dir.display()
    );

    Ok(())
}

fn setup_logging() {
    simple_log::quick!();
}
