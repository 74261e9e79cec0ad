use std::path::Path;

use footage::{draw_box, save_frame, Flow, FrameSource, Palette, StopSignal};
use vision::{ColorScan, DetectionSet, FrameStamp, Result};

pub struct ScanOutcome {
    pub frames: u64,
    pub stopped: bool,
    pub sets: Vec<DetectionSet>,
}

/// Runs every reference over every frame of `source`, annotating matches in place.
///
/// Frames are numbered from 1. When `frames_dir` is set, frames with at least one
/// match are saved there as `frame_{index:06}.jpg`.
pub fn run_scan(
    source: &mut impl FrameSource,
    mut scan: ColorScan,
    palette: &Palette,
    stop: &impl StopSignal,
    frames_dir: Option<&Path>,
) -> Result<ScanOutcome> {
    let fps = source.fps();
    let mut index = 0;
    let mut stopped = false;

    while let Some(mut frame) = source.next_frame()? {
        index += 1;
        let stamp = FrameStamp::new(index, fps);

        let mut matched = 0;
        for (reference, detections) in scan.process_frame(&frame, stamp)? {
            let color = palette.color(reference.name());
            for detection in &detections {
                draw_box(&mut frame, &detection.bbox, color, Some(reference.name()))?;
            }
            matched += detections.len();
        }

        if matched > 0 {
            log::debug!("Frame {index}: {matched} matches");
            if let Some(dir) = frames_dir {
                save_frame(&dir.join(format!("frame_{index:06}.jpg")), &frame)?;
            }
        }

        if stop.poll(&frame)? == Flow::Stop {
            stopped = true;
            break;
        }
    }
    stop.finish()?;

    Ok(ScanOutcome {
        frames: index,
        stopped,
        sets: scan.into_sets(),
    })
}
