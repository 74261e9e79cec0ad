use std::{fs, path::PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use footage::{FrameSource, Palette, Preview, VideoSource};
use tabular::{load_references, write_detections, DetectionSchema};
use vision::{AreaBand, ColorScan, DetectorConfig, ToleranceWindow};

mod scan;

/// Finds regions matching each reference colour in every frame of a video.
#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    video: PathBuf,
    /// Directory of pixel tables (or a single table), one per subject
    #[arg(long, default_value = "dados_ecos")]
    references: PathBuf,
    #[arg(long, default_value = "deteccoes_ecos")]
    output_dir: PathBuf,
    /// Hue, saturation and value tolerance around each reference
    #[arg(long, default_value = "12,80,80", value_parser = parse_tolerance)]
    tolerance: ToleranceWindow,
    #[arg(long, default_value_t = 2000.0)]
    min_area: f64,
    #[arg(long, default_value_t = 50000.0)]
    max_area: f64,
    /// Side of the square kernel for mask opening and closing
    #[arg(long, default_value_t = 5)]
    kernel: i32,
    /// Do not open a preview window
    #[arg(long)]
    headless: bool,
    /// Save annotated frames with at least one match here
    #[arg(long)]
    save_frames: Option<PathBuf>,
}

fn parse_tolerance(s: &str) -> Result<ToleranceWindow, String> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<u16>().map_err(|e| format!("'{v}': {e}")))
        .collect::<Result<Vec<_>, _>>()?;

    match values[..] {
        [h, s, v] => Ok(ToleranceWindow::new(h, s, v)),
        _ => Err(format!("expected H,S,V, got '{s}'")),
    }
}

fn main() -> anyhow::Result<()> {
    setup_logging();
    let args = Args::parse();

    let config = DetectorConfig {
        tolerance: args.tolerance,
        area_band: AreaBand::new(args.min_area, args.max_area),
        kernel_size: args.kernel,
    };
    config.validate()?;

    let references = load_references(&args.references)
        .with_context(|| format!("Failed to load references from {}", args.references.display()))?;
    if references.is_empty() {
        bail!("No usable reference tables in {}", args.references.display());
    }
    log::info!("{} references loaded", references.len());
    for reference in &references {
        log::info!("  {}: HSV {:?}", reference.name(), reference.hsv().channels());
    }

    let mut source = VideoSource::open(&args.video)
        .with_context(|| format!("Failed to open video {}", args.video.display()))?;
    let schema = match source.fps() {
        Some(_) => DetectionSchema::Timestamped,
        None => {
            log::warn!("Video reports no frame rate, detections will have no timestamps");
            DetectionSchema::Untimestamped
        }
    };

    fs::create_dir_all(&args.output_dir)?;
    if let Some(dir) = &args.save_frames {
        fs::create_dir_all(dir)?;
    }

    let palette = Palette::random(references.iter().map(|r| r.name()));
    let preview = Preview::new("Colour detection", !args.headless);
    let scan = ColorScan::new(config, references)?;
    let outcome = scan::run_scan(&mut source, scan, &palette, &preview, args.save_frames.as_deref())?;
    if outcome.stopped {
        log::info!("Stopped after {} frames, saving what was found", outcome.frames);
    } else {
        log::info!("Processed {} frames", outcome.frames);
    }

    for set in &outcome.sets {
        let path = args.output_dir.join(format!("deteccao_{}.csv", set.subject()));
        write_detections(&path, set, schema).with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Saved {} ({} detections)", path.display(), set.len());
    }

    Ok(())
}

fn setup_logging() {
    simple_log::quick!();
}
