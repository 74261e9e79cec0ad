use std::{fs, path::{Path, PathBuf}};

use anyhow::Context;
use clap::Parser;
use footage::{load_image, roi_image, sample_roi, select_roi, Preview};
use tabular::{subject_name, write_pixel_samples};
use vision::{reference_from_rows, VisionError};

/// Samples a hand-picked region of each reference image into a pixel table.
#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Reference images, one per subject (the file stem names the subject)
    #[arg(required = true)]
    images: Vec<PathBuf>,
    #[arg(long, default_value = "dados_ecos")]
    output_dir: PathBuf,
    /// Do not show the selected region after sampling
    #[arg(long)]
    no_preview: bool,
}

fn main() -> anyhow::Result<()> {
    setup_logging();
    let args = Args::parse();

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;
    let preview = Preview::new("Selected region", !args.no_preview);

    let mut written = 0;
    for image in &args.images {
        match sample_image(image, &args.output_dir, &preview) {
            Ok(()) => written += 1,
            Err(e @ VisionError::EmptySelection) => log::warn!("{}: {e}, skipping", image.display()),
            Err(e) => log::warn!("Skipping {}: {e}", image.display()),
        }
    }

    log::info!("Wrote {written} of {} pixel tables to {}", args.images.len(), args.output_dir.display());

    Ok(())
}

fn sample_image(path: &Path, output_dir: &Path, preview: &Preview) -> vision::Result<()> {
    let img = load_image(path)?;
    let subject = subject_name(path);

    log::info!("Select the region for {subject} and press ENTER");
    let roi = select_roi(&format!("Select {subject}"), &img)?;
    let rows = sample_roi(&img, roi)?;

    let out = output_dir.join(format!("{subject}.csv"));
    write_pixel_samples(&out, &rows)?;
    let reference = reference_from_rows(&subject, &rows)?;
    log::info!(
        "{subject}: {} pixels written to {}, mean HSV {:?}",
        rows.len(),
        out.display(),
        reference.hsv().channels()
    );

    preview.show_and_wait(&roi_image(&img, roi)?)
}

fn setup_logging() {
    simple_log::quick!();
}
