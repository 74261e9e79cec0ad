use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use detection_report::{
    discover_subjects, summarize, window_keeps, Report, ReportConfig, TimeWindow, FILTERED_SUFFIX, TABLE_PREFIX,
};
use tabular::{filter_detection_table, read_detections};

/// Keeps each subject's detections inside its time window and counts them per score band.
#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Directory holding `deteccao_<SUBJECT>.csv` tables
    #[arg(long, default_value = ".")]
    input_dir: PathBuf,
    #[arg(long, default_value = "deteccoes_filtradas")]
    output_dir: PathBuf,
    /// Override or add a window, e.g. `BOSS=40:675` or `modelo=0:`
    #[arg(long = "window", value_parser = parse_window)]
    windows: Vec<(String, TimeWindow)>,
}

fn parse_window(s: &str) -> Result<(String, TimeWindow), String> {
    let (name, window) = s.split_once('=').ok_or_else(|| format!("'{s}' is not NAME=START:END"))?;
    let window = window.parse::<TimeWindow>().map_err(|e| e.to_string())?;

    Ok((name.trim().to_string(), window))
}

fn main() -> anyhow::Result<()> {
    setup_logging();
    let args = Args::parse();

    let mut config = ReportConfig::default();
    for (name, window) in &args.windows {
        config.set_window(name, *window);
    }

    let subjects = discover_subjects(&args.input_dir)
        .with_context(|| format!("Failed to list detection tables in {}", args.input_dir.display()))?;
    fs::create_dir_all(&args.output_dir)?;

    for (name, _) in config.windows.iter().filter(|(name, _)| !subjects.contains(name)) {
        log::warn!("No detection table for {name}");
    }

    let mut report = Report::default();
    for subject in &subjects {
        let Some(window) = config.window(subject).copied() else {
            log::warn!("No time window configured for {subject}, skipping");
            continue;
        };

        let path = args.input_dir.join(format!("{TABLE_PREFIX}{subject}.csv"));
        let set = match read_detections(&path, subject) {
            Ok(set) => set,
            Err(e) => {
                log::warn!("Skipping {}: {e}", path.display());
                continue;
            }
        };

        let summary = summarize(&set, window, &config.bands);
        let out = args.output_dir.join(format!("{TABLE_PREFIX}{subject}{FILTERED_SUFFIX}.csv"));
        filter_detection_table(&path, &out, |d| window_keeps(&window, d))
            .with_context(|| format!("Failed to write {}", out.display()))?;
        log::info!("{subject}: kept {} of {} detections in {window}", summary.retained.len(), summary.total);

        report.subjects.push(summary);
    }

    print!("{report}");

    Ok(())
}

fn setup_logging() {
    simple_log::quick!();
}
