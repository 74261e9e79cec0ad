use std::path::{Path, PathBuf};

use itertools::Itertools;
use vision::{reference_from_rows, ColorReference, Result, VisionError};

use crate::{ensure_exists, pixel_sample::read_pixel_samples};

pub fn subject_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn load_reference(path: &Path) -> Result<ColorReference> {
    let rows = read_pixel_samples(path)?;
    reference_from_rows(subject_name(path), &rows).map_err(|e| match e {
        VisionError::EmptyInput(_) => VisionError::malformed(path, "table has no pixel samples"),
        e => e,
    })
}

fn csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let files = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .filter(|p| p.is_file() && p.extension().is_some_and(|e| e.eq_ignore_ascii_case("csv")))
        .sorted()
        .collect();

    Ok(files)
}

/// Loads one reference per `*.csv` in `dir`, sorted by file name.
///
/// Tables that cannot be turned into a reference are skipped with a warning;
/// a missing directory is an error.
pub fn load_reference_dir(dir: &Path) -> Result<Vec<ColorReference>> {
    ensure_exists(dir)?;

    let mut references = Vec::new();
    for path in csv_files(dir)? {
        match load_reference(&path) {
            Ok(reference) => references.push(reference),
            Err(e) if e.is_skippable() => log::warn!("Skipping {}: {e}", path.display()),
            Err(e) => return Err(e),
        }
    }

    Ok(references)
}

pub fn load_references(path: &Path) -> Result<Vec<ColorReference>> {
    if path.is_dir() {
        load_reference_dir(path)
    } else {
        Ok(vec![load_reference(path)?])
    }
}
