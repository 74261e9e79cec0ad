use std::path::Path;

use csv::StringRecord;
use vision::{PixelSampleRow, Result, VisionError};

use crate::{ensure_exists, lenient_integer};

const DIRECT_COLUMNS: [&str; 5] = ["x", "y", "B", "G", "R"];
const AVERAGED_COLUMNS: [&str; 3] = ["media_B", "media_G", "media_R"];

/// Which of the two accepted layouts a table uses, with the column positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PixelSchema {
    Direct([usize; 5]),
    Averaged([usize; 3]),
}

impl PixelSchema {
    fn resolve(headers: &StringRecord) -> Option<PixelSchema> {
        column_indices(headers, &DIRECT_COLUMNS)
            .map(PixelSchema::Direct)
            .or_else(|| column_indices(headers, &AVERAGED_COLUMNS).map(PixelSchema::Averaged))
    }

    fn parse(&self, record: &StringRecord, path: &Path) -> Result<PixelSampleRow> {
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let value = |idx: usize, column: &str| -> Result<f64> {
            let raw = record.get(idx).unwrap_or("").trim();
            raw.parse::<f64>().map_err(|_| {
                VisionError::malformed(path, format!("line {line}: column {column} holds '{raw}', expected a number"))
            })
        };
        let channel = |idx: usize, column: &str| -> Result<f64> {
            let v = value(idx, column)?;
            if !(0.0..=255.0).contains(&v) {
                return Err(VisionError::malformed(
                    path,
                    format!("line {line}: {column} = {v} is outside 0..=255"),
                ));
            }
            Ok(v)
        };

        match *self {
            PixelSchema::Direct([x, y, b, g, r]) => {
                let x = lenient_integer(value(x, "x")?)
                    .ok_or_else(|| VisionError::malformed(path, format!("line {line}: x is not a pixel coordinate")))?;
                let y = lenient_integer(value(y, "y")?)
                    .ok_or_else(|| VisionError::malformed(path, format!("line {line}: y is not a pixel coordinate")))?;

                Ok(PixelSampleRow::Direct {
                    x: x as u32,
                    y: y as u32,
                    bgr: nalgebra::Vector3::new(channel(b, "B")?, channel(g, "G")?, channel(r, "R")?),
                })
            }
            PixelSchema::Averaged([b, g, r]) => Ok(PixelSampleRow::averaged(
                channel(b, "media_B")?,
                channel(g, "media_G")?,
                channel(r, "media_R")?,
            )),
        }
    }
}

fn column_indices<const N: usize>(headers: &StringRecord, names: &[&str; N]) -> Option<[usize; N]> {
    let mut indices = [0usize; N];
    for (slot, name) in indices.iter_mut().zip(names.iter()) {
        *slot = headers.iter().position(|h| h.trim() == *name)?;
    }

    Some(indices)
}

pub fn read_pixel_samples(path: &Path) -> Result<Vec<PixelSampleRow>> {
    ensure_exists(path)?;

    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let schema = PixelSchema::resolve(&headers).ok_or_else(|| {
        VisionError::malformed(
            path,
            format!(
                "expected columns {} or {}",
                DIRECT_COLUMNS.join(","),
                AVERAGED_COLUMNS.join(",")
            ),
        )
    })?;

    reader
        .records()
        .map(|record| schema.parse(&record?, path))
        .collect()
}

/// Writes samples as `x,y,B,G,R` or `media_B,media_G,media_R`; all rows must share one layout.
pub fn write_pixel_samples(path: &Path, rows: &[PixelSampleRow]) -> Result<()> {
    let averaged = matches!(rows.first(), Some(PixelSampleRow::Averaged { .. }));
    let mut writer = csv::Writer::from_path(path)?;

    if averaged {
        writer.write_record(AVERAGED_COLUMNS)?;
    } else {
        writer.write_record(DIRECT_COLUMNS)?;
    }

    for row in rows {
        match (row, averaged) {
            (PixelSampleRow::Direct { x, y, bgr }, false) => writer.write_record([
                x.to_string(),
                y.to_string(),
                bgr.x.to_string(),
                bgr.y.to_string(),
                bgr.z.to_string(),
            ])?,
            (PixelSampleRow::Averaged { bgr }, true) => {
                writer.write_record([bgr.x.to_string(), bgr.y.to_string(), bgr.z.to_string()])?
            }
            _ => {
                return Err(VisionError::InvalidInput(
                    "pixel sample rows mix direct and averaged layouts".to_string(),
                ))
            }
        }
    }
    writer.flush()?;

    Ok(())
}
