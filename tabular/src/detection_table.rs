use std::path::Path;

use csv::StringRecord;
use serde::{de, Deserialize, Deserializer};
use vision::{BoundingBox, Detection, DetectionSet, Result, VisionError};

use crate::{ensure_exists, lenient_integer};

const REQUIRED_COLUMNS: [&str; 6] = ["frame", "x", "y", "w", "h", "area"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionSchema {
    /// `frame,x,y,w,h,area`
    Untimestamped,
    /// `frame,tempo_s,x,y,w,h,area`
    Timestamped,
    /// `frame,tempo_s,x,y,w,h,area,score,label`
    Scored,
}

impl DetectionSchema {
    /// Smallest layout that holds every value in `set`. Empty sets default to `Timestamped`.
    pub fn infer(set: &DetectionSet) -> DetectionSchema {
        if set.has_scores() {
            DetectionSchema::Scored
        } else if set.is_empty() || set.is_timestamped() {
            DetectionSchema::Timestamped
        } else {
            DetectionSchema::Untimestamped
        }
    }

    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            DetectionSchema::Untimestamped => &["frame", "x", "y", "w", "h", "area"],
            DetectionSchema::Timestamped => &["frame", "tempo_s", "x", "y", "w", "h", "area"],
            DetectionSchema::Scored => &["frame", "tempo_s", "x", "y", "w", "h", "area", "score", "label"],
        }
    }

    fn record(&self, d: &Detection) -> Vec<String> {
        let optional = |v: Option<String>| v.unwrap_or_default();
        let mut record = vec![d.frame.to_string()];

        if *self != DetectionSchema::Untimestamped {
            record.push(optional(d.timestamp.map(|t| t.to_string())));
        }
        record.extend([
            d.bbox.x.to_string(),
            d.bbox.y.to_string(),
            d.bbox.width.to_string(),
            d.bbox.height.to_string(),
            d.area.to_string(),
        ]);
        if *self == DetectionSchema::Scored {
            record.push(optional(d.score.map(|s| s.to_string())));
            record.push(optional(d.label.clone()));
        }

        record
    }
}

#[derive(Debug, Deserialize)]
struct DetectionRow {
    #[serde(deserialize_with = "integer_cell")]
    frame: u64,
    #[serde(rename = "tempo_s", default)]
    timestamp: Option<f64>,
    #[serde(deserialize_with = "integer_cell")]
    x: u64,
    #[serde(deserialize_with = "integer_cell")]
    y: u64,
    #[serde(rename = "w", deserialize_with = "integer_cell")]
    width: u64,
    #[serde(rename = "h", deserialize_with = "integer_cell")]
    height: u64,
    area: f64,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    label: Option<String>,
}

impl DetectionRow {
    fn into_detection(self, path: &Path) -> Result<Detection> {
        let coordinate = |value: u64, column: &str| {
            u32::try_from(value)
                .map_err(|_| VisionError::malformed(path, format!("{column} = {value} in frame {} is not a pixel coordinate", self.frame)))
        };
        let bbox = BoundingBox::new(
            coordinate(self.x, "x")?,
            coordinate(self.y, "y")?,
            coordinate(self.width, "w")?,
            coordinate(self.height, "h")?,
        );

        Ok(Detection {
            frame: self.frame,
            timestamp: self.timestamp,
            bbox,
            area: self.area,
            score: self.score,
            label: self.label.filter(|l| !l.is_empty()),
        })
    }
}

/// Accepts `12` as well as `12.0`, which dataframe tools write for integer columns.
fn integer_cell<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u64, D::Error> {
    let value = f64::deserialize(deserializer)?;
    lenient_integer(value)
        .ok_or_else(|| de::Error::custom(format!("expected a non-negative integer, got {value}")))
}

pub fn write_detections(path: &Path, set: &DetectionSet, schema: DetectionSchema) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(schema.headers())?;
    for detection in set {
        writer.write_record(schema.record(detection))?;
    }
    writer.flush()?;

    Ok(())
}

fn open_table(path: &Path) -> Result<(csv::Reader<std::fs::File>, StringRecord)> {
    ensure_exists(path)?;

    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !headers.iter().any(|h| h == *c))
        .collect();
    if !missing.is_empty() {
        return Err(VisionError::malformed(path, format!("missing column(s) {}", missing.join(","))));
    }

    Ok((reader, headers))
}

fn parse_row(path: &Path, record: &StringRecord, headers: &StringRecord) -> Result<Detection> {
    record
        .deserialize::<DetectionRow>(Some(headers))
        .map_err(|e| VisionError::malformed(path, e.to_string()))?
        .into_detection(path)
}

/// Reads any of the three detection layouts. The subject name is taken from the caller.
pub fn read_detections(path: &Path, subject: &str) -> Result<DetectionSet> {
    let (mut reader, headers) = open_table(path)?;

    let detections = reader
        .records()
        .map(|record| parse_row(path, &record?, &headers))
        .collect::<Result<Vec<_>>>()?;

    Ok(DetectionSet::from_detections(subject, detections))
}

/// Copies the rows of `src` whose detection passes `keep` to `dst`, leaving every
/// column (including unknown ones) and every cell exactly as written. Returns the
/// number of rows kept.
pub fn filter_detection_table(src: &Path, dst: &Path, mut keep: impl FnMut(&Detection) -> bool) -> Result<usize> {
    let (mut reader, headers) = open_table(src)?;
    let mut writer = csv::Writer::from_path(dst)?;
    writer.write_record(&headers)?;

    let mut kept = 0;
    for record in reader.records() {
        let record = record?;
        if keep(&parse_row(src, &record, &headers)?) {
            writer.write_record(&record)?;
            kept += 1;
        }
    }
    writer.flush()?;

    Ok(kept)
}

#[cfg(test)]
mod tests {
    use vision::FrameStamp;

    use super::*;

    #[test]
    fn schema_follows_contents() {
        let stamp = FrameStamp::new(3, Some(30.0));
        let mut set = DetectionSet::new("BOSS");
        assert_eq!(DetectionSchema::infer(&set), DetectionSchema::Timestamped);

        set.push(Detection::new(stamp, BoundingBox::new(1, 2, 3, 4), 12.0));
        assert_eq!(DetectionSchema::infer(&set), DetectionSchema::Timestamped);

        set.push(Detection::new(FrameStamp::new(4, None), BoundingBox::default(), 1.0));
        assert_eq!(DetectionSchema::infer(&set), DetectionSchema::Untimestamped);

        set.push(Detection::scored(stamp, BoundingBox::new(0, 0, 2, 2), 0.5, "cat"));
        assert_eq!(DetectionSchema::infer(&set), DetectionSchema::Scored);
    }

    #[test]
    fn untimestamped_record_skips_time_column() {
        let det = Detection::new(FrameStamp::new(7, Some(7.0)), BoundingBox::new(1, 2, 3, 4), 9801.0);

        assert_eq!(DetectionSchema::Untimestamped.record(&det), vec!["7", "1", "2", "3", "4", "9801"]);
        assert_eq!(DetectionSchema::Timestamped.record(&det)[1], "1");
    }
}
