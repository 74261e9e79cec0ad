use opencv::core::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn area(&self) -> f64 {
        self.width as f64 * self.height as f64
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(self.x as i32, self.y as i32, self.width as i32, self.height as i32)
    }
}

impl From<Rect> for BoundingBox {
    fn from(rect: Rect) -> Self {
        BoundingBox {
            x: rect.x.max(0) as u32,
            y: rect.y.max(0) as u32,
            width: rect.width.max(0) as u32,
            height: rect.height.max(0) as u32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStamp {
    pub index: u64,
    pub seconds: Option<f64>,
}

impl FrameStamp {
    /// Timestamp is `index / fps`; sources that report no usable rate produce untimestamped frames.
    pub fn new(index: u64, fps: Option<f64>) -> Self {
        let seconds = fps
            .filter(|fps| fps.is_finite() && *fps > 0.0)
            .map(|fps| index as f64 / fps);

        Self { index, seconds }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub frame: u64,
    pub timestamp: Option<f64>,
    pub bbox: BoundingBox,
    /// Contour area for colour matches, box area for model detections.
    pub area: f64,
    pub score: Option<f64>,
    pub label: Option<String>,
}

impl Detection {
    pub fn new(stamp: FrameStamp, bbox: BoundingBox, area: f64) -> Self {
        Self {
            frame: stamp.index,
            timestamp: stamp.seconds,
            bbox,
            area,
            score: None,
            label: None,
        }
    }

    pub fn scored(stamp: FrameStamp, bbox: BoundingBox, score: f64, label: impl Into<String>) -> Self {
        Self {
            score: Some(score),
            label: Some(label.into()),
            ..Self::new(stamp, bbox, bbox.area())
        }
    }
}

/// All detections of one subject over a run, in the order they were found.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DetectionSet {
    subject: String,
    detections: Vec<Detection>,
}

impl DetectionSet {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            detections: Vec::new(),
        }
    }

    pub fn from_detections(subject: impl Into<String>, detections: Vec<Detection>) -> Self {
        Self {
            subject: subject.into(),
            detections,
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn push(&mut self, detection: Detection) {
        self.detections.push(detection);
    }

    pub fn extend(&mut self, detections: impl IntoIterator<Item = Detection>) {
        self.detections.extend(detections);
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Detection> {
        self.detections.iter()
    }

    pub fn detections(&self) -> &[Detection] {
        &self.detections
    }

    pub fn has_scores(&self) -> bool {
        self.detections.iter().any(|d| d.score.is_some())
    }

    pub fn is_timestamped(&self) -> bool {
        self.detections.iter().all(|d| d.timestamp.is_some())
    }

    pub fn filtered(&self, keep: impl Fn(&Detection) -> bool) -> DetectionSet {
        DetectionSet {
            subject: self.subject.clone(),
            detections: self.detections.iter().filter(|d| keep(d)).cloned().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a DetectionSet {
    type Item = &'a Detection;
    type IntoIter = std::slice::Iter<'a, Detection>;

    fn into_iter(self) -> Self::IntoIter {
        self.detections.iter()
    }
}
