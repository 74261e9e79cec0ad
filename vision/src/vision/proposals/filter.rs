use super::detection::{Detection, DetectionSet};

/// Inclusive `[min, max]` band on contour area; everything outside is treated as noise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaBand {
    pub min: f64,
    pub max: f64,
}

impl AreaBand {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline(always)]
    pub fn contains(&self, area: f64) -> bool {
        area >= self.min && area <= self.max
    }
}

impl Default for AreaBand {
    fn default() -> Self {
        Self::new(2000.0, 50000.0)
    }
}

#[inline(always)]
pub fn filter_by_area(detections: Vec<Detection>, band: &AreaBand) -> Vec<Detection> {
    detections.into_iter().filter(|d| band.contains(d.area)).collect()
}

pub fn filter_set_by_area(set: &DetectionSet, band: &AreaBand) -> DetectionSet {
    set.filtered(|d| band.contains(d.area))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::proposals::detection::{BoundingBox, FrameStamp};

    fn with_area(area: f64) -> Detection {
        Detection::new(FrameStamp::new(1, None), BoundingBox::default(), area)
    }

    #[test]
    fn band_is_inclusive() {
        let band = AreaBand::default();

        assert!(band.contains(2000.0));
        assert!(band.contains(50000.0));
        assert!(!band.contains(1999.9));
        assert!(!band.contains(50000.1));
    }

    #[test]
    fn area_filter_is_idempotent() {
        let band = AreaBand::default();
        let set = DetectionSet::from_detections(
            "BOSS",
            [10.0, 2000.0, 9801.0, 60000.0, 50000.0].into_iter().map(with_area).collect(),
        );

        let once = filter_set_by_area(&set, &band);
        let twice = filter_set_by_area(&once, &band);

        assert_eq!(once.len(), 3);
        assert_eq!(once, twice);
    }
}
