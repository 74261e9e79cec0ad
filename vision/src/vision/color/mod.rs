pub mod reference;
pub mod sample;

use crate::error::{Result, VisionError};

/// Upper bound of the 8-bit hue channel (OpenCV stores hue as degrees / 2).
pub const HUE_MAX: u8 = 180;
pub const SAT_MAX: u8 = 255;
pub const VAL_MAX: u8 = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub fn new(h: u8, s: u8, v: u8) -> Result<Hsv> {
        if h > HUE_MAX {
            return Err(VisionError::InvalidInput(format!(
                "hue {h} is outside 0..={HUE_MAX}"
            )));
        }

        Ok(Hsv { h, s, v })
    }

    pub fn channels(&self) -> [u8; 3] {
        [self.h, self.s, self.v]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorReference {
    name: String,
    hsv: Hsv,
}

impl ColorReference {
    pub fn new(name: impl Into<String>, hsv: Hsv) -> Self {
        Self {
            name: name.into(),
            hsv,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hsv(&self) -> Hsv {
        self.hsv
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToleranceWindow {
    pub h: u16,
    pub s: u16,
    pub v: u16,
}

impl ToleranceWindow {
    pub const fn new(h: u16, s: u16, v: u16) -> Self {
        Self { h, s, v }
    }

    pub fn range_around(&self, center: Hsv) -> HsvRange {
        HsvRange::around(center, *self)
    }
}

impl Default for ToleranceWindow {
    fn default() -> Self {
        Self::new(12, 80, 80)
    }
}

/// Inclusive per-channel band used to threshold an HSV frame.
///
/// Hue is clamped at 0 and 180 rather than wrapped, so a reddish reference
/// near either end will not match its neighbours across the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    pub fn around(center: Hsv, tolerance: ToleranceWindow) -> HsvRange {
        let maxima = [HUE_MAX, SAT_MAX, VAL_MAX];
        let tolerances = [tolerance.h, tolerance.s, tolerance.v];
        let mut lower = [0u8; 3];
        let mut upper = [0u8; 3];

        for (i, value) in center.channels().into_iter().enumerate() {
            let value = value as i32;
            let tol = tolerances[i] as i32;
            let max = maxima[i] as i32;
            lower[i] = (value - tol).clamp(0, max) as u8;
            upper[i] = (value + tol).clamp(0, max) as u8;
        }

        HsvRange { lower, upper }
    }

    pub fn contains(&self, hsv: Hsv) -> bool {
        hsv.channels()
            .iter()
            .enumerate()
            .all(|(i, c)| *c >= self.lower[i] && *c <= self.upper[i])
    }

    pub fn lower_bound(&self) -> [i32; 3] {
        self.lower.map(i32::from)
    }

    pub fn upper_bound(&self) -> [i32; 3] {
        self.upper.map(i32::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_never_leave_channel_ranges() {
        let values = [0u8, 1, 12, 90, 179, 180];
        let tolerances = [0u16, 1, 12, 80, 255, 1000];

        for h in values {
            for s in [0u8, 1, 128, 254, 255] {
                for t in tolerances {
                    let center = Hsv::new(h, s, s).unwrap();
                    let range = ToleranceWindow::new(t, t, t).range_around(center);

                    assert!(range.upper[0] <= HUE_MAX);
                    assert!(range.upper[1] <= SAT_MAX && range.upper[2] <= VAL_MAX);
                    assert!(range.lower.iter().zip(range.upper.iter()).all(|(l, u)| l <= u));
                    assert!(range.contains(center));
                }
            }
        }
    }

    #[test]
    fn default_tolerance_range() {
        let range = ToleranceWindow::default().range_around(Hsv::new(100, 200, 50).unwrap());

        assert_eq!(range.lower, [88, 120, 0]);
        assert_eq!(range.upper, [112, 255, 130]);
    }

    #[test]
    fn hue_does_not_wrap() {
        let range = ToleranceWindow::new(10, 0, 0).range_around(Hsv::new(3, 100, 100).unwrap());

        assert_eq!(range.lower[0], 0);
        assert!(!range.contains(Hsv::new(178, 100, 100).unwrap()));
    }

    #[test]
    fn rejects_hue_above_range() {
        assert!(matches!(Hsv::new(181, 0, 0), Err(VisionError::InvalidInput(_))));
    }
}
