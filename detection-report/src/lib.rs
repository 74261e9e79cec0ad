//! Post-run filtering of detection tables by time window and counting by score band.

use std::{fmt, path::Path, str::FromStr};

use itertools::Itertools;
use vision::{Detection, DetectionSet, Result, VisionError};

/// Inclusive `[start, end]` window in seconds; `end` may be infinite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}

impl TimeWindow {
    pub fn new(start: f64, end: f64) -> Result<Self> {
        if start.is_nan() || end.is_nan() || start > end {
            return Err(VisionError::InvalidInput(format!("time window [{start}, {end}] is empty")));
        }

        Ok(Self { start, end })
    }

    pub fn from_start(start: f64) -> Result<Self> {
        Self::new(start, f64::INFINITY)
    }

    pub fn contains(&self, seconds: f64) -> bool {
        seconds >= self.start && seconds <= self.end
    }
}

impl FromStr for TimeWindow {
    type Err = VisionError;

    /// `START:END`, with an empty or `inf` end for an open window.
    fn from_str(s: &str) -> Result<Self> {
        let (start, end) = s
            .split_once(':')
            .ok_or_else(|| VisionError::InvalidInput(format!("time window '{s}' is not START:END")))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .map_err(|_| VisionError::InvalidInput(format!("'{v}' is not a number of seconds")))
        };

        let start = parse(start)?;
        match end.trim() {
            "" => TimeWindow::from_start(start),
            end => TimeWindow::new(start, parse(end)?),
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.end.is_infinite() {
            write!(f, "[{}, ∞)", self.start)
        } else {
            write!(f, "[{}, {}]", self.start, self.end)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBand {
    pub name: String,
    pub low: f64,
    pub high: f64,
    /// Whether `high` itself belongs to the band.
    pub closed: bool,
}

impl ScoreBand {
    pub fn closed(name: impl Into<String>, low: f64, high: f64) -> Self {
        Self { name: name.into(), low, high, closed: true }
    }

    pub fn half_open(name: impl Into<String>, low: f64, high: f64) -> Self {
        Self { name: name.into(), low, high, closed: false }
    }

    pub fn contains(&self, score: f64) -> bool {
        score >= self.low && (score < self.high || (self.closed && score == self.high))
    }
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub windows: Vec<(String, TimeWindow)>,
    pub bands: Vec<ScoreBand>,
}

impl ReportConfig {
    pub fn window(&self, subject: &str) -> Option<&TimeWindow> {
        self.windows.iter().find(|(name, _)| name == subject).map(|(_, w)| w)
    }

    /// Replaces the window of `subject`, or appends it when the subject is new.
    pub fn set_window(&mut self, subject: &str, window: TimeWindow) {
        match self.windows.iter_mut().find(|(name, _)| name == subject) {
            Some((_, w)) => *w = window,
            None => self.windows.push((subject.to_string(), window)),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        let w = |start: f64, end: f64| TimeWindow { start, end };
        let windows = [
            ("ECO_LETHICIA", w(10.0, 35.0)),
            ("BOSS", w(40.0, 675.0)),
            ("VORTEX", w(40.0, 675.0)),
            ("ECOBOSS", w(40.0, 675.0)),
            ("SUMMON", w(40.0, 675.0)),
            ("MAOBOSS", w(40.0, 675.0)),
            ("TECLADO", w(679.0, f64::INFINITY)),
            // the pole is on screen for the whole video
            ("POSTE", w(0.0, f64::INFINITY)),
            ("modelo", w(0.0, f64::INFINITY)),
        ]
        .into_iter()
        .map(|(name, window)| (name.to_string(), window))
        .collect();

        let bands = vec![
            ScoreBand::closed("0.50–0.60", 0.5, 0.6),
            ScoreBand::closed("0.61–0.70", 0.61, 0.7),
            ScoreBand::closed("0.71–0.80", 0.71, 0.8),
            ScoreBand::closed("0.81–0.90", 0.81, 0.9),
            ScoreBand::closed("0.91–0.99", 0.91, 0.99),
        ];

        Self { windows, bands }
    }
}

/// Untimestamped detections never fall inside a window.
pub fn window_keeps(window: &TimeWindow, detection: &Detection) -> bool {
    detection.timestamp.is_some_and(|t| window.contains(t))
}

pub fn filter_by_window(set: &DetectionSet, window: &TimeWindow) -> DetectionSet {
    set.filtered(|d| window_keeps(window, d))
}

#[derive(Debug, Clone, PartialEq)]
pub struct BandCount {
    pub band: String,
    pub count: usize,
}

/// Per band, how many scored detections fall inside it. Unscored detections count nowhere.
pub fn count_score_bands(set: &DetectionSet, bands: &[ScoreBand]) -> Vec<BandCount> {
    bands
        .iter()
        .map(|band| BandCount {
            band: band.name.clone(),
            count: set.iter().filter_map(|d| d.score).filter(|s| band.contains(*s)).count(),
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct SubjectSummary {
    pub subject: String,
    pub window: TimeWindow,
    pub total: usize,
    pub retained: DetectionSet,
    pub band_counts: Vec<BandCount>,
}

pub fn summarize(set: &DetectionSet, window: TimeWindow, bands: &[ScoreBand]) -> SubjectSummary {
    let retained = filter_by_window(set, &window);
    let band_counts = count_score_bands(&retained, bands);

    SubjectSummary {
        subject: set.subject().to_string(),
        window,
        total: set.len(),
        retained,
        band_counts,
    }
}

#[derive(Debug, Clone, Default)]
pub struct Report {
    pub subjects: Vec<SubjectSummary>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Filtered detections per score band:")?;
        for summary in &self.subjects {
            writeln!(
                f,
                "\n{} {}: {} of {} kept",
                summary.subject,
                summary.window,
                summary.retained.len(),
                summary.total
            )?;
            for count in &summary.band_counts {
                writeln!(f, "  {}: {} detections", count.band, count.count)?;
            }
        }

        Ok(())
    }
}

pub const TABLE_PREFIX: &str = "deteccao_";
pub const FILTERED_SUFFIX: &str = "_filtrado";

/// Subjects with a `deteccao_<SUBJECT>.csv` table in `dir`, sorted, ignoring filtered outputs.
pub fn discover_subjects(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Err(VisionError::NotFound(dir.to_path_buf()));
    }

    let subjects = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            let subject = name.strip_prefix(TABLE_PREFIX)?.strip_suffix(".csv")?;
            (!subject.is_empty() && !subject.ends_with(FILTERED_SUFFIX)).then(|| subject.to_string())
        })
        .sorted()
        .collect();

    Ok(subjects)
}

#[cfg(test)]
mod tests {
    use vision::{BoundingBox, FrameStamp};

    use super::*;

    fn at_seconds(seconds: &[f64]) -> DetectionSet {
        DetectionSet::from_detections(
            "BOSS",
            seconds
                .iter()
                .enumerate()
                .map(|(i, s)| Detection {
                    timestamp: Some(*s),
                    ..Detection::new(FrameStamp::new(i as u64 + 1, None), BoundingBox::default(), 2500.0)
                })
                .collect(),
        )
    }

    #[test]
    fn window_keeps_inclusive_bounds() {
        let set = at_seconds(&[10.0, 39.9, 40.0, 400.0, 675.0, 675.1]);
        let window = ReportConfig::default().window("BOSS").copied().unwrap();

        let kept: Vec<f64> = filter_by_window(&set, &window).iter().filter_map(|d| d.timestamp).collect();

        assert_eq!(kept, vec![40.0, 400.0, 675.0]);
    }

    #[test]
    fn untimestamped_detections_are_dropped() {
        let set = DetectionSet::from_detections(
            "POSTE",
            vec![Detection::new(FrameStamp::new(1, None), BoundingBox::default(), 1.0)],
        );

        assert!(filter_by_window(&set, &TimeWindow::from_start(0.0).unwrap()).is_empty());
    }

    #[test]
    fn parses_windows() {
        assert_eq!("40:675".parse::<TimeWindow>().unwrap(), TimeWindow::new(40.0, 675.0).unwrap());
        assert_eq!("679:".parse::<TimeWindow>().unwrap().end, f64::INFINITY);
        assert_eq!("679:inf".parse::<TimeWindow>().unwrap().end, f64::INFINITY);
        assert!("675:40".parse::<TimeWindow>().is_err());
        assert!("40".parse::<TimeWindow>().is_err());
    }

    #[test]
    fn closed_and_half_open_bands() {
        let closed = ScoreBand::closed("a", 0.5, 0.6);
        let half_open = ScoreBand::half_open("b", 0.5, 0.6);

        assert!(closed.contains(0.6) && !half_open.contains(0.6));
        assert!(closed.contains(0.5) && half_open.contains(0.5));
        assert!(!closed.contains(0.605));
    }

    #[test]
    fn counts_scores_per_band() {
        let stamp = FrameStamp::new(1, Some(1.0));
        let scores = [0.55, 0.6, 0.605, 0.65, 0.95, 0.995];
        let mut set = DetectionSet::new("modelo");
        for s in scores {
            set.push(Detection::scored(stamp, BoundingBox::default(), s, "person"));
        }
        set.push(Detection::new(stamp, BoundingBox::default(), 1.0));

        let counts: Vec<usize> = count_score_bands(&set, &ReportConfig::default().bands)
            .into_iter()
            .map(|c| c.count)
            .collect();

        // 0.605 and 0.995 fall into the gaps between bands
        assert_eq!(counts, vec![2, 1, 0, 0, 1]);
    }

    #[test]
    fn override_window() {
        let mut config = ReportConfig::default();
        config.set_window("BOSS", TimeWindow::new(1.0, 2.0).unwrap());
        config.set_window("NEW", TimeWindow::from_start(5.0).unwrap());

        assert_eq!(config.window("BOSS").unwrap().end, 2.0);
        assert_eq!(config.windows.last().unwrap().0, "NEW");
        assert_eq!(config.windows.len(), 10);
    }
}
