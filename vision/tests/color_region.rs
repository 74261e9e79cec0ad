use nalgebra::Vector3;
use opencv::{
    core::{count_non_zero, Mat, Rect, Scalar, CV_8UC1, CV_8UC3},
    imgproc::{rectangle, LINE_8},
};
use vision::{
    build_reference, AreaBand, ColorReference, ColorRegionDetector, ColorScan, DetectorConfig, FrameStamp,
    ToleranceWindow, VisionError,
};

const ORANGE: (f64, f64, f64) = (40.0, 140.0, 230.0);

fn filled(rows: i32, cols: i32, bgr: (f64, f64, f64)) -> Mat {
    Mat::new_rows_cols_with_default(rows, cols, CV_8UC3, Scalar::new(bgr.0, bgr.1, bgr.2, 0.0)).unwrap()
}

fn paint(frame: &mut Mat, rect: Rect, bgr: (f64, f64, f64)) {
    rectangle(frame, rect, Scalar::new(bgr.0, bgr.1, bgr.2, 0.0), -1, LINE_8, 0).unwrap();
}

fn reference(name: &str, bgr: (f64, f64, f64)) -> ColorReference {
    build_reference(name, [Vector3::new(bgr.0, bgr.1, bgr.2)]).unwrap()
}

#[test]
fn membership_is_reflexive() {
    let detector = ColorRegionDetector::new(DetectorConfig {
        tolerance: ToleranceWindow::new(0, 0, 0),
        ..DetectorConfig::default()
    })
    .unwrap();
    let frame = filled(60, 80, ORANGE);

    let mask = detector.mask(&frame, &reference("ORANGE", ORANGE)).unwrap();

    assert_eq!(count_non_zero(&mask).unwrap(), 60 * 80);
}

#[test]
fn uniform_frame_yields_one_full_detection() {
    let detector = ColorRegionDetector::new(DetectorConfig::default()).unwrap();
    let frame = filled(100, 100, ORANGE);

    let detections = detector
        .detect(&frame, &reference("ORANGE", ORANGE), FrameStamp::new(30, Some(30.0)))
        .unwrap();

    assert_eq!(detections.len(), 1);
    let det = &detections[0];
    assert_eq!((det.bbox.x, det.bbox.y, det.bbox.width, det.bbox.height), (0, 0, 100, 100));
    // the contour runs through pixel centres, so the enclosed area is 99 x 99
    assert!(det.area > 9500.0 && det.area <= 10000.0, "area was {}", det.area);
    assert_eq!(det.frame, 30);
    assert_eq!(det.timestamp, Some(1.0));
}

#[test]
fn small_region_is_rejected_as_noise() {
    let detector = ColorRegionDetector::new(DetectorConfig::default()).unwrap();
    let mut frame = filled(200, 200, (0.0, 0.0, 0.0));
    paint(&mut frame, Rect::new(20, 20, 5, 10), ORANGE);

    let detections = detector
        .detect(&frame, &reference("ORANGE", ORANGE), FrameStamp::new(1, None))
        .unwrap();

    assert!(detections.is_empty());
}

#[test]
fn keeps_large_region_next_to_noise() {
    let detector = ColorRegionDetector::new(DetectorConfig::default()).unwrap();
    let mut frame = filled(200, 200, (0.0, 0.0, 0.0));
    paint(&mut frame, Rect::new(5, 5, 5, 10), ORANGE);
    paint(&mut frame, Rect::new(100, 80, 60, 70), ORANGE);

    let detections = detector
        .detect(&frame, &reference("ORANGE", ORANGE), FrameStamp::new(1, None))
        .unwrap();

    assert_eq!(detections.len(), 1);
    assert_eq!(detections[0].bbox.x, 100);
    assert_eq!(detections[0].bbox.width, 60);
    assert_eq!(detections[0].timestamp, None);
}

#[test]
fn oversized_region_is_rejected() {
    let detector = ColorRegionDetector::new(DetectorConfig {
        area_band: AreaBand::new(2000.0, 5000.0),
        ..DetectorConfig::default()
    })
    .unwrap();
    let frame = filled(100, 100, ORANGE);

    let detections = detector
        .detect(&frame, &reference("ORANGE", ORANGE), FrameStamp::new(1, None))
        .unwrap();

    assert!(detections.is_empty());
}

#[test]
fn other_colours_do_not_match() {
    let detector = ColorRegionDetector::new(DetectorConfig::default()).unwrap();
    let frame = filled(100, 100, (255.0, 0.0, 0.0));

    let detections = detector
        .detect(&frame, &reference("ORANGE", ORANGE), FrameStamp::new(1, None))
        .unwrap();

    assert!(detections.is_empty());
}

#[test]
fn malformed_frames_are_invalid_input() {
    let detector = ColorRegionDetector::new(DetectorConfig::default()).unwrap();
    let gray = Mat::new_rows_cols_with_default(10, 10, CV_8UC1, Scalar::all(0.0)).unwrap();
    let orange = reference("ORANGE", ORANGE);

    assert!(matches!(
        detector.detect(&gray, &orange, FrameStamp::new(1, None)),
        Err(VisionError::InvalidInput(_))
    ));
    assert!(matches!(
        detector.detect(&Mat::default(), &orange, FrameStamp::new(1, None)),
        Err(VisionError::InvalidInput(_))
    ));
}

#[test]
fn scan_accumulates_per_reference() {
    let references = vec![reference("ORANGE", ORANGE), reference("BLUE", (255.0, 0.0, 0.0))];
    let mut scan = ColorScan::new(DetectorConfig::default(), references).unwrap();

    let mut frame = filled(200, 200, (0.0, 0.0, 0.0));
    paint(&mut frame, Rect::new(0, 0, 60, 60), ORANGE);
    for index in 1..=3 {
        scan.process_frame(&frame, FrameStamp::new(index, Some(10.0))).unwrap();
    }

    let sets = scan.into_sets();
    assert_eq!(sets.len(), 2);
    assert_eq!(sets[0].subject(), "ORANGE");
    assert_eq!(sets[0].len(), 3);
    assert_eq!(sets[0].detections().iter().map(|d| d.frame).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert!(sets[1].is_empty());
}
