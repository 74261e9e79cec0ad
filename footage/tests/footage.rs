use footage::{draw_box, load_image, roi_image, sample_roi, save_frame, FrameList, FrameSource, Roi};
use opencv::{
    core::{Mat, Rect, Scalar, Vec3b, CV_8UC3},
    imgproc::{rectangle, LINE_8},
    prelude::*,
};
use tempfile::tempdir;
use vision::{BoundingBox, PixelSampleRow, VisionError};

fn checker() -> Mat {
    let mut img = Mat::new_rows_cols_with_default(20, 30, CV_8UC3, Scalar::new(10.0, 20.0, 30.0, 0.0)).unwrap();
    rectangle(&mut img, Rect::new(5, 4, 3, 2), Scalar::new(200.0, 100.0, 50.0, 0.0), -1, LINE_8, 0).unwrap();
    img
}

#[test]
fn samples_every_roi_pixel_with_absolute_coordinates() {
    let rows = sample_roi(&checker(), Roi::new(5, 4, 3, 2)).unwrap();

    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0], PixelSampleRow::direct(5, 4, 200, 100, 50));
    assert_eq!(rows[5], PixelSampleRow::direct(7, 5, 200, 100, 50));
}

#[test]
fn zero_size_roi_is_an_empty_selection() {
    assert!(matches!(sample_roi(&checker(), Roi::new(5, 4, 0, 2)), Err(VisionError::EmptySelection)));
}

#[test]
fn roi_outside_image_is_rejected() {
    assert!(matches!(sample_roi(&checker(), Roi::new(25, 0, 10, 2)), Err(VisionError::InvalidInput(_))));
}

#[test]
fn roi_image_is_a_copy_of_the_region() {
    let cropped = roi_image(&checker(), Roi::new(5, 4, 3, 2)).unwrap();

    assert_eq!((cropped.cols(), cropped.rows()), (3, 2));
    assert_eq!(*cropped.at_2d::<Vec3b>(1, 2).unwrap(), Vec3b::from([200, 100, 50]));
}

#[test]
fn frame_list_replays_in_order() {
    let frames = vec![checker(), Mat::new_rows_cols_with_default(2, 2, CV_8UC3, Scalar::all(0.0)).unwrap()];
    let mut source = FrameList::new(frames, Some(25.0));

    assert_eq!(source.fps(), Some(25.0));
    assert_eq!(source.next_frame().unwrap().unwrap().cols(), 30);
    assert_eq!(source.next_frame().unwrap().unwrap().cols(), 2);
    assert!(source.next_frame().unwrap().is_none());
}

#[test]
fn saved_frame_loads_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("frame_000010.png");
    let mut frame = checker();
    draw_box(&mut frame, &BoundingBox::new(10, 10, 8, 6), Scalar::new(0.0, 255.0, 0.0, 0.0), Some("ECO")).unwrap();

    save_frame(&path, &frame).unwrap();
    let loaded = load_image(&path).unwrap();

    assert_eq!((loaded.cols(), loaded.rows()), (30, 20));
    assert_eq!(*loaded.at_2d::<Vec3b>(10, 10).unwrap(), Vec3b::from([0, 255, 0]));
}

#[test]
fn missing_image_is_not_found() {
    assert!(matches!(
        load_image(std::path::Path::new("/nonexistent/BOSS.jpeg")),
        Err(VisionError::NotFound(_))
    ));
}
