mod common;

use std::fs;

use ndarray::Array2;

use heliostack_core::coord::project;
use heliostack_core::crop::crop_region;
use heliostack_core::error::HeliostackError;
use heliostack_core::frame::AngularOffset;
use heliostack_core::io::image_io::save_png16;
use heliostack_core::io::paths::raw_image_path;
use heliostack_core::io::sidecar::save_sidecar;
use heliostack_core::normalize::BilinearReprojector;
use heliostack_core::pipeline::config::RunConfig;
use heliostack_core::pipeline::{run_pipeline, FrameOutcome, NoOpReporter};
use heliostack_core::source::{DirectorySource, Ephemeris, TableEphemeris};
use heliostack_core::stack::{combine, StackMode};
use heliostack_core::time::Timestamp;

use common::{argmax, frame_with_blob, test_skyframe};

/// Tracking the body across frames must concentrate its signal, while a
/// naive Sun-centered stack smears it over the per-frame positions.
#[test]
fn test_tracked_stack_concentrates_moving_target() {
    let offsets = [
        AngularOffset {
            tx_arcsec: 0.0,
            ty_arcsec: 0.0,
        },
        AngularOffset {
            tx_arcsec: 10.0,
            ty_arcsec: 5.0,
        },
        AngularOffset {
            tx_arcsec: -10.0,
            ty_arcsec: -5.0,
        },
    ];
    let center = (50i64, 50i64);
    let scale = 1.0;
    let ratio = 1.0;

    // plant the body at its projected pixel in each frame
    let frames: Vec<Array2<f32>> = offsets
        .iter()
        .map(|&off| {
            let px = project(off, scale, ratio, center).unwrap();
            frame_with_blob(100, px.y as usize, px.x as usize).data
        })
        .collect();

    // tracked: crop each frame at its own projected center
    let tracked: Vec<Array2<f32>> = offsets
        .iter()
        .zip(&frames)
        .map(|(&off, frame)| {
            let px = project(off, scale, ratio, center).unwrap();
            crop_region(frame, px.x, px.y, 21)
        })
        .collect();
    let tracked_stack = combine(&tracked, StackMode::Mean).unwrap();

    assert_eq!(argmax(&tracked_stack), (10, 10));
    let tracked_peak = tracked_stack[[10, 10]];
    assert!((tracked_peak - 0.9).abs() < 1e-5);

    // naive: crop every frame at the Sun, no per-frame recentring
    let naive: Vec<Array2<f32>> = frames
        .iter()
        .map(|frame| crop_region(frame, center.0, center.1, 21))
        .collect();
    let naive_stack = combine(&naive, StackMode::Mean).unwrap();

    let naive_peak = naive_stack
        .iter()
        .copied()
        .fold(f32::NEG_INFINITY, f32::max);
    assert!(naive_peak < tracked_peak / 2.0);

    // the signal is spread over one spot per frame
    let spots = naive_stack
        .iter()
        .filter(|&&v| (v - naive_peak).abs() < 1e-5)
        .count();
    assert_eq!(spots, 3);
}

fn write_raw_frame(dir: &std::path::Path, ts: &Timestamp, blob: (usize, usize)) {
    let path = raw_image_path(dir, "LASCO_C3", ts);
    let mut wcs = test_skyframe(0.0, (32.0, 32.0));
    wcs.obstime = *ts;
    save_png16(&frame_with_blob(64, blob.0, blob.1), &path).unwrap();
    save_sidecar(&path, &wcs).unwrap();
}

#[test]
fn test_full_pipeline_run() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    let results_dir = dir.path().join("results");
    fs::create_dir_all(&data_dir).unwrap();

    let times: Vec<Timestamp> = [
        "2025-10-17 00:00",
        "2025-10-17 01:00",
        "2025-10-17 02:00",
        "2025-10-17 03:00",
    ]
    .iter()
    .map(|s| Timestamp::parse(s).unwrap())
    .collect();

    // body drifts by +-2 original pixels (112" at 56"/px); the frame for
    // 03:00 is deliberately missing
    write_raw_frame(&data_dir, &times[0], (32, 32));
    write_raw_frame(&data_dir, &times[1], (32, 34));
    write_raw_frame(&data_dir, &times[2], (34, 32));

    let ephem_path = dir.path().join("ephemeris.json");
    fs::write(
        &ephem_path,
        r#"{
            "body": "C/2025 N1",
            "positions": [
                {"time": "2025-10-17 00:00", "tx_arcsec": 0.0, "ty_arcsec": 0.0},
                {"time": "2025-10-17 01:00", "tx_arcsec": 112.0, "ty_arcsec": 0.0},
                {"time": "2025-10-17 02:00", "tx_arcsec": 0.0, "ty_arcsec": -112.0},
                {"time": "2025-10-17 03:00", "tx_arcsec": 0.0, "ty_arcsec": 0.0}
            ]
        }"#,
    )
    .unwrap();

    let config = RunConfig {
        start: times[0],
        end: times[3],
        interval_hours: 1.0,
        body: "C/2025 N1".to_string(),
        instrument: "LASCO_C3".to_string(),
        data_dir: data_dir.clone(),
        results_dir: results_dir.clone(),
        crop_size: 16,
        upsample_size: 128,
        pixel_scale: 56.0,
    };

    let source = DirectorySource::new(&data_dir, "LASCO_C3");
    let ephemeris = TableEphemeris::load(&ephem_path).unwrap();
    assert_eq!(ephemeris.body(), "C/2025 N1");
    let report = run_pipeline(
        &config,
        &source,
        &ephemeris,
        &BilinearReprojector,
        &NoOpReporter,
    )
    .unwrap();

    assert_eq!(report.stacked_count(), 3);
    assert_eq!(report.skipped_count(), 1);
    assert!(matches!(
        report.frames[3].outcome,
        FrameOutcome::Skipped { .. }
    ));

    // normalized images and both stacks were written
    assert!(data_dir
        .join("Fixed")
        .join("Fixed_LASCO_C3_2025-10-17_00h00m.png")
        .exists());
    assert!(results_dir.join("mean_stack.png").exists());
    assert!(results_dir.join("median_stack.png").exists());

    // the per-frame check image marks the predicted position: 112" east at
    // 56"/px puts the body 2 px right of the Sun-center pixel (32, 32)
    let marked = image::open(
        data_dir
            .join("Marked")
            .join("Marked_LASCO_C3_2025-10-17_01h00m.png"),
    )
    .unwrap()
    .to_luma8();
    assert_eq!(marked.dimensions(), (64, 64));
    assert_eq!(marked.get_pixel(34 + 12, 32).0[0], 255);
    assert_eq!(marked.get_pixel(34 - 12, 32).0[0], 255);
    assert_eq!(marked.get_pixel(34, 32 + 12).0[0], 255);
    assert_eq!(marked.get_pixel(34 + 11, 32).0[0], 0);

    // the tracked body lands in the middle of the mean stack
    let img = image::open(results_dir.join("mean_stack.png"))
        .unwrap()
        .to_luma8();
    let mut best = (0u32, 0u32);
    let mut best_val = 0u8;
    for row in 0..16u32 {
        for col in 0..16u32 {
            let v = img.get_pixel(col, row).0[0];
            if v > best_val {
                best_val = v;
                best = (row, col);
            }
        }
    }
    assert!(
        (7..=9).contains(&best.0) && (7..=9).contains(&best.1),
        "peak at {best:?}"
    );
}

#[test]
fn test_ephemeris_table_is_bound_to_one_body() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ephemeris.json");
    fs::write(
        &path,
        r#"{
            "body": "C/2025 N1",
            "positions": [
                {"time": "2025-10-17 00:00", "tx_arcsec": 1.0, "ty_arcsec": 2.0}
            ]
        }"#,
    )
    .unwrap();

    let table = TableEphemeris::load(&path).unwrap();
    assert_eq!(table.body(), "C/2025 N1");

    let observer = test_skyframe(0.0, (0.0, 0.0)).observer().unwrap();
    let ts = Timestamp::parse("2025-10-17 00:00").unwrap();
    let off = table.locate("C/2025 N1", &ts, &observer).unwrap();
    assert_eq!(off.tx_arcsec, 1.0);
    assert_eq!(off.ty_arcsec, 2.0);

    assert!(table.locate("2I/Borisov", &ts, &observer).is_err());
}

#[test]
fn test_run_with_no_frames_is_empty_batch() {
    let dir = tempfile::tempdir().unwrap();
    let config = RunConfig {
        start: Timestamp::parse("2025-10-17 00:00").unwrap(),
        end: Timestamp::parse("2025-10-17 02:00").unwrap(),
        interval_hours: 1.0,
        body: "C/2025 N1".to_string(),
        instrument: "LASCO_C3".to_string(),
        data_dir: dir.path().join("data"),
        results_dir: dir.path().join("results"),
        crop_size: 16,
        upsample_size: 128,
        pixel_scale: 56.0,
    };

    let ephem_path = dir.path().join("ephemeris.json");
    fs::write(&ephem_path, r#"{"body": "C/2025 N1", "positions": []}"#).unwrap();

    let source = DirectorySource::new(dir.path().join("data"), "LASCO_C3");
    let ephemeris = TableEphemeris::load(&ephem_path).unwrap();
    let err = run_pipeline(
        &config,
        &source,
        &ephemeris,
        &BilinearReprojector,
        &NoOpReporter,
    )
    .unwrap_err();

    assert!(matches!(err, HeliostackError::EmptySequence));
}
