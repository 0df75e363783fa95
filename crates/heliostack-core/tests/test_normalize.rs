mod common;

use approx::assert_relative_eq;

use heliostack_core::error::HeliostackError;
use heliostack_core::normalize::{build_target_frame, normalize, BilinearReprojector};

use common::{argmax, sky_image_with_blob};

#[test]
fn test_world_pixel_round_trip_and_signs() {
    let wcs = common::test_skyframe(0.0, (50.0, 50.0));

    // north (positive Ty) is up: smaller row index
    let (x, y) = wcs.world_to_pixel(0.0, 112.0);
    assert_relative_eq!(x, 50.0);
    assert_relative_eq!(y, 48.0); // 112 / 56 = 2 px up

    // east (positive Tx) is right
    let (x, _) = wcs.world_to_pixel(112.0, 0.0);
    assert_relative_eq!(x, 52.0);

    let (tx, ty) = wcs.pixel_to_world(52.0, 48.0);
    assert_relative_eq!(tx, 112.0);
    assert_relative_eq!(ty, 112.0);
}

#[test]
fn test_missing_observer_fails_normalization() {
    let mut img = sky_image_with_blob(100, 50, 50, 0.0, (50.0, 50.0));
    img.wcs.observer = None;

    let err = normalize(&img, &BilinearReprojector).unwrap_err();
    assert!(matches!(err, HeliostackError::MissingMetadata(_)));
}

#[test]
fn test_target_frame_is_sun_centered() {
    let img = sky_image_with_blob(100, 20, 30, 0.0, (30.0, 20.0));
    let target = build_target_frame(&img);

    assert_eq!(target.ref_pixel, (50.0, 50.0));
    assert_eq!(target.ref_coord, (0.0, 0.0));
    assert_eq!(target.rotation_deg, 0.0);
    assert_relative_eq!(target.scale, img.wcs.scale);
    assert_eq!(target.obstime, img.wcs.obstime);
    assert_eq!(target.observer, img.wcs.observer);
}

#[test]
fn test_already_canonical_frame_is_unchanged() {
    let img = sky_image_with_blob(100, 40, 60, 0.0, (50.0, 50.0));
    let out = normalize(&img, &BilinearReprojector).unwrap();

    assert_eq!(out.frame.data.dim(), (100, 100));
    for ((r, c), &v) in out.frame.data.indexed_iter() {
        assert!(
            (v - img.frame.data[[r, c]]).abs() < 1e-5,
            "pixel ({r},{c}) drifted"
        );
    }
    assert_eq!(out.wcs.ref_pixel, (50.0, 50.0));
}

#[test]
fn test_off_center_sun_is_recentered() {
    // Sun at (30, 30), blob sitting right on it
    let img = sky_image_with_blob(100, 30, 30, 0.0, (30.0, 30.0));
    let out = normalize(&img, &BilinearReprojector).unwrap();

    let (row, col) = argmax(&out.frame.data);
    assert_eq!((row, col), (50, 50));
}

#[test]
fn test_rotation_preserves_reference_pixel() {
    // blob on the Sun center must not drift, whatever the roll angle
    for rot in [30.0, 90.0, 180.0, -45.0] {
        let img = sky_image_with_blob(100, 50, 50, rot, (50.0, 50.0));
        let out = normalize(&img, &BilinearReprojector).unwrap();
        let (row, col) = argmax(&out.frame.data);
        assert_eq!((row, col), (50, 50), "rotation {rot}");
    }
}

#[test]
fn test_half_turn_mirrors_offset_features() {
    // with a 180 degree roll, a feature east of the Sun in raster space is
    // really west of it; normalization must flip it through the center
    let img = sky_image_with_blob(100, 50, 60, 180.0, (50.0, 50.0));
    let out = normalize(&img, &BilinearReprojector).unwrap();

    let (row, col) = argmax(&out.frame.data);
    assert_eq!(row, 50);
    assert_eq!(col, 40);
}
