use heliostack_core::coord::project;
use heliostack_core::error::HeliostackError;
use heliostack_core::frame::{AngularOffset, PixelOffset};

#[test]
fn test_zero_offset_hits_center() {
    let zero = AngularOffset {
        tx_arcsec: 0.0,
        ty_arcsec: 0.0,
    };
    for (scale, ratio) in [(56.0, 4.0), (1.0, 1.0), (11.9, 2.5), (-3.0, 4.0)] {
        let px = project(zero, scale, ratio, (2048, 2048)).unwrap();
        assert_eq!(px, PixelOffset { x: 2048, y: 2048 });
    }
}

#[test]
fn test_east_moves_right_north_moves_up() {
    let offset = AngularOffset {
        tx_arcsec: 140.0,
        ty_arcsec: 280.0,
    };
    let px = project(offset, 56.0, 4.0, (2048, 2048)).unwrap();
    // 140 * 4 / 56 = 10 px east; north is up, so the row index decreases
    assert_eq!(px.x, 2048 + 10);
    assert_eq!(px.y, 2048 - 20);
}

#[test]
fn test_rounds_to_nearest_pixel() {
    let offset = AngularOffset {
        tx_arcsec: 7.0,
        ty_arcsec: 0.0,
    };
    // 7 * 4 / 56 = 0.5 -> rounds away from zero
    let px = project(offset, 56.0, 4.0, (0, 0)).unwrap();
    assert_eq!(px.x, 1);

    let offset = AngularOffset {
        tx_arcsec: 6.0,
        ty_arcsec: 0.0,
    };
    // 6 * 4 / 56 = 0.43 -> rounds down
    let px = project(offset, 56.0, 4.0, (0, 0)).unwrap();
    assert_eq!(px.x, 0);
}

#[test]
fn test_zero_scale_rejected() {
    let offset = AngularOffset {
        tx_arcsec: 1.0,
        ty_arcsec: 1.0,
    };
    let err = project(offset, 0.0, 4.0, (0, 0)).unwrap_err();
    assert!(matches!(err, HeliostackError::InvalidScale(_)));

    let err = project(offset, f64::NAN, 4.0, (0, 0)).unwrap_err();
    assert!(matches!(err, HeliostackError::InvalidScale(_)));
}

#[test]
fn test_non_finite_offset_rejected() {
    let offset = AngularOffset {
        tx_arcsec: f64::INFINITY,
        ty_arcsec: 0.0,
    };
    let err = project(offset, 56.0, 4.0, (0, 0)).unwrap_err();
    assert!(matches!(err, HeliostackError::InvalidScale(_)));
}
