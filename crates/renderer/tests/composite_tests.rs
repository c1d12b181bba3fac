//! Tests for grid-to-bitmap compositing.

use radar_common::{RgbaPixel, ScalarGrid};
use renderer::{colorize, composite, ColorRamp, ColorStop, Rgb8, OVERLAY_ALPHA};
use test_utils::{create_grid_with_nans, create_reflectivity_grid};

#[test]
fn test_dimensions_preserved() {
    let ramp = ColorRamp::reflectivity();
    for (w, h) in [(1, 1), (3, 7), (200, 150)] {
        let grid = ScalarGrid::new(w, h, create_reflectivity_grid(w as usize, h as usize)).unwrap();
        let bitmap = composite(&grid, &ramp);
        assert_eq!(bitmap.width(), w);
        assert_eq!(bitmap.height(), h);
        assert_eq!(bitmap.pixels().len(), (w * h) as usize);
    }
}

#[test]
fn test_pointwise_equal_to_colorize() {
    // Large enough to take the parallel path
    let (w, h) = (300u32, 200u32);
    let grid = ScalarGrid::new(w, h, create_reflectivity_grid(w as usize, h as usize)).unwrap();
    let ramp = ColorRamp::reflectivity();

    let bitmap = composite(&grid, &ramp);
    for (pixel, &value) in bitmap.pixels().iter().zip(grid.samples()) {
        assert_eq!(*pixel, colorize(value, &ramp));
    }
}

#[test]
fn test_two_by_two_scenario() {
    let grid = ScalarGrid::new(2, 2, vec![10.0, f64::NAN, 60.0, 80.0]).unwrap();
    let ramp = ColorRamp::reflectivity();
    let bitmap = composite(&grid, &ramp);

    let last = ramp.stops()[ramp.len() - 1].color;
    assert_eq!(bitmap.get(0, 0), Some(colorize(10.0, &ramp)));
    assert_eq!(bitmap.get(1, 0), Some(RgbaPixel::TRANSPARENT));
    assert_eq!(bitmap.get(0, 1), Some(colorize(60.0, &ramp)));
    assert_eq!(
        bitmap.get(1, 1),
        Some(RgbaPixel::new(last.r, last.g, last.b, OVERLAY_ALPHA))
    );
}

#[test]
fn test_no_data_is_transparent() {
    let samples = create_grid_with_nans(4, 4, &[(0, 0), (3, 3)]);
    let grid = ScalarGrid::new(4, 4, samples).unwrap();
    let ramp = ColorRamp::new(vec![ColorStop::new(1.0, Rgb8::new(1, 2, 3))]).unwrap();

    let bitmap = composite(&grid, &ramp);
    assert_eq!(bitmap.opaque_count(), 14);
    assert!(bitmap.get(0, 0).unwrap().is_transparent());
    assert!(bitmap.get(3, 3).unwrap().is_transparent());
}
