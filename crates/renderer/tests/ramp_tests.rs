//! Tests for breakpoint colorization and ramp validation.

use radar_common::RgbaPixel;
use renderer::{colorize, ColorRamp, ColorStop, RampError, Rgb8, OVERLAY_ALPHA};

const A: Rgb8 = Rgb8::new(10, 0, 0);
const B: Rgb8 = Rgb8::new(0, 20, 0);
const C: Rgb8 = Rgb8::new(0, 0, 30);

fn abc_ramp() -> ColorRamp {
    ColorRamp::new(vec![
        ColorStop::new(5.0, A),
        ColorStop::new(20.0, B),
        ColorStop::new(75.0, C),
    ])
    .unwrap()
}

fn pixel(color: Rgb8) -> RgbaPixel {
    RgbaPixel::new(color.r, color.g, color.b, OVERLAY_ALPHA)
}

// ============================================================================
// Colorize tests
// ============================================================================

#[test]
fn test_first_threshold_at_or_above() {
    let ramp = abc_ramp();
    assert_eq!(colorize(3.0, &ramp), pixel(A));
    assert_eq!(colorize(5.0, &ramp), pixel(A));
    assert_eq!(colorize(20.0, &ramp), pixel(B));
    assert_eq!(colorize(21.0, &ramp), pixel(C));
}

#[test]
fn test_above_last_threshold_uses_last_stop() {
    let ramp = abc_ramp();
    assert_eq!(colorize(100.0, &ramp), pixel(C));
    assert_eq!(colorize(f64::MAX, &ramp), pixel(C));
}

#[test]
fn test_zero_is_colored() {
    assert_eq!(colorize(0.0, &abc_ramp()), pixel(A));
}

#[test]
fn test_negative_and_non_finite_are_transparent() {
    let ramp = abc_ramp();
    for value in [-0.01, -30.0, f64::MIN, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        assert_eq!(colorize(value, &ramp), RgbaPixel::TRANSPARENT, "value {}", value);
    }
}

#[test]
fn test_every_output_is_a_stop_color() {
    let ramp = ColorRamp::reflectivity();
    let colors: Vec<RgbaPixel> = ramp.stops().iter().map(|s| pixel(s.color)).collect();

    let mut value = 0.0;
    while value < 90.0 {
        assert!(colors.contains(&colorize(value, &ramp)), "value {}", value);
        value += 0.25;
    }
}

#[test]
fn test_reflectivity_scale_colors() {
    let ramp = ColorRamp::reflectivity();
    assert_eq!(colorize(10.0, &ramp), RgbaPixel::new(0x01, 0x9F, 0xF4, 200));
    assert_eq!(colorize(60.0, &ramp), RgbaPixel::new(0xE5, 0xBC, 0x00, 200));
    assert_eq!(colorize(80.0, &ramp), RgbaPixel::new(0x99, 0x00, 0x00, 200));
}

// ============================================================================
// Validation tests
// ============================================================================

#[test]
fn test_empty_ramp_rejected() {
    assert_eq!(ColorRamp::new(vec![]), Err(RampError::Empty));
}

#[test]
fn test_non_increasing_rejected() {
    let result = ColorRamp::new(vec![ColorStop::new(20.0, A), ColorStop::new(20.0, B)]);
    assert!(matches!(result, Err(RampError::NotIncreasing { index: 1, .. })));

    let result = ColorRamp::new(vec![ColorStop::new(20.0, A), ColorStop::new(5.0, B)]);
    assert!(matches!(result, Err(RampError::NotIncreasing { index: 1, .. })));
}

#[test]
fn test_nan_threshold_rejected() {
    let result = ColorRamp::new(vec![ColorStop::new(f64::NAN, A)]);
    assert!(matches!(result, Err(RampError::NonFiniteThreshold { index: 0, .. })));
}
