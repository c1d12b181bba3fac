//! Tests for GeoBounds validation and serialization.

use radar_common::bounds::{BoundsError, GeoBounds};

// ============================================================================
// Constructor tests
// ============================================================================

#[test]
fn test_bounds_new() {
    let bounds = GeoBounds::new(54.0, -180.0, 72.0, -130.0).unwrap();
    assert_eq!(bounds.south(), 54.0);
    assert_eq!(bounds.west(), -180.0);
    assert_eq!(bounds.north(), 72.0);
    assert_eq!(bounds.east(), -130.0);
}

#[test]
fn test_bounds_rejects_degenerate() {
    assert!(GeoBounds::new(10.0, 0.0, 10.0, 5.0).is_err());
    assert!(GeoBounds::new(0.0, 5.0, 10.0, 5.0).is_err());
}

#[test]
fn test_bounds_rejects_nan() {
    assert_eq!(
        GeoBounds::new(f64::NAN, 0.0, 10.0, 5.0),
        Err(BoundsError::NonFinite)
    );
}

#[test]
fn test_contains() {
    let bounds = GeoBounds::alaska();
    assert!(bounds.contains(61.2, -149.9)); // Anchorage
    assert!(!bounds.contains(47.6, -122.3)); // Seattle
}

// ============================================================================
// from_csv tests
// ============================================================================

#[test]
fn test_from_csv() {
    let bounds = GeoBounds::from_csv("20, -130, 55, -60").unwrap();
    assert_eq!(bounds, GeoBounds::conus());
}

#[test]
fn test_from_csv_wrong_arity() {
    assert!(matches!(
        GeoBounds::from_csv("1,2,3"),
        Err(BoundsError::InvalidFormat(_))
    ));
}

#[test]
fn test_from_csv_bad_number() {
    assert!(matches!(
        GeoBounds::from_csv("1,2,north,4"),
        Err(BoundsError::InvalidNumber(n)) if n == "north"
    ));
}

// ============================================================================
// Serde tests
// ============================================================================

#[test]
fn test_serializes_as_corner_pairs() {
    let json = serde_json::to_string(&GeoBounds::alaska()).unwrap();
    assert_eq!(json, "[[54.0,-180.0],[72.0,-130.0]]");
}

#[test]
fn test_deserialize_validates() {
    let ok: GeoBounds = serde_json::from_str("[[20,-130],[55,-60]]").unwrap();
    assert_eq!(ok, GeoBounds::conus());

    let inverted: Result<GeoBounds, _> = serde_json::from_str("[[55,-130],[20,-60]]");
    assert!(inverted.is_err());
}
