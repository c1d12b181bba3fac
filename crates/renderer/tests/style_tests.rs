//! Tests for JSON style loading.

use renderer::style::{StyleConfig, StyleError};
use renderer::{ColorRamp, RampError, Rgb8};
use test_utils::SIMPLE_STYLE_JSON;

#[test]
fn test_parse_simple_style() {
    let config = StyleConfig::from_json(SIMPLE_STYLE_JSON).unwrap();
    let ramp = config.ramp("simple").unwrap();

    assert_eq!(ramp.len(), 3);
    assert_eq!(ramp.stops()[0].color, Rgb8::new(0, 0, 255));
    assert_eq!(ramp.stops()[2].threshold, 50.0);
}

#[test]
fn test_unknown_style() {
    let config = StyleConfig::from_json(SIMPLE_STYLE_JSON).unwrap();
    assert!(matches!(config.ramp("missing"), Err(StyleError::UnknownStyle(name)) if name == "missing"));
}

#[test]
fn test_bad_color_rejected() {
    let json = r##"{
        "version": "1.0",
        "styles": {
            "bad": { "name": "Bad", "stops": [{ "value": 1, "color": "blue" }] }
        }
    }"##;
    let config = StyleConfig::from_json(json).unwrap();

    match config.ramp("bad") {
        Err(StyleError::Ramp { style, source }) => {
            assert_eq!(style, "bad");
            assert!(matches!(source, RampError::InvalidColor { index: 0, .. }));
        }
        other => panic!("expected ramp error, got {:?}", other),
    }
}

#[test]
fn test_unsorted_stops_rejected() {
    let json = r##"{
        "version": "1.0",
        "styles": {
            "unsorted": {
                "name": "Unsorted",
                "stops": [
                    { "value": 30, "color": "#000000" },
                    { "value": 10, "color": "#ffffff" }
                ]
            }
        }
    }"##;
    let config = StyleConfig::from_json(json).unwrap();
    assert!(matches!(config.ramp("unsorted"), Err(StyleError::Ramp { .. })));
}

#[test]
fn test_invalid_json() {
    assert!(matches!(StyleConfig::from_json("{"), Err(StyleError::Json(_))));
}

#[test]
fn test_shipped_reflectivity_style_matches_builtin() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/styles/reflectivity.json");
    let config = StyleConfig::from_file(path).unwrap();

    assert_eq!(config.ramp("reflectivity").unwrap(), ColorRamp::reflectivity());
}
