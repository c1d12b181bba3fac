//! Breakpoint color ramps for reflectivity values.
//!
//! A ramp is a list of `(threshold, color)` stops sorted by threshold. A value
//! takes the color of the first stop whose threshold is at or above it, so the
//! ramp behaves as a step function rather than a gradient.

use radar_common::RgbaPixel;
use thiserror::Error;

/// Alpha applied to every colored pixel, independent of the ramp.
pub const OVERLAY_ALPHA: u8 = 200;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (hash optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        hex_to_rgb(hex).map(|(r, g, b)| Self::new(r, g, b))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub threshold: f64,
    pub color: Rgb8,
}

impl ColorStop {
    pub const fn new(threshold: f64, color: Rgb8) -> Self {
        Self { threshold, color }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RampError {
    #[error("color ramp has no stops")]
    Empty,

    #[error("stop {index} threshold {threshold} is not a finite number")]
    NonFiniteThreshold { index: usize, threshold: f64 },

    #[error("stop {index} threshold {threshold} does not exceed previous threshold {previous}")]
    NotIncreasing {
        index: usize,
        previous: f64,
        threshold: f64,
    },

    #[error("stop {index} has invalid color '{color}'")]
    InvalidColor { index: usize, color: String },
}

/// dBZ thresholds and colors of the standard reflectivity scale.
const REFLECTIVITY_STOPS: [(f64, Rgb8); 11] = [
    (5.0, Rgb8::new(0x04, 0xE9, 0xE7)),
    (20.0, Rgb8::new(0x01, 0x9F, 0xF4)),
    (30.0, Rgb8::new(0x03, 0x00, 0xF4)),
    (40.0, Rgb8::new(0x02, 0xFD, 0x02)),
    (45.0, Rgb8::new(0x01, 0xC5, 0x01)),
    (50.0, Rgb8::new(0x00, 0x8E, 0x00)),
    (55.0, Rgb8::new(0xFD, 0xF8, 0x02)),
    (60.0, Rgb8::new(0xE5, 0xBC, 0x00)),
    (65.0, Rgb8::new(0xFD, 0x95, 0x00)),
    (70.0, Rgb8::new(0xFD, 0x00, 0x00)),
    (75.0, Rgb8::new(0x99, 0x00, 0x00)),
];

/// A validated, non-empty ramp with strictly increasing thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    stops: Vec<ColorStop>,
}

impl ColorRamp {
    pub fn new(stops: Vec<ColorStop>) -> Result<Self, RampError> {
        if stops.is_empty() {
            return Err(RampError::Empty);
        }

        for (index, stop) in stops.iter().enumerate() {
            if !stop.threshold.is_finite() {
                return Err(RampError::NonFiniteThreshold {
                    index,
                    threshold: stop.threshold,
                });
            }
            if index > 0 {
                let previous = stops[index - 1].threshold;
                if stop.threshold <= previous {
                    return Err(RampError::NotIncreasing {
                        index,
                        previous,
                        threshold: stop.threshold,
                    });
                }
            }
        }

        Ok(Self { stops })
    }

    /// The standard 11-stop reflectivity scale (5 to 75 dBZ).
    pub fn reflectivity() -> Self {
        Self {
            stops: REFLECTIVITY_STOPS
                .iter()
                .map(|&(threshold, color)| ColorStop::new(threshold, color))
                .collect(),
        }
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Map one sample to a pixel. See [`colorize`].
    #[inline]
    pub fn colorize(&self, value: f64) -> RgbaPixel {
        if !value.is_finite() || value < 0.0 {
            return RgbaPixel::TRANSPARENT;
        }

        // Stops are sorted, so the first stop at or above `value` is where
        // the "below" prefix ends.
        let index = self.stops.partition_point(|s| s.threshold < value);
        let stop = self
            .stops
            .get(index)
            .unwrap_or(&self.stops[self.stops.len() - 1]);

        RgbaPixel::new(stop.color.r, stop.color.g, stop.color.b, OVERLAY_ALPHA)
    }
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self::reflectivity()
    }
}

/// Map a reflectivity value to an overlay pixel.
///
/// - NaN, infinite or negative values are fully transparent.
/// - Otherwise the first stop with `threshold >= value` supplies the color;
///   values above the last threshold use the last stop.
/// - Alpha is always [`OVERLAY_ALPHA`].
pub fn colorize(value: f64, ramp: &ColorRamp) -> RgbaPixel {
    ramp.colorize(value)
}

/// Parse hex color string to RGB
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}
