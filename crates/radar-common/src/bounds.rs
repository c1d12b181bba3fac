//! Geographic bounds for overlay placement.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A rectangular geographic extent in degrees.
///
/// Invariants: all edges finite, `south < north`, `west < east`.
/// Extents crossing the antimeridian are not representable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    south: f64,
    west: f64,
    north: f64,
    east: f64,
}

impl GeoBounds {
    /// Create validated bounds.
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Result<Self, BoundsError> {
        if ![south, west, north, east].iter().all(|v| v.is_finite()) {
            return Err(BoundsError::NonFinite);
        }
        if south >= north {
            return Err(BoundsError::InvertedLatitude { south, north });
        }
        if west >= east {
            return Err(BoundsError::InvertedLongitude { west, east });
        }

        Ok(Self {
            south,
            west,
            north,
            east,
        })
    }

    /// Build from the `[[south, west], [north, east]]` corner-pair form.
    pub fn from_corners(corners: [[f64; 2]; 2]) -> Result<Self, BoundsError> {
        let [[south, west], [north, east]] = corners;
        Self::new(south, west, north, east)
    }

    /// Parse "south,west,north,east".
    pub fn from_csv(s: &str) -> Result<Self, BoundsError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(BoundsError::InvalidFormat(s.to_string()));
        }

        let mut values = [0.0f64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| BoundsError::InvalidNumber(part.to_string()))?;
        }

        Self::new(values[0], values[1], values[2], values[3])
    }

    /// Alaska extent used by the MRMS Alaska products.
    pub fn alaska() -> Self {
        Self {
            south: 54.0,
            west: -180.0,
            north: 72.0,
            east: -130.0,
        }
    }

    /// Contiguous US extent.
    pub fn conus() -> Self {
        Self {
            south: 20.0,
            west: -130.0,
            north: 55.0,
            east: -60.0,
        }
    }

    pub fn south(&self) -> f64 {
        self.south
    }

    pub fn west(&self) -> f64 {
        self.west
    }

    pub fn north(&self) -> f64 {
        self.north
    }

    pub fn east(&self) -> f64 {
        self.east
    }

    /// `[[south, west], [north, east]]`, the shape map clients expect.
    pub fn corners(&self) -> [[f64; 2]; 2] {
        [[self.south, self.west], [self.north, self.east]]
    }

    /// Check if a point is contained within these bounds.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.south && lat <= self.north && lon >= self.west && lon <= self.east
    }
}

impl Serialize for GeoBounds {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.corners().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GeoBounds {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let corners = <[[f64; 2]; 2]>::deserialize(deserializer)?;
        Self::from_corners(corners).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoundsError {
    #[error("Bounds must be finite")]
    NonFinite,

    #[error("South edge {south} must be below north edge {north}")]
    InvertedLatitude { south: f64, north: f64 },

    #[error("West edge {west} must be left of east edge {east}")]
    InvertedLongitude { west: f64, east: f64 },

    #[error("Invalid bounds format: {0}. Expected 'south,west,north,east'")]
    InvalidFormat(String),

    #[error("Invalid number in bounds: {0}")]
    InvalidNumber(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alaska_corners() {
        assert_eq!(
            GeoBounds::alaska().corners(),
            [[54.0, -180.0], [72.0, -130.0]]
        );
    }

    #[test]
    fn test_rejects_inverted() {
        assert!(matches!(
            GeoBounds::new(72.0, -180.0, 54.0, -130.0),
            Err(BoundsError::InvertedLatitude { .. })
        ));
        assert!(matches!(
            GeoBounds::new(54.0, -130.0, 72.0, -180.0),
            Err(BoundsError::InvertedLongitude { .. })
        ));
    }
}
