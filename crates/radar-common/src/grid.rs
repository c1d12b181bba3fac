//! Scalar grids decoded from raster payloads.

/// A rectangular, single-band grid of samples in row-major order.
///
/// Non-finite samples represent no-data.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarGrid {
    width: u32,
    height: u32,
    samples: Vec<f64>,
}

impl ScalarGrid {
    /// Create a grid, checking `samples.len() == width * height` and non-zero dimensions.
    pub fn new(width: u32, height: u32, samples: Vec<f64>) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyDimensions { width, height });
        }

        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(GridError::SampleCountMismatch {
                expected,
                actual: samples.len(),
            });
        }

        Ok(Self {
            width,
            height,
            samples,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Total number of grid points.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a constructed grid; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample at column `x`, row `y`.
    pub fn get(&self, x: u32, y: u32) -> Option<f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.samples
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Count of finite (valid) samples.
    pub fn valid_count(&self) -> usize {
        self.samples.iter().filter(|v| v.is_finite()).count()
    }

    /// Min and max over finite samples, `None` if every sample is no-data.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.samples
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("Grid dimensions must be non-zero, got {width}x{height}")]
    EmptyDimensions { width: u32, height: u32 },

    #[error("Expected {expected} samples, got {actual}")]
    SampleCountMismatch { expected: usize, actual: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_access() {
        let grid = ScalarGrid::new(3, 2, vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0]).unwrap();
        assert_eq!(grid.get(0, 0), Some(0.0));
        assert_eq!(grid.get(2, 0), Some(2.0));
        assert_eq!(grid.get(1, 1), Some(11.0));
        assert_eq!(grid.get(3, 0), None);
    }

    #[test]
    fn test_rejects_bad_shape() {
        assert!(matches!(
            ScalarGrid::new(0, 4, vec![]),
            Err(GridError::EmptyDimensions { .. })
        ));
        assert!(matches!(
            ScalarGrid::new(2, 2, vec![1.0; 3]),
            Err(GridError::SampleCountMismatch {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_value_range_skips_nodata() {
        let grid = ScalarGrid::new(2, 2, vec![f64::NAN, 5.0, -3.0, f64::INFINITY]).unwrap();
        assert_eq!(grid.value_range(), Some((-3.0, 5.0)));
        assert_eq!(grid.valid_count(), 2);

        let empty = ScalarGrid::new(1, 1, vec![f64::NAN]).unwrap();
        assert_eq!(empty.value_range(), None);
    }
}
