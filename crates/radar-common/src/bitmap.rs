//! Packed RGBA bitmaps produced by compositing.

use bytemuck::{Pod, Zeroable};

use crate::grid::ScalarGrid;

/// A single RGBA pixel, 4 bytes in `(r, g, b, a)` order.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct RgbaPixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl RgbaPixel {
    /// Fully transparent black, used for no-data.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

/// An immutable RGBA image with the same row-major layout as the grid it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<RgbaPixel>,
}

impl Bitmap {
    /// Create a bitmap, checking `pixels.len() == width * height`.
    pub fn new(width: u32, height: u32, pixels: Vec<RgbaPixel>) -> Result<Self, BitmapError> {
        if width == 0 || height == 0 {
            return Err(BitmapError::EmptyDimensions { width, height });
        }

        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(BitmapError::PixelCountMismatch {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a bitmap from packed RGBA bytes (4 bytes per pixel).
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self, BitmapError> {
        if bytes.len() % 4 != 0 {
            return Err(BitmapError::RaggedBuffer(bytes.len()));
        }
        let pixels: &[RgbaPixel] = bytemuck::cast_slice(bytes);
        Self::new(width, height, pixels.to_vec())
    }

    /// A bitmap where every pixel is `pixel`.
    pub fn filled(width: u32, height: u32, pixel: RgbaPixel) -> Result<Self, BitmapError> {
        let count = width as usize * height as usize;
        Self::new(width, height, vec![pixel; count])
    }

    /// Build a bitmap shaped like `grid`, letting `fill` write every pixel.
    ///
    /// Infallible because a `ScalarGrid` already has valid dimensions.
    pub fn from_grid<F>(grid: &ScalarGrid, fill: F) -> Self
    where
        F: FnOnce(&[f64], &mut [RgbaPixel]),
    {
        let mut pixels = vec![RgbaPixel::TRANSPARENT; grid.len()];
        fill(grid.samples(), &mut pixels);
        Self {
            width: grid.width(),
            height: grid.height(),
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[RgbaPixel] {
        &self.pixels
    }

    /// Pixel at column `x`, row `y`.
    pub fn get(&self, x: u32, y: u32) -> Option<RgbaPixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// The pixel buffer viewed as packed RGBA bytes, ready for encoding.
    pub fn as_rgba_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Number of pixels with non-zero alpha.
    pub fn opaque_count(&self) -> usize {
        self.pixels.iter().filter(|p| !p.is_transparent()).count()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BitmapError {
    #[error("Bitmap dimensions must be non-zero, got {width}x{height}")]
    EmptyDimensions { width: u32, height: u32 },

    #[error("Expected {expected} pixels, got {actual}")]
    PixelCountMismatch { expected: usize, actual: usize },

    #[error("RGBA buffer length {0} is not a multiple of 4")]
    RaggedBuffer(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_bytes_layout() {
        let bitmap = Bitmap::new(
            2,
            1,
            vec![RgbaPixel::new(1, 2, 3, 4), RgbaPixel::new(5, 6, 7, 8)],
        )
        .unwrap();
        assert_eq!(bitmap.as_rgba_bytes(), &[1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_from_rgba_bytes() {
        let bitmap = Bitmap::from_rgba_bytes(1, 2, &[9, 9, 9, 255, 0, 0, 0, 0]).unwrap();
        assert_eq!(bitmap.get(0, 0), Some(RgbaPixel::new(9, 9, 9, 255)));
        assert_eq!(bitmap.get(0, 1), Some(RgbaPixel::TRANSPARENT));
        assert_eq!(bitmap.opaque_count(), 1);

        assert!(matches!(
            Bitmap::from_rgba_bytes(1, 1, &[0, 0, 0]),
            Err(BitmapError::RaggedBuffer(3))
        ));
    }
}
