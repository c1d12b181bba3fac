//! Common types shared across the radar overlay workspace.

pub mod bitmap;
pub mod bounds;
pub mod error;
pub mod grid;
pub mod overlay;
pub mod payload;

pub use bitmap::{Bitmap, BitmapError, RgbaPixel};
pub use bounds::{BoundsError, GeoBounds};
pub use error::{RadarError, RadarResult};
pub use grid::{GridError, ScalarGrid};
pub use overlay::OverlayState;
pub use payload::CompressedPayload;
