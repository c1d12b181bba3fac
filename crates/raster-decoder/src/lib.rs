//! Raster decoding for radar payloads.
//!
//! Turns a decompressed baseline TIFF (the GeoTIFF subset published for
//! composite reflectivity products) into a [`ScalarGrid`] holding band 0.
//!
//! Supported:
//! - Little- and big-endian classic TIFF
//! - Strip layout, uncompressed or deflate
//! - u8, i8, u16, i16 and f32 samples
//! - Chunky or planar multi-band images (band 0 is selected)
//! - GDAL no-data tag, mapped to NaN
//!
//! Anything else (GRIB2, BigTIFF, tiled rasters, predictors) is reported as
//! [`DecodeError::UnsupportedFormat`] so callers can fall back.

pub mod error;
pub mod gzip;
pub mod ifd;
pub mod reader;
pub mod samples;

use std::fmt;

use radar_common::ScalarGrid;
use tracing::debug;

pub use error::{DecodeError, DecodeResult, DecompressionError};
pub use gzip::{decompress_gzip, decompress_gzip_limited};
pub use ifd::{Compression, PlanarConfig, RasterLayout, SampleType};
pub use reader::ByteOrder;

use reader::ByteReader;

/// Container kind guessed from the leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Tiff,
    BigTiff,
    Grib,
    Png,
    Gzip,
    Unknown,
}

impl Container {
    pub fn detect(data: &[u8]) -> Self {
        match data {
            [b'I', b'I', 42, 0, ..] | [b'M', b'M', 0, 42, ..] => Container::Tiff,
            [b'I', b'I', 43, 0, ..] | [b'M', b'M', 0, 43, ..] => Container::BigTiff,
            [b'G', b'R', b'I', b'B', ..] => Container::Grib,
            [0x89, b'P', b'N', b'G', ..] => Container::Png,
            [0x1f, 0x8b, ..] => Container::Gzip,
            _ => Container::Unknown,
        }
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Container::Tiff => "TIFF",
            Container::BigTiff => "BigTIFF",
            Container::Grib => "GRIB2",
            Container::Png => "PNG",
            Container::Gzip => "gzip (still compressed)",
            Container::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Decode the first band of a TIFF raster.
pub fn decode(data: &[u8]) -> DecodeResult<ScalarGrid> {
    let (order, ifd_offset) = ifd::parse_header(data)?;
    let reader = ByteReader::new(data, order);

    let entries = ifd::read_ifd(&reader, ifd_offset)?;
    let layout = RasterLayout::from_entries(&reader, &entries)?;

    debug!(
        width = layout.width,
        height = layout.height,
        sample_type = ?layout.sample_type,
        bands = layout.samples_per_pixel,
        nodata = ?layout.nodata,
        "Parsed raster layout"
    );

    let samples = samples::read_band0(&reader, &layout)?;
    ScalarGrid::new(layout.width, layout.height, samples)
        .map_err(|e| DecodeError::Malformed(e.to_string()))
}
