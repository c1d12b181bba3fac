//! Strip assembly and sample conversion for band 0.

use std::io::Read;

use flate2::read::ZlibDecoder;
use tracing::debug;

use crate::error::{DecodeError, DecodeResult};
use crate::ifd::{Compression, PlanarConfig, RasterLayout, SampleType};
use crate::reader::{ByteOrder, ByteReader};

/// Upper bound on width * height, guards allocation on hostile headers.
pub const MAX_SAMPLES: u64 = 64 * 1024 * 1024;

/// Upper bound on the bytes of the strips carrying band 0.
pub const MAX_BAND_BYTES: u64 = 1024 * 1024 * 1024;

/// Collect band 0 as row-major f64 samples, no-data mapped to NaN.
pub fn read_band0(reader: &ByteReader<'_>, layout: &RasterLayout) -> DecodeResult<Vec<f64>> {
    let pixel_count = layout.width as u64 * layout.height as u64;
    if pixel_count > MAX_SAMPLES {
        return Err(DecodeError::Malformed(format!(
            "{}x{} raster exceeds the {} sample limit",
            layout.width, layout.height, MAX_SAMPLES
        )));
    }

    let strips = layout.strips_per_band();
    if layout.strip_offsets.len() < strips {
        return Err(DecodeError::Malformed(format!(
            "{} strips needed for {} rows, {} present",
            strips,
            layout.height,
            layout.strip_offsets.len()
        )));
    }

    let row_bytes = layout.row_bytes();
    let band_bytes = row_bytes
        .checked_mul(layout.height as u64)
        .filter(|bytes| *bytes <= MAX_BAND_BYTES)
        .ok_or_else(|| {
            DecodeError::Malformed(format!(
                "{}x{} raster with {} samples per pixel exceeds the {} byte limit",
                layout.width, layout.height, layout.samples_per_pixel, MAX_BAND_BYTES
            ))
        })?;

    // Uncompressed data must be fully present; catch short buffers before allocating.
    let mut raw = match layout.compression {
        Compression::None => {
            let declared = layout.strip_byte_counts[..strips]
                .iter()
                .fold(0u64, |sum, count| sum.saturating_add(*count));
            if declared < band_bytes {
                return Err(DecodeError::Truncated {
                    needed: band_bytes,
                    available: declared,
                });
            }
            if band_bytes > reader.len() as u64 {
                return Err(DecodeError::Truncated {
                    needed: band_bytes,
                    available: reader.len() as u64,
                });
            }
            Vec::with_capacity(band_bytes as usize)
        }
        // Inflated size is only known once the strips are read
        Compression::Deflate => Vec::new(),
    };

    // Planar layouts store band 0 in the first `strips` strips.
    for strip in 0..strips {
        let rows_in_strip = (layout.height - strip as u32 * layout.rows_per_strip)
            .min(layout.rows_per_strip) as u64;
        let expected = rows_in_strip * row_bytes;

        let offset = layout.strip_offsets[strip];
        let count = layout.strip_byte_counts[strip];
        let stored = reader.slice(offset, count)?;

        match layout.compression {
            Compression::None => {
                let bytes = stored.get(..expected as usize).ok_or(DecodeError::Truncated {
                    needed: offset + expected,
                    available: offset + count,
                })?;
                raw.extend_from_slice(bytes);
            }
            Compression::Deflate => inflate_strip(stored, expected, &mut raw)?,
        }
    }

    debug!(
        strips = strips,
        bytes = raw.len(),
        compression = ?layout.compression,
        "Assembled band 0"
    );

    let stride = match layout.planar {
        PlanarConfig::Chunky => layout.samples_per_pixel as usize,
        PlanarConfig::Planar => 1,
    };

    Ok(convert(&raw, layout.sample_type, reader.order(), stride, layout.nodata))
}

fn inflate_strip(stored: &[u8], expected: u64, out: &mut Vec<u8>) -> DecodeResult<()> {
    let start = out.len();
    // Read one byte past the expected size so an oversized strip is noticed.
    let mut decoder = ZlibDecoder::new(stored).take(expected + 1);
    decoder
        .read_to_end(out)
        .map_err(|e| DecodeError::Malformed(format!("deflate strip: {}", e)))?;

    let produced = (out.len() - start) as u64;
    if produced < expected {
        return Err(DecodeError::Truncated {
            needed: expected,
            available: produced,
        });
    }
    out.truncate(start + expected as usize);
    Ok(())
}

/// Decode every `stride`-th sample starting at 0.
fn convert(
    raw: &[u8],
    sample_type: SampleType,
    order: ByteOrder,
    stride: usize,
    nodata: Option<f64>,
) -> Vec<f64> {
    let size = sample_type.bytes() as usize;
    let mask = |v: f64| match nodata {
        Some(sentinel) if v == sentinel => f64::NAN,
        _ => v,
    };

    raw.chunks_exact(size)
        .step_by(stride)
        .map(|c| {
            let value = match sample_type {
                SampleType::U8 => c[0] as f64,
                SampleType::I8 => c[0] as i8 as f64,
                SampleType::U16 => {
                    let b = [c[0], c[1]];
                    (match order {
                        ByteOrder::Little => u16::from_le_bytes(b),
                        ByteOrder::Big => u16::from_be_bytes(b),
                    }) as f64
                }
                SampleType::I16 => {
                    let b = [c[0], c[1]];
                    (match order {
                        ByteOrder::Little => i16::from_le_bytes(b),
                        ByteOrder::Big => i16::from_be_bytes(b),
                    }) as f64
                }
                SampleType::F32 => {
                    let b = [c[0], c[1], c[2], c[3]];
                    (match order {
                        ByteOrder::Little => f32::from_le_bytes(b),
                        ByteOrder::Big => f32::from_be_bytes(b),
                    }) as f64
                }
            };
            mask(value)
        })
        .collect()
}
