//! TIFF header and image file directory (IFD) parsing.
//!
//! Only the first IFD is read. Each 12-byte entry holds a tag, a field type,
//! a value count, and either the value itself (when it fits in 4 bytes) or
//! an offset to it.

use tracing::debug;

use crate::error::{DecodeError, DecodeResult};
use crate::reader::{ByteOrder, ByteReader};

// Baseline tags
pub const TAG_IMAGE_WIDTH: u16 = 256;
pub const TAG_IMAGE_LENGTH: u16 = 257;
pub const TAG_BITS_PER_SAMPLE: u16 = 258;
pub const TAG_COMPRESSION: u16 = 259;
pub const TAG_STRIP_OFFSETS: u16 = 273;
pub const TAG_SAMPLES_PER_PIXEL: u16 = 277;
pub const TAG_ROWS_PER_STRIP: u16 = 278;
pub const TAG_STRIP_BYTE_COUNTS: u16 = 279;
pub const TAG_PLANAR_CONFIGURATION: u16 = 284;
pub const TAG_PREDICTOR: u16 = 317;
pub const TAG_TILE_WIDTH: u16 = 322;
pub const TAG_SAMPLE_FORMAT: u16 = 339;
/// GDAL private tag carrying the no-data value as ASCII.
pub const TAG_GDAL_NODATA: u16 = 42113;

// Field types
const TYPE_BYTE: u16 = 1;
const TYPE_ASCII: u16 = 2;
const TYPE_SHORT: u16 = 3;
const TYPE_LONG: u16 = 4;
const TYPE_UNDEFINED: u16 = 7;

const ENTRY_SIZE: u64 = 12;

/// Parse the 8-byte header, returning the byte order and first IFD offset.
pub fn parse_header(data: &[u8]) -> DecodeResult<(ByteOrder, u32)> {
    if data.len() < 4 {
        return Err(DecodeError::UnsupportedFormat(format!(
            "{} bytes is too short for a raster header",
            data.len()
        )));
    }

    let order = match &data[0..2] {
        b"II" => ByteOrder::Little,
        b"MM" => ByteOrder::Big,
        _ => {
            return Err(DecodeError::UnsupportedFormat(format!(
                "unrecognized signature ({})",
                crate::Container::detect(data)
            )))
        }
    };

    let reader = ByteReader::new(data, order);
    match reader.u16_at(2)? {
        42 => {}
        43 => {
            return Err(DecodeError::UnsupportedFormat(
                "BigTIFF is not supported".to_string(),
            ))
        }
        magic => {
            return Err(DecodeError::UnsupportedFormat(format!(
                "bad TIFF magic number {}",
                magic
            )))
        }
    }

    let ifd_offset = reader.u32_at(4)?;
    Ok((order, ifd_offset))
}

/// A raw directory entry.
#[derive(Debug, Clone, Copy)]
pub struct IfdEntry {
    pub tag: u16,
    pub field_type: u16,
    pub count: u32,
    /// Position of the 4-byte value/offset field within the buffer.
    value_pos: u64,
}

impl IfdEntry {
    fn type_size(&self) -> Option<u64> {
        match self.field_type {
            TYPE_BYTE | TYPE_ASCII | TYPE_UNDEFINED => Some(1),
            TYPE_SHORT => Some(2),
            TYPE_LONG => Some(4),
            _ => None,
        }
    }

    /// Where the value bytes live: inline when they fit in 4 bytes.
    fn data_offset(&self, reader: &ByteReader<'_>) -> DecodeResult<(u64, u64)> {
        let size = self.type_size().ok_or_else(|| {
            DecodeError::Malformed(format!(
                "tag {} has unexpected field type {}",
                self.tag, self.field_type
            ))
        })?;
        let total = size * self.count as u64;
        if total <= 4 {
            Ok((self.value_pos, total))
        } else {
            Ok((reader.u32_at(self.value_pos)? as u64, total))
        }
    }

    /// Read an integer-valued entry (BYTE, SHORT or LONG).
    pub fn integers(&self, reader: &ByteReader<'_>) -> DecodeResult<Vec<u64>> {
        let (offset, total) = self.data_offset(reader)?;
        let bytes = reader.slice(offset, total)?;

        let values = match self.field_type {
            TYPE_BYTE | TYPE_UNDEFINED => bytes.iter().map(|&b| b as u64).collect(),
            TYPE_SHORT => bytes
                .chunks_exact(2)
                .map(|c| reader.decode_u16([c[0], c[1]]) as u64)
                .collect(),
            TYPE_LONG => bytes
                .chunks_exact(4)
                .map(|c| reader.decode_u32([c[0], c[1], c[2], c[3]]) as u64)
                .collect(),
            other => {
                return Err(DecodeError::Malformed(format!(
                    "tag {} is not an integer field (type {})",
                    self.tag, other
                )))
            }
        };
        Ok(values)
    }

    /// Read an ASCII entry, trimming the NUL terminator.
    pub fn ascii(&self, reader: &ByteReader<'_>) -> DecodeResult<String> {
        let (offset, total) = self.data_offset(reader)?;
        let bytes = reader.slice(offset, total)?;
        Ok(String::from_utf8_lossy(bytes)
            .trim_end_matches('\0')
            .trim()
            .to_string())
    }
}

/// Read every entry of the IFD at `offset`.
pub fn read_ifd(reader: &ByteReader<'_>, offset: u32) -> DecodeResult<Vec<IfdEntry>> {
    let offset = offset as u64;
    let count = reader.u16_at(offset)? as u64;
    if count == 0 {
        return Err(DecodeError::Malformed("empty image file directory".to_string()));
    }

    // Make sure the whole directory is present before walking it
    reader.slice(offset + 2, count * ENTRY_SIZE)?;

    let mut entries = Vec::with_capacity(count as usize);
    for i in 0..count {
        let pos = offset + 2 + i * ENTRY_SIZE;
        entries.push(IfdEntry {
            tag: reader.u16_at(pos)?,
            field_type: reader.u16_at(pos + 2)?,
            count: reader.u32_at(pos + 4)?,
            value_pos: pos + 8,
        });
    }

    debug!(entries = entries.len(), "Read image file directory");
    Ok(entries)
}

/// Numeric interpretation of each sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    U8,
    I8,
    U16,
    I16,
    F32,
}

impl SampleType {
    fn from_tags(bits: u64, format: u64) -> DecodeResult<Self> {
        // SampleFormat: 1 = unsigned int, 2 = signed int, 3 = IEEE float
        match (format, bits) {
            (1, 8) => Ok(SampleType::U8),
            (2, 8) => Ok(SampleType::I8),
            (1, 16) => Ok(SampleType::U16),
            (2, 16) => Ok(SampleType::I16),
            (3, 32) => Ok(SampleType::F32),
            _ => Err(DecodeError::UnsupportedFormat(format!(
                "sample format {} with {} bits per sample",
                format, bits
            ))),
        }
    }

    pub fn bytes(&self) -> u64 {
        match self {
            SampleType::U8 | SampleType::I8 => 1,
            SampleType::U16 | SampleType::I16 => 2,
            SampleType::F32 => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Deflate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanarConfig {
    /// Samples of one pixel stored together (RGBRGB...)
    Chunky,
    /// Each band stored in its own set of strips
    Planar,
}

/// Everything needed to locate and interpret band 0.
#[derive(Debug, Clone)]
pub struct RasterLayout {
    pub width: u32,
    pub height: u32,
    pub sample_type: SampleType,
    pub samples_per_pixel: u16,
    pub planar: PlanarConfig,
    pub compression: Compression,
    pub rows_per_strip: u32,
    pub strip_offsets: Vec<u64>,
    pub strip_byte_counts: Vec<u64>,
    pub nodata: Option<f64>,
}

impl RasterLayout {
    /// Build the layout from a parsed directory.
    pub fn from_entries(reader: &ByteReader<'_>, entries: &[IfdEntry]) -> DecodeResult<Self> {
        let find = |tag: u16| entries.iter().find(|e| e.tag == tag);
        let required = |tag: u16, name: &str| -> DecodeResult<Vec<u64>> {
            let entry = find(tag)
                .ok_or_else(|| DecodeError::Malformed(format!("missing {} tag", name)))?;
            let values = entry.integers(reader)?;
            if values.is_empty() {
                return Err(DecodeError::Malformed(format!("empty {} tag", name)));
            }
            Ok(values)
        };
        let optional_first = |tag: u16, default: u64| -> DecodeResult<u64> {
            match find(tag) {
                Some(entry) => Ok(entry.integers(reader)?.first().copied().unwrap_or(default)),
                None => Ok(default),
            }
        };

        if find(TAG_TILE_WIDTH).is_some() {
            return Err(DecodeError::UnsupportedFormat(
                "tiled rasters are not supported".to_string(),
            ));
        }

        let width = required(TAG_IMAGE_WIDTH, "ImageWidth")?[0];
        let height = required(TAG_IMAGE_LENGTH, "ImageLength")?[0];
        if width == 0 || height == 0 {
            return Err(DecodeError::Malformed(format!(
                "zero raster dimensions {}x{}",
                width, height
            )));
        }
        let width = u32::try_from(width)
            .map_err(|_| DecodeError::Malformed(format!("width {} out of range", width)))?;
        let height = u32::try_from(height)
            .map_err(|_| DecodeError::Malformed(format!("height {} out of range", height)))?;

        let samples_per_pixel = optional_first(TAG_SAMPLES_PER_PIXEL, 1)?;
        if samples_per_pixel == 0 || samples_per_pixel > u16::MAX as u64 {
            return Err(DecodeError::Malformed(format!(
                "invalid SamplesPerPixel {}",
                samples_per_pixel
            )));
        }

        // BitsPerSample has one value per band; band 0 decides the type.
        let bits = optional_first(TAG_BITS_PER_SAMPLE, 1)?;
        let format = optional_first(TAG_SAMPLE_FORMAT, 1)?;
        let sample_type = SampleType::from_tags(bits, format)?;

        let compression = match optional_first(TAG_COMPRESSION, 1)? {
            1 => Compression::None,
            8 | 32946 => Compression::Deflate,
            other => {
                return Err(DecodeError::UnsupportedFormat(format!(
                    "compression scheme {}",
                    other
                )))
            }
        };

        let predictor = optional_first(TAG_PREDICTOR, 1)?;
        if predictor != 1 {
            return Err(DecodeError::UnsupportedFormat(format!(
                "predictor {}",
                predictor
            )));
        }

        let planar = match optional_first(TAG_PLANAR_CONFIGURATION, 1)? {
            1 => PlanarConfig::Chunky,
            2 => PlanarConfig::Planar,
            other => {
                return Err(DecodeError::Malformed(format!(
                    "invalid PlanarConfiguration {}",
                    other
                )))
            }
        };

        let rows_per_strip = optional_first(TAG_ROWS_PER_STRIP, height as u64)?
            .clamp(1, height as u64) as u32;

        let strip_offsets = required(TAG_STRIP_OFFSETS, "StripOffsets")?;
        let strip_byte_counts = required(TAG_STRIP_BYTE_COUNTS, "StripByteCounts")?;
        if strip_offsets.len() != strip_byte_counts.len() {
            return Err(DecodeError::Malformed(format!(
                "{} strip offsets but {} strip byte counts",
                strip_offsets.len(),
                strip_byte_counts.len()
            )));
        }

        let nodata = match find(TAG_GDAL_NODATA) {
            Some(entry) => parse_nodata(&entry.ascii(reader)?),
            None => None,
        };

        Ok(Self {
            width,
            height,
            sample_type,
            samples_per_pixel: samples_per_pixel as u16,
            planar,
            compression,
            rows_per_strip,
            strip_offsets,
            strip_byte_counts,
            nodata,
        })
    }

    /// Number of strips covering one band top to bottom.
    pub fn strips_per_band(&self) -> usize {
        self.height.div_ceil(self.rows_per_strip) as usize
    }

    /// Bytes in one full row of the strips that carry band 0.
    pub fn row_bytes(&self) -> u64 {
        let samples_in_row = match self.planar {
            PlanarConfig::Chunky => self.width as u64 * self.samples_per_pixel as u64,
            PlanarConfig::Planar => self.width as u64,
        };
        samples_in_row * self.sample_type.bytes()
    }
}

/// GDAL writes no-data as text, e.g. "-999", "nan" or "-3.4028235e+38".
fn parse_nodata(text: &str) -> Option<f64> {
    let value: f64 = text.parse().ok()?;
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_little_endian() {
        let data = [b'I', b'I', 42, 0, 8, 0, 0, 0];
        let (order, offset) = parse_header(&data).unwrap();
        assert_eq!(order, ByteOrder::Little);
        assert_eq!(offset, 8);
    }

    #[test]
    fn test_parse_header_big_endian() {
        let data = [b'M', b'M', 0, 42, 0, 0, 0, 16];
        let (order, offset) = parse_header(&data).unwrap();
        assert_eq!(order, ByteOrder::Big);
        assert_eq!(offset, 16);
    }

    #[test]
    fn test_bigtiff_rejected() {
        let data = [b'I', b'I', 43, 0, 8, 0, 0, 0];
        assert!(matches!(
            parse_header(&data),
            Err(DecodeError::UnsupportedFormat(msg)) if msg.contains("BigTIFF")
        ));
    }

    #[test]
    fn test_grib_signature_rejected() {
        let data = b"GRIB\0\0\0\x02";
        assert!(matches!(
            parse_header(data),
            Err(DecodeError::UnsupportedFormat(msg)) if msg.contains("GRIB2")
        ));
    }

    #[test]
    fn test_parse_nodata() {
        assert_eq!(parse_nodata("-999"), Some(-999.0));
        assert_eq!(parse_nodata("nan"), None);
        assert_eq!(parse_nodata("garbage"), None);
    }

    #[test]
    fn test_sample_type_from_tags() {
        assert_eq!(SampleType::from_tags(8, 1).unwrap(), SampleType::U8);
        assert_eq!(SampleType::from_tags(16, 2).unwrap(), SampleType::I16);
        assert_eq!(SampleType::from_tags(32, 3).unwrap(), SampleType::F32);
        assert!(SampleType::from_tags(64, 3).is_err());
    }
}
