//! In-memory TIFF construction for decoder and pipeline tests.
//!
//! Produces small classic TIFF files with strips laid out after the header
//! and the IFD at the end. Band 0 carries the caller's samples; any extra
//! bands are filled with [`FILLER_VALUE`] so tests can tell them apart.

use std::io::Write;

use flate2::write::ZlibEncoder;

/// Value written to bands other than band 0.
pub const FILLER_VALUE: f64 = 99.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffSampleType {
    U8,
    I8,
    U16,
    I16,
    F32,
}

impl TiffSampleType {
    fn bits(&self) -> u16 {
        match self {
            TiffSampleType::U8 | TiffSampleType::I8 => 8,
            TiffSampleType::U16 | TiffSampleType::I16 => 16,
            TiffSampleType::F32 => 32,
        }
    }

    fn format(&self) -> u16 {
        match self {
            TiffSampleType::U8 | TiffSampleType::U16 => 1,
            TiffSampleType::I8 | TiffSampleType::I16 => 2,
            TiffSampleType::F32 => 3,
        }
    }

    fn encode(&self, value: f64, endian: Endian, out: &mut Vec<u8>) {
        macro_rules! put {
            ($v:expr) => {
                match endian {
                    Endian::Little => out.extend_from_slice(&$v.to_le_bytes()),
                    Endian::Big => out.extend_from_slice(&$v.to_be_bytes()),
                }
            };
        }
        match self {
            TiffSampleType::U8 => out.push(value as u8),
            TiffSampleType::I8 => out.push(value as i8 as u8),
            TiffSampleType::U16 => put!(value as u16),
            TiffSampleType::I16 => put!(value as i16),
            TiffSampleType::F32 => put!(value as f32),
        }
    }
}

const TYPE_ASCII: u16 = 2;
const TYPE_SHORT: u16 = 3;
const TYPE_LONG: u16 = 4;

struct Entry {
    tag: u16,
    field_type: u16,
    count: u32,
    payload: Vec<u8>,
}

/// Builder for a single-image TIFF.
///
/// # Example
///
/// ```
/// use test_utils::{TiffBuilder, TiffSampleType};
///
/// let bytes = TiffBuilder::new(2, 2, vec![10.0, 20.0, 30.0, 40.0])
///     .sample_type(TiffSampleType::F32)
///     .build();
/// assert_eq!(&bytes[..4], b"II*\0");
/// ```
#[derive(Debug, Clone)]
pub struct TiffBuilder {
    width: u32,
    height: u32,
    samples: Vec<f64>,
    sample_type: TiffSampleType,
    endian: Endian,
    bands: u16,
    planar: bool,
    deflate: bool,
    rows_per_strip: Option<u32>,
    nodata: Option<String>,
    extra_tags: Vec<(u16, u32)>,
}

impl TiffBuilder {
    pub fn new(width: u32, height: u32, samples: Vec<f64>) -> Self {
        assert_eq!(
            samples.len(),
            width as usize * height as usize,
            "sample count must match dimensions"
        );
        Self {
            width,
            height,
            samples,
            sample_type: TiffSampleType::F32,
            endian: Endian::Little,
            bands: 1,
            planar: false,
            deflate: false,
            rows_per_strip: None,
            nodata: None,
            extra_tags: Vec::new(),
        }
    }

    pub fn sample_type(mut self, sample_type: TiffSampleType) -> Self {
        self.sample_type = sample_type;
        self
    }

    pub fn big_endian(mut self) -> Self {
        self.endian = Endian::Big;
        self
    }

    pub fn bands(mut self, bands: u16) -> Self {
        self.bands = bands.max(1);
        self
    }

    /// Store each band in its own strips (PlanarConfiguration = 2).
    pub fn planar(mut self) -> Self {
        self.planar = true;
        self
    }

    /// Zlib-compress each strip (Compression = 8).
    pub fn deflate(mut self) -> Self {
        self.deflate = true;
        self
    }

    pub fn rows_per_strip(mut self, rows: u32) -> Self {
        self.rows_per_strip = Some(rows);
        self
    }

    /// Set the GDAL no-data tag text.
    pub fn nodata(mut self, text: &str) -> Self {
        self.nodata = Some(text.to_string());
        self
    }

    /// Add an arbitrary single-valued LONG tag.
    pub fn tag(mut self, tag: u16, value: u32) -> Self {
        self.extra_tags.push((tag, value));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let rows_per_strip = self
            .rows_per_strip
            .unwrap_or(self.height)
            .clamp(1, self.height.max(1));
        let width = self.width as usize;

        let band_value = |band: u16, index: usize| {
            if band == 0 {
                self.samples[index]
            } else {
                FILLER_VALUE
            }
        };

        let mut strips: Vec<Vec<u8>> = Vec::new();
        let row_starts: Vec<u32> = (0..self.height).step_by(rows_per_strip as usize).collect();
        if self.planar {
            for band in 0..self.bands {
                for &start in &row_starts {
                    let end = (start + rows_per_strip).min(self.height);
                    let mut strip = Vec::new();
                    for i in start as usize * width..end as usize * width {
                        self.sample_type.encode(band_value(band, i), self.endian, &mut strip);
                    }
                    strips.push(strip);
                }
            }
        } else {
            for &start in &row_starts {
                let end = (start + rows_per_strip).min(self.height);
                let mut strip = Vec::new();
                for i in start as usize * width..end as usize * width {
                    for band in 0..self.bands {
                        self.sample_type.encode(band_value(band, i), self.endian, &mut strip);
                    }
                }
                strips.push(strip);
            }
        }

        if self.deflate {
            strips = strips
                .into_iter()
                .map(|strip| {
                    let mut encoder = ZlibEncoder::new(Vec::new(), flate2::Compression::default());
                    encoder.write_all(&strip).expect("zlib write");
                    encoder.finish().expect("zlib finish")
                })
                .collect();
        }

        let mut out = match self.endian {
            Endian::Little => vec![b'I', b'I', 42, 0, 0, 0, 0, 0],
            Endian::Big => vec![b'M', b'M', 0, 42, 0, 0, 0, 0],
        };

        let mut offsets = Vec::with_capacity(strips.len());
        let mut counts = Vec::with_capacity(strips.len());
        for strip in &strips {
            offsets.push(out.len() as u32);
            counts.push(strip.len() as u32);
            out.extend_from_slice(strip);
        }
        if out.len() % 2 == 1 {
            out.push(0);
        }

        let ifd_offset = out.len() as u32;
        let header_offset = self.u32_bytes(ifd_offset);
        out[4..8].copy_from_slice(&header_offset);

        let shorts = |values: &[u16]| -> Vec<u8> {
            values.iter().flat_map(|v| self.u16_bytes(*v)).collect()
        };
        let longs = |values: &[u32]| -> Vec<u8> {
            values.iter().flat_map(|v| self.u32_bytes(*v)).collect()
        };
        let bands = self.bands as usize;

        let mut entries = vec![
            Entry { tag: 256, field_type: TYPE_LONG, count: 1, payload: longs(&[self.width]) },
            Entry { tag: 257, field_type: TYPE_LONG, count: 1, payload: longs(&[self.height]) },
            Entry {
                tag: 258,
                field_type: TYPE_SHORT,
                count: self.bands as u32,
                payload: shorts(&vec![self.sample_type.bits(); bands]),
            },
            Entry {
                tag: 259,
                field_type: TYPE_SHORT,
                count: 1,
                payload: shorts(&[if self.deflate { 8 } else { 1 }]),
            },
            Entry { tag: 262, field_type: TYPE_SHORT, count: 1, payload: shorts(&[1]) },
            Entry {
                tag: 273,
                field_type: TYPE_LONG,
                count: offsets.len() as u32,
                payload: longs(&offsets),
            },
            Entry { tag: 277, field_type: TYPE_SHORT, count: 1, payload: shorts(&[self.bands]) },
            Entry { tag: 278, field_type: TYPE_LONG, count: 1, payload: longs(&[rows_per_strip]) },
            Entry {
                tag: 279,
                field_type: TYPE_LONG,
                count: counts.len() as u32,
                payload: longs(&counts),
            },
            Entry {
                tag: 284,
                field_type: TYPE_SHORT,
                count: 1,
                payload: shorts(&[if self.planar { 2 } else { 1 }]),
            },
            Entry {
                tag: 339,
                field_type: TYPE_SHORT,
                count: self.bands as u32,
                payload: shorts(&vec![self.sample_type.format(); bands]),
            },
        ];

        if let Some(nodata) = &self.nodata {
            let mut text = nodata.clone().into_bytes();
            text.push(0);
            entries.push(Entry {
                tag: 42113,
                field_type: TYPE_ASCII,
                count: text.len() as u32,
                payload: text,
            });
        }
        for &(tag, value) in &self.extra_tags {
            entries.push(Entry { tag, field_type: TYPE_LONG, count: 1, payload: longs(&[value]) });
        }
        entries.sort_by_key(|e| e.tag);

        let ifd_size = 2 + 12 * entries.len() + 4;
        let overflow_start = ifd_offset as usize + ifd_size;
        let mut ifd = Vec::with_capacity(ifd_size);
        let mut overflow = Vec::new();

        ifd.extend_from_slice(&self.u16_bytes(entries.len() as u16));
        for entry in &entries {
            ifd.extend_from_slice(&self.u16_bytes(entry.tag));
            ifd.extend_from_slice(&self.u16_bytes(entry.field_type));
            ifd.extend_from_slice(&self.u32_bytes(entry.count));
            if entry.payload.len() <= 4 {
                let mut inline = entry.payload.clone();
                inline.resize(4, 0);
                ifd.extend_from_slice(&inline);
            } else {
                let at = (overflow_start + overflow.len()) as u32;
                ifd.extend_from_slice(&self.u32_bytes(at));
                overflow.extend_from_slice(&entry.payload);
                if overflow.len() % 2 == 1 {
                    overflow.push(0);
                }
            }
        }
        ifd.extend_from_slice(&[0, 0, 0, 0]);

        out.extend_from_slice(&ifd);
        out.extend_from_slice(&overflow);
        out
    }

    fn u16_bytes(&self, v: u16) -> [u8; 2] {
        match self.endian {
            Endian::Little => v.to_le_bytes(),
            Endian::Big => v.to_be_bytes(),
        }
    }

    fn u32_bytes(&self, v: u32) -> [u8; 4] {
        match self.endian {
            Endian::Little => v.to_le_bytes(),
            Endian::Big => v.to_be_bytes(),
        }
    }
}

/// Overwrite the inline value of `tag` in a little-endian TIFF built by
/// [`TiffBuilder`]. Returns false when the tag is absent.
///
/// Useful for producing files whose header disagrees with their data.
pub fn patch_tag(bytes: &mut [u8], tag: u16, value: u32) -> bool {
    assert_eq!(&bytes[..2], b"II", "patch_tag only handles little-endian files");
    let ifd = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;
    let count = u16::from_le_bytes([bytes[ifd], bytes[ifd + 1]]) as usize;

    for i in 0..count {
        let pos = ifd + 2 + i * 12;
        let entry_tag = u16::from_le_bytes([bytes[pos], bytes[pos + 1]]);
        if entry_tag != tag {
            continue;
        }
        let field_type = u16::from_le_bytes([bytes[pos + 2], bytes[pos + 3]]);
        let value_field = &mut bytes[pos + 8..pos + 12];
        if field_type == TYPE_SHORT {
            value_field[..2].copy_from_slice(&(value as u16).to_le_bytes());
        } else {
            value_field.copy_from_slice(&value.to_le_bytes());
        }
        return true;
    }
    false
}
