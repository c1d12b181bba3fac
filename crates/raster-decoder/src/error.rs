//! Error types for raster decoding.

use thiserror::Error;

/// Result type for decoder operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Reasons a decompressed buffer could not be turned into a scalar grid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// Header signature not recognized, or a recognized container using a
    /// feature this decoder does not read (BigTIFF, tiling, exotic sample types).
    #[error("Unsupported raster format: {0}")]
    UnsupportedFormat(String),

    /// Declared structure points past the end of the buffer.
    #[error("Raster truncated: needed {needed} bytes, {available} available")]
    Truncated { needed: u64, available: u64 },

    /// Container recognized but internally inconsistent.
    #[error("Malformed raster: {0}")]
    Malformed(String),
}

/// Gzip stream could not be inflated.
#[derive(Error, Debug)]
#[error("Decompression failed: {0}")]
pub struct DecompressionError(#[from] pub std::io::Error);
