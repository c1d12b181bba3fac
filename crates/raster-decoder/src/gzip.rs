//! Gzip envelope handling.

use std::io::{self, Read};

use bytes::Bytes;
use flate2::read::GzDecoder;

use crate::error::DecompressionError;

/// Largest inflated payload accepted by [`decompress_gzip`].
pub const MAX_INFLATED_BYTES: u64 = 1024 * 1024 * 1024;

/// Inflate a gzip stream into memory.
pub fn decompress_gzip(data: &[u8]) -> Result<Bytes, DecompressionError> {
    decompress_gzip_limited(data, MAX_INFLATED_BYTES)
}

/// Inflate a gzip stream, failing once the output passes `limit` bytes.
pub fn decompress_gzip_limited(data: &[u8], limit: u64) -> Result<Bytes, DecompressionError> {
    let mut decoder = GzDecoder::new(data).take(limit.saturating_add(1));
    let mut decompressed = Vec::new();
    decoder.read_to_end(&mut decompressed)?;
    if decompressed.len() as u64 > limit {
        return Err(DecompressionError(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("inflated payload exceeds {} bytes", limit),
        )));
    }
    Ok(Bytes::from(decompressed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn test_decompress_gzip_valid() {
        let original = b"radar payload";
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(original).unwrap();
        let compressed = encoder.finish().unwrap();

        let result = decompress_gzip(&compressed).unwrap();
        assert_eq!(result.as_ref(), original);
    }

    #[test]
    fn test_decompress_gzip_invalid() {
        let result = decompress_gzip(b"not gzip data");
        assert!(result.is_err());
    }

    #[test]
    fn test_decompress_gzip_truncated() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&[7u8; 4096]).unwrap();
        let compressed = encoder.finish().unwrap();

        let result = decompress_gzip(&compressed[..compressed.len() / 2]);
        assert!(result.is_err());
    }

    #[test]
    fn test_decompress_gzip_over_limit() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&[0u8; 64 * 1024]).unwrap();
        let compressed = encoder.finish().unwrap();

        let err = decompress_gzip_limited(&compressed, 1024).unwrap_err();
        assert_eq!(err.0.kind(), std::io::ErrorKind::InvalidData);

        let exact = decompress_gzip_limited(&compressed, 64 * 1024).unwrap();
        assert_eq!(exact.len(), 64 * 1024);
    }
}
