//! Raw payloads as retrieved from a source.

use bytes::Bytes;

/// Bytes fetched from the source, plus whether the source flagged them as gzip.
#[derive(Debug, Clone)]
pub struct CompressedPayload {
    pub data: Bytes,
    pub gzip: bool,
}

impl CompressedPayload {
    pub fn new(data: impl Into<Bytes>, gzip: bool) -> Self {
        Self {
            data: data.into(),
            gzip,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
