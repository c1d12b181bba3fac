//! Bounds-checked, byte-order-aware reads over a borrowed buffer.

use crate::error::{DecodeError, DecodeResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

/// Every read checks the requested range against the buffer and reports
/// `Truncated` instead of panicking.
#[derive(Debug, Clone, Copy)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    order: ByteOrder,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8], order: ByteOrder) -> Self {
        Self { data, order }
    }

    pub fn order(&self) -> ByteOrder {
        self.order
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow `len` bytes starting at `offset`.
    pub fn slice(&self, offset: u64, len: u64) -> DecodeResult<&'a [u8]> {
        let end = offset.checked_add(len).ok_or(DecodeError::Truncated {
            needed: u64::MAX,
            available: self.data.len() as u64,
        })?;
        if end > self.data.len() as u64 {
            return Err(DecodeError::Truncated {
                needed: end,
                available: self.data.len() as u64,
            });
        }
        Ok(&self.data[offset as usize..end as usize])
    }

    fn array<const N: usize>(&self, offset: u64) -> DecodeResult<[u8; N]> {
        let bytes = self.slice(offset, N as u64)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub fn u16_at(&self, offset: u64) -> DecodeResult<u16> {
        Ok(self.decode_u16(self.array(offset)?))
    }

    pub fn u32_at(&self, offset: u64) -> DecodeResult<u32> {
        Ok(self.decode_u32(self.array(offset)?))
    }

    pub fn decode_u16(&self, bytes: [u8; 2]) -> u16 {
        match self.order {
            ByteOrder::Little => u16::from_le_bytes(bytes),
            ByteOrder::Big => u16::from_be_bytes(bytes),
        }
    }

    pub fn decode_u32(&self, bytes: [u8; 4]) -> u32 {
        match self.order {
            ByteOrder::Little => u32::from_le_bytes(bytes),
            ByteOrder::Big => u32::from_be_bytes(bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_order() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let le = ByteReader::new(&data, ByteOrder::Little);
        let be = ByteReader::new(&data, ByteOrder::Big);

        assert_eq!(le.u16_at(0).unwrap(), 0x0201);
        assert_eq!(be.u16_at(0).unwrap(), 0x0102);
        assert_eq!(le.u32_at(0).unwrap(), 0x04030201);
        assert_eq!(be.u32_at(0).unwrap(), 0x01020304);
    }

    #[test]
    fn test_out_of_range_is_truncated() {
        let data = [0u8; 4];
        let reader = ByteReader::new(&data, ByteOrder::Little);

        assert_eq!(
            reader.u32_at(2),
            Err(DecodeError::Truncated {
                needed: 6,
                available: 4
            })
        );
        assert!(reader.slice(u64::MAX, 2).is_err());
    }
}
