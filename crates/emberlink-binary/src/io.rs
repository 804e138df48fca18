//! Extension traits for reading and writing fixed-width binary fields on top
//! of the `bytes` crate's `Buf`/`BufMut`.
//!
//! Scoped to what a 24-byte big-endian segment header needs: single bytes,
//! 16/32-bit big- and little-endian integers, and raw byte slices. No
//! varints, no length-prefixed strings, no UUIDs — this wire format has none
//! of those.

use crate::error::{BinaryError, Result};
use bytes::{Buf, BufMut, Bytes};

macro_rules! check_remaining {
    ($buf:expr, $len:expr) => {
        let needed = $len;
        let remaining = $buf.remaining();
        if remaining < needed {
            return Err(BinaryError::UnexpectedEof { needed, remaining });
        }
    };
}

/// Extension trait for `bytes::Buf` providing bounds-checked reads.
pub trait BinaryReader: Buf {
    #[inline]
    fn read_u8(&mut self) -> Result<u8> {
        check_remaining!(self, 1);
        Ok(self.get_u8())
    }

    #[inline]
    fn read_u16_be(&mut self) -> Result<u16> {
        check_remaining!(self, 2);
        Ok(self.get_u16())
    }

    #[inline]
    fn read_u16_le(&mut self) -> Result<u16> {
        check_remaining!(self, 2);
        Ok(self.get_u16_le())
    }

    #[inline]
    fn read_u32_be(&mut self) -> Result<u32> {
        check_remaining!(self, 4);
        Ok(self.get_u32())
    }

    #[inline]
    fn read_u32_le(&mut self) -> Result<u32> {
        check_remaining!(self, 4);
        Ok(self.get_u32_le())
    }

    /// Reads `len` raw bytes, copying them into an owned `Bytes`.
    #[inline]
    fn read_bytes(&mut self, len: usize) -> Result<Bytes> {
        check_remaining!(self, len);
        Ok(self.copy_to_bytes(len))
    }
}

impl<T: Buf> BinaryReader for T {}

/// Extension trait for `bytes::BufMut` providing the write-side counterparts.
/// `BufMut` grows the buffer on demand, so these never fail.
pub trait BinaryWriter: BufMut {
    #[inline]
    fn write_u8(&mut self, value: u8) {
        self.put_u8(value);
    }

    #[inline]
    fn write_u16_be(&mut self, value: u16) {
        self.put_u16(value);
    }

    #[inline]
    fn write_u16_le(&mut self, value: u16) {
        self.put_u16_le(value);
    }

    #[inline]
    fn write_u32_be(&mut self, value: u32) {
        self.put_u32(value);
    }

    #[inline]
    fn write_u32_le(&mut self, value: u32) {
        self.put_u32_le(value);
    }

    #[inline]
    fn write_bytes(&mut self, bytes: &[u8]) {
        self.put_slice(bytes);
    }
}

impl<T: BufMut> BinaryWriter for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn test_u8() {
        let mut buf = BytesMut::new();
        buf.write_u8(0xAB);
        let mut frozen = buf.freeze();
        assert_eq!(frozen.read_u8().unwrap(), 0xAB);
    }

    #[test]
    fn test_endianness_u16() {
        let mut buf = BytesMut::new();
        buf.write_u16_be(0x1234);
        let mut frozen = buf.freeze();
        assert_eq!(frozen.as_ref(), &[0x12, 0x34]);
        assert_eq!(
            Bytes::copy_from_slice(&[0x12, 0x34]).read_u16_be().unwrap(),
            0x1234
        );
        let _ = frozen;
    }

    #[test]
    fn test_endianness_u32() {
        let mut buf = BytesMut::new();
        buf.write_u32_be(0xDEADBEEF);
        let mut frozen = buf.freeze();
        assert_eq!(frozen.read_u32_be().unwrap(), 0xDEADBEEF);
    }

    #[test]
    fn test_bytes_roundtrip() {
        let mut buf = BytesMut::new();
        buf.write_bytes(b"hello");
        let mut frozen = buf.freeze();
        assert_eq!(frozen.read_bytes(5).unwrap().as_ref(), b"hello");
    }

    #[test]
    fn test_unexpected_eof() {
        let mut frozen = Bytes::copy_from_slice(&[0x01]);
        assert!(matches!(
            frozen.read_u32_be(),
            Err(BinaryError::UnexpectedEof {
                needed: 4,
                remaining: 1
            })
        ));
    }
}
