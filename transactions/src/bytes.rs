//! Little-endian byte cursor used by the transaction and block codecs.

use crate::CodecError;

#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i64(&mut self, v: i64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append `bytes` and zero-fill up to `width`. Longer input is written as is.
    pub fn write_padded(&mut self, bytes: &[u8], width: usize) {
        self.buf.extend_from_slice(bytes);
        if bytes.len() < width {
            self.buf.resize(self.buf.len() + width - bytes.len(), 0);
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn has_remaining(&self) -> bool {
        self.pos < self.data.len()
    }

    fn ensure(&self, n: usize) -> Result<(), CodecError> {
        if self.remaining() < n {
            return Err(CodecError::MalformedTransactionBytes(format!(
                "wanted {n} bytes at offset {}, {} left",
                self.pos,
                self.remaining()
            )));
        }
        Ok(())
    }

    /// Byte at `offset` past the cursor, without advancing.
    pub fn peek(&self, offset: usize) -> Result<u8, CodecError> {
        self.ensure(offset + 1)?;
        Ok(self.data[self.pos + offset])
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        self.ensure(1)?;
        let v = self.data[self.pos];
        self.pos += 1;
        Ok(v)
    }

    pub fn read_u16(&mut self) -> Result<u16, CodecError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, CodecError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        self.ensure(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_rest(&mut self) -> &'a [u8] {
        let slice = &self.data[self.pos..];
        self.pos = self.data.len();
        slice
    }

    pub fn skip(&mut self, n: usize) -> Result<(), CodecError> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn little_endian_round_trip() {
        let mut w = ByteWriter::new();
        w.write_u8(0xff);
        w.write_u16(0x0102);
        w.write_u32(148_354_645);
        w.write_u64(50_000_000);
        let bytes = w.into_inner();
        assert_eq!(&bytes[..7], &[0xff, 0x02, 0x01, 0x55, 0xb6, 0xd7, 0x08]);

        let mut r = ByteReader::new(&bytes);
        assert_eq!(r.read_u8().unwrap(), 0xff);
        assert_eq!(r.read_u16().unwrap(), 0x0102);
        assert_eq!(r.read_u32().unwrap(), 148_354_645);
        assert_eq!(r.read_u64().unwrap(), 50_000_000);
        assert!(!r.has_remaining());
    }

    #[test]
    fn underflow_is_malformed() {
        let mut r = ByteReader::new(&[1, 2]);
        assert!(matches!(r.read_u32(), Err(CodecError::MalformedTransactionBytes(_))));
        assert_eq!(r.position(), 0);
        assert_eq!(r.peek(1).unwrap(), 2);
        assert!(r.peek(2).is_err());
    }

    #[test]
    fn padding() {
        let mut w = ByteWriter::new();
        w.write_padded(b"ab", 4);
        w.write_padded(b"abcdef", 4);
        assert_eq!(w.into_inner(), b"ab\0\0abcdef".to_vec());
    }
}
