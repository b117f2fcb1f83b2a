//! Bounds-checked byte cursors, read-only and writable.
//!
//! Mirrors the split `iobuf` / `const_iobuf` pair from the C original: a
//! read-only [`Cursor`] over a borrowed slice, and a [`WriteCursor`] that can
//! either own a backing buffer or run in "sizing" mode (no buffer at all, the
//! position still advances) so callers can size an output before allocating
//! it.

use crate::error::{Error, Result};

/// A bounds-checked read cursor over a borrowed byte slice.
#[derive(Clone, Copy)]
pub struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Read `n` bytes and advance, failing if that would cross the end.
    pub fn read(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(Error::ShortRead);
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read(1)?[0])
    }

    pub fn read_u16_be(&mut self) -> Result<u16> {
        let b = self.read(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn read_u32_be(&mut self) -> Result<u32> {
        let b = self.read(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_u64_be(&mut self) -> Result<u64> {
        let b = self.read(8)?;
        Ok(u64::from_be_bytes(b.try_into().unwrap()))
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        let b = self.read(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        let b = self.read(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_u64_le(&mut self) -> Result<u64> {
        let b = self.read(8)?;
        Ok(u64::from_le_bytes(b.try_into().unwrap()))
    }

    /// Advance to the next multiple of `n`, failing if that crosses the end.
    pub fn align(&mut self, n: usize) -> Result<()> {
        let rem = self.pos % n;
        if rem == 0 {
            return Ok(());
        }
        let skip = n - rem;
        if self.remaining() < skip {
            return Err(Error::ShortRead);
        }
        self.pos += skip;
        Ok(())
    }

    /// Produce a new cursor over the next `n` bytes and advance past them.
    pub fn slice(&mut self, n: usize) -> Result<Cursor<'a>> {
        Ok(Cursor::new(self.read(n)?))
    }

    pub fn peek(&self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(Error::ShortRead);
        }
        Ok(&self.bytes[self.pos..self.pos + n])
    }
}

/// A writable cursor. When `bytes` is `None` the cursor runs in sizing mode:
/// every write only advances `pos`, nothing is stored.
pub struct WriteCursor {
    bytes: Option<Vec<u8>>,
    pos: usize,
}

impl WriteCursor {
    /// A sizing cursor: tracks how many bytes would be written.
    pub fn sizing() -> Self {
        Self { bytes: None, pos: 0 }
    }

    /// A materializing cursor backed by a buffer preallocated to `capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { bytes: Some(Vec::with_capacity(capacity)), pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn is_sizing(&self) -> bool {
        self.bytes.is_none()
    }

    pub fn write(&mut self, data: &[u8]) {
        if let Some(buf) = self.bytes.as_mut() {
            buf.extend_from_slice(data);
        }
        self.pos += data.len();
    }

    pub fn write_u8(&mut self, v: u8) {
        self.write(&[v]);
    }

    pub fn write_str(&mut self, s: &str) {
        self.write(s.as_bytes());
    }

    pub fn write_u32_be(&mut self, v: u32) {
        self.write(&v.to_be_bytes());
    }

    /// Consume the cursor, returning the materialized bytes. Panics if this
    /// cursor was created with [`WriteCursor::sizing`].
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes.expect("into_bytes called on a sizing cursor")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_past_end_is_short_read() {
        let mut c = Cursor::new(&[1, 2, 3]);
        assert!(c.read(4).is_err());
    }

    #[test]
    fn be_and_le_agree_on_reversed_bytes() {
        let mut be = Cursor::new(&[0x12, 0x34]);
        let mut le = Cursor::new(&[0x34, 0x12]);
        assert_eq!(be.read_u16_be().unwrap(), le.read_u16_le().unwrap());
    }

    #[test]
    fn align_skips_to_boundary() {
        let mut c = Cursor::new(&[0u8; 8]);
        c.read(1).unwrap();
        c.align(4).unwrap();
        assert_eq!(c.pos(), 4);
        c.align(4).unwrap();
        assert_eq!(c.pos(), 4);
    }

    #[test]
    fn sizing_cursor_tracks_position_without_storing() {
        let mut c = WriteCursor::sizing();
        c.write(b"hello");
        assert_eq!(c.pos(), 5);
        assert!(c.is_sizing());
    }
}
