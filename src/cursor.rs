use byteorder::{ByteOrder, LittleEndian};

use crate::error::SourceQueryError;

/// Sequential reader over a received datagram.
///
/// Wraps an immutable byte slice and a read position. Every read is bounds
/// checked and advances the position; a truncated payload surfaces as
/// [`SourceQueryError::TruncatedData`] rather than a panic. There is no
/// random access or backtracking: fields must be consumed in wire order.
#[derive(Debug)]
pub struct PacketCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> PacketCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        PacketCursor { data, pos: 0 }
    }

    /// Bytes left to consume.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Consume exactly `n` bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], SourceQueryError> {
        if self.remaining() < n {
            return Err(SourceQueryError::TruncatedData);
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8, SourceQueryError> {
        Ok(self.read_bytes(1)?[0])
    }

    /// One byte; true iff non-zero.
    pub fn read_bool(&mut self) -> Result<bool, SourceQueryError> {
        Ok(self.read_u8()? > 0)
    }

    pub fn read_u16_le(&mut self) -> Result<u16, SourceQueryError> {
        Ok(LittleEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_u32_le(&mut self) -> Result<u32, SourceQueryError> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    /// Consume and discard a 4-byte float field.
    pub fn skip_f32(&mut self) -> Result<(), SourceQueryError> {
        self.read_bytes(4).map(|_| ())
    }

    /// Consume bytes up to and including the first null byte, returning the
    /// preceding bytes as a string. A missing terminator is a truncation.
    pub fn read_cstring(&mut self) -> Result<String, SourceQueryError> {
        let rest = &self.data[self.pos..];
        let nul = rest
            .iter()
            .position(|&c| c == 0)
            .ok_or(SourceQueryError::TruncatedData)?;
        self.pos += nul + 1;
        Ok(std::str::from_utf8(&rest[..nul])?.to_string())
    }
}
