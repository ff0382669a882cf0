//! Sequential reader over the patch bytes

use crate::error::Buffer;
use crate::{Error, Result};

/// Cursor over a patch with BPS number decoding
#[derive(Debug, Clone)]
pub(crate) struct PatchReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> PatchReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Start reading at an offset already known to be in range
    pub(crate) fn at(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    /// Current read offset
    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8> {
        let byte = *self
            .data
            .get(self.pos)
            .ok_or_else(|| Error::out_of_bounds(Buffer::Patch, self.pos, 1))?;
        self.pos += 1;
        Ok(byte)
    }

    /// Borrow the next `len` bytes and advance past them
    pub(crate) fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let bytes = self
            .pos
            .checked_add(len)
            .and_then(|end| self.data.get(self.pos..end))
            .ok_or_else(|| Error::out_of_bounds(Buffer::Patch, self.pos, len))?;
        self.pos += len;
        Ok(bytes)
    }

    /// Decode an unsigned variable-length number
    ///
    /// Each byte contributes `(byte ^ 0x80) << shift`; the byte with the high
    /// bit set is the last one. The `^ 0x80` on continuation bytes makes every
    /// value have exactly one encoding.
    pub(crate) fn read_number(&mut self) -> Result<u64> {
        let start = self.pos;
        let mut value = 0u64;
        let mut shift = 0u32;

        loop {
            let byte = self.read_u8()?;
            let part = u64::from(byte ^ 0x80);
            value = part
                .checked_shl(shift)
                .filter(|shifted| shifted >> shift == part)
                .and_then(|shifted| value.checked_add(shifted))
                .ok_or(Error::NumberOverflow { offset: start })?;

            if byte & 0x80 != 0 {
                return Ok(value);
            }

            shift += 7;
        }
    }

    /// Decode a number that must address memory
    pub(crate) fn read_size(&mut self) -> Result<usize> {
        let start = self.pos;
        let value = self.read_number()?;
        usize::try_from(value).map_err(|_| Error::NumberOverflow { offset: start })
    }

    /// Decode a signed variable-length number
    ///
    /// The low bit of the unsigned encoding is the sign, the rest the magnitude.
    pub(crate) fn read_signed(&mut self) -> Result<i64> {
        let start = self.pos;
        let encoded = self.read_number()?;
        let magnitude =
            i64::try_from(encoded >> 1).map_err(|_| Error::NumberOverflow { offset: start })?;

        Ok(if encoded & 1 != 0 {
            -magnitude
        } else {
            magnitude
        })
    }
}
