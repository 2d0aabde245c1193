//! Wire-format reader.
//!
//! [`Reader`] is a cursor over an immutable byte slice that decodes the base
//! wire primitives: varints, ZigZag varints, 32/64-bit fixed-width values,
//! and length-delimited payloads. The buffer is borrowed; decoded `bytes`
//! and `string` values are copied out.

use bytes::Bytes;

use crate::error::{DecodeError, Result};

/// Cursor over a byte buffer, decoding base wire primitives.
///
/// On error the cursor is left at the failing position.
#[derive(Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
    len: usize,
}

impl<'a> Reader<'a> {
    /// Creates a reader over the whole buffer.
    #[must_use]
    pub const fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            len: buf.len(),
        }
    }

    /// Current read position.
    #[must_use]
    pub const fn pos(&self) -> usize {
        self.pos
    }

    /// Total buffer length.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the buffer is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes left between the cursor and the end of the buffer.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.len - self.pos
    }

    #[inline]
    fn require(&self, n: usize) -> Result<()> {
        if self.remaining() < n {
            return Err(DecodeError::Truncated { offset: self.pos });
        }
        Ok(())
    }

    /// Reads a base-128 varint as u64.
    ///
    /// # Errors
    /// `Truncated` if the buffer ends mid-varint, `MalformedVarint` if the
    /// varint runs past ten bytes.
    pub fn uint64(&mut self) -> Result<u64> {
        let start = self.pos;
        let mut value: u64 = 0;
        let mut shift: u32 = 0;
        loop {
            if self.pos - start == 10 {
                return Err(DecodeError::MalformedVarint { offset: start });
            }
            if self.pos >= self.len {
                return Err(DecodeError::Truncated { offset: self.pos });
            }
            let byte = self.buf[self.pos];
            self.pos += 1;
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
        }
    }

    /// Reads a varint as u32, truncating excess high bits.
    ///
    /// Fields declared 32-bit may legally arrive as sign-extended 64-bit
    /// varints, so the full varint is consumed either way.
    pub fn uint32(&mut self) -> Result<u32> {
        Ok(self.uint64()? as u32)
    }

    /// Reads a varint as i32.
    pub fn int32(&mut self) -> Result<i32> {
        Ok(self.uint64()? as i32)
    }

    /// Reads a ZigZag-encoded varint as i32.
    pub fn sint32(&mut self) -> Result<i32> {
        let n = self.uint32()?;
        Ok(((n >> 1) as i32) ^ -((n & 1) as i32))
    }

    /// Reads a varint as i64.
    pub fn int64(&mut self) -> Result<i64> {
        Ok(self.uint64()? as i64)
    }

    /// Reads a ZigZag-encoded varint as i64.
    pub fn sint64(&mut self) -> Result<i64> {
        let n = self.uint64()?;
        Ok(((n >> 1) as i64) ^ -((n & 1) as i64))
    }

    /// Reads a varint as bool.
    pub fn bool(&mut self) -> Result<bool> {
        Ok(self.uint64()? != 0)
    }

    /// Reads a little-endian fixed 32-bit value.
    pub fn fixed32(&mut self) -> Result<u32> {
        self.require(4)?;
        let bytes = &self.buf[self.pos..self.pos + 4];
        self.pos += 4;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Reads a little-endian fixed 32-bit value as i32.
    pub fn sfixed32(&mut self) -> Result<i32> {
        Ok(self.fixed32()? as i32)
    }

    /// Reads a little-endian IEEE 754 single.
    pub fn float(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.fixed32()?))
    }

    /// Reads a little-endian fixed 64-bit value.
    pub fn fixed64(&mut self) -> Result<u64> {
        self.require(8)?;
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&self.buf[self.pos..self.pos + 8]);
        self.pos += 8;
        Ok(u64::from_le_bytes(bytes))
    }

    /// Reads a little-endian fixed 64-bit value as i64.
    pub fn sfixed64(&mut self) -> Result<i64> {
        Ok(self.fixed64()? as i64)
    }

    /// Reads a little-endian IEEE 754 double.
    pub fn double(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.fixed64()?))
    }

    /// Reads a length-prefixed byte payload, copied out of the buffer.
    pub fn bytes(&mut self) -> Result<Bytes> {
        let len = self.uint32()? as usize;
        self.require(len)?;
        let payload = Bytes::copy_from_slice(&self.buf[self.pos..self.pos + len]);
        self.pos += len;
        Ok(payload)
    }

    /// Reads a length-prefixed UTF-8 string.
    ///
    /// # Errors
    /// `InvalidUtf8` if the payload is not valid UTF-8; the reported offset
    /// is the start of the payload.
    pub fn string(&mut self) -> Result<String> {
        let len = self.uint32()? as usize;
        self.require(len)?;
        let start = self.pos;
        let payload = &self.buf[start..start + len];
        let s = std::str::from_utf8(payload)
            .map_err(|_| DecodeError::InvalidUtf8 { offset: start })?;
        self.pos += len;
        Ok(s.to_string())
    }

    /// Advances the cursor by `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.require(n)?;
        self.pos += n;
        Ok(())
    }

    /// Consumes and discards a varint.
    pub fn skip_varint(&mut self) -> Result<()> {
        self.uint64().map(|_| ())
    }

    /// Advances past a field payload according to its wire type.
    ///
    /// Wire type 3 skips nested fields recursively until an end-group tag.
    /// Wire type 4 at this level and the reserved values 6/7 are malformed.
    pub fn skip_type(&mut self, wire_type: u32) -> Result<()> {
        match wire_type {
            0 => self.skip_varint(),
            1 => self.skip(8),
            2 => {
                let len = self.uint32()? as usize;
                self.skip(len)
            }
            3 => loop {
                let tag = self.uint32()?;
                let wt = tag & 7;
                if wt == 4 {
                    return Ok(());
                }
                self.skip_type(wt)?;
            },
            5 => self.skip(4),
            wt => Err(DecodeError::InvalidWireType {
                wire_type: wt,
                offset: self.pos,
            }),
        }
    }

    /// Skips an entire group whose start tag carried `field_id`.
    ///
    /// Nested groups are skipped recursively with their own id check. An
    /// end-group tag for a different field means the matching end tag can
    /// no longer occur, reported as truncation.
    pub fn skip_group(&mut self, field_id: u32) -> Result<()> {
        loop {
            let offset = self.pos;
            let tag = self.uint32()?;
            match tag & 7 {
                4 => {
                    return if tag >> 3 == field_id {
                        Ok(())
                    } else {
                        Err(DecodeError::Truncated { offset })
                    };
                }
                3 => self.skip_group(tag >> 3)?,
                wt => self.skip_type(wt)?,
            }
        }
    }
}
