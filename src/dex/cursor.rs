//! Bounds-checked reader over a borrowed DEX buffer.
//!
//! The cursor never copies the buffer; it only tracks an offset. Most DEX
//! structures are referenced by absolute file offsets, so `seek` is as common
//! as sequential reads.

use crate::dex::error::DexError;
use crate::dex::leb::{decode_sleb128, decode_uleb128, decode_uleb128p1, LebError};
use log::warn;

#[derive(Debug, Clone)]
pub struct DexCursor<'a>
{
    bytes: &'a [u8],
    ix: usize,
}

impl<'a> DexCursor<'a>
{
    pub fn new(bytes: &'a [u8]) -> Self
    {
        DexCursor { bytes, ix: 0 }
    }

    /// A cursor positioned at `offset`, failing if the offset lies past the end.
    pub fn at(bytes: &'a [u8], offset: usize) -> Result<Self, DexError>
    {
        let mut cursor = DexCursor::new(bytes);
        cursor.seek(offset)?;
        Ok(cursor)
    }

    pub fn position(&self) -> usize
    {
        self.ix
    }

    /// Moves to an absolute offset. Seeking to exactly the end is allowed.
    pub fn seek(&mut self, offset: usize) -> Result<(), DexError>
    {
        if offset > self.bytes.len()
        {
            return Err(DexError::out_of_bounds(offset, 0, self.bytes.len()));
        }
        self.ix = offset;
        Ok(())
    }

    pub fn skip(&mut self, count: usize) -> Result<(), DexError>
    {
        self.take(count).map(|_| ())
    }

    pub fn remaining(&self) -> usize
    {
        self.bytes.len() - self.ix
    }

    pub fn bytes(&self) -> &'a [u8]
    {
        self.bytes
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8], DexError>
    {
        if self.remaining() < count
        {
            return Err(DexError::out_of_bounds(self.ix, count, self.bytes.len()));
        }
        let slice = &self.bytes[self.ix..self.ix + count];
        self.ix += count;
        Ok(slice)
    }

    pub fn read_u1(&mut self) -> Result<u8, DexError>
    {
        Ok(self.take(1)?[0])
    }

    pub fn read_u2(&mut self) -> Result<u16, DexError>
    {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u4(&mut self) -> Result<u32, DexError>
    {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Eight-byte little-endian read.
    pub fn read_u8(&mut self) -> Result<u64, DexError>
    {
        let b = self.take(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(b);
        Ok(u64::from_le_bytes(raw))
    }

    pub fn read_x(&mut self, length: usize) -> Result<&'a [u8], DexError>
    {
        self.take(length)
    }

    fn leb_error(&self, e: LebError, what: &str) -> DexError
    {
        match e
        {
            LebError::Truncated => DexError::with_context(
                DexError::out_of_bounds(self.ix, self.remaining() + 1, self.bytes.len()),
                what.to_string(),
            ),
            LebError::Overlong => {
                DexError::invalid_format(format!("over-length {} at offset 0x{:x}", what, self.ix))
            }
        }
    }

    pub fn read_uleb128(&mut self) -> Result<u32, DexError>
    {
        match decode_uleb128(&self.bytes[self.ix..])
        {
            Ok((val, size)) => {
                self.ix += size;
                Ok(val)
            }
            Err(e) => Err(self.leb_error(e, "uleb128")),
        }
    }

    /// uleb128p1: `None` stands for `NO_INDEX`.
    pub fn read_uleb128p1(&mut self) -> Result<Option<u32>, DexError>
    {
        match decode_uleb128p1(&self.bytes[self.ix..])
        {
            Ok((val, size)) => {
                self.ix += size;
                Ok(val)
            }
            Err(e) => Err(self.leb_error(e, "uleb128p1")),
        }
    }

    pub fn read_sleb128(&mut self) -> Result<i32, DexError>
    {
        match decode_sleb128(&self.bytes[self.ix..])
        {
            Ok((val, size)) => {
                self.ix += size;
                Ok(val)
            }
            Err(e) => Err(self.leb_error(e, "sleb128")),
        }
    }

    /// Decodes exactly `byte_length` bytes of Modified UTF-8.
    pub fn read_mutf8(&mut self, byte_length: usize) -> Result<String, DexError>
    {
        let start = self.ix;
        let raw = self.take(byte_length)?;
        decode_mutf8(raw).map_err(|e| err!(e, "string at 0x{:x}", start))
    }

    /// Reads a `string_data_item`: a uleb128 UTF-16 length followed by
    /// NUL-terminated MUTF-8 bytes.
    pub fn read_string_data(&mut self) -> Result<String, DexError>
    {
        let start = self.ix;
        let utf16_size = self.read_uleb128()? as usize;
        let rest = &self.bytes[self.ix..];
        let Some(len) = rest.iter().position(|&b| b == 0) else {
            return Err(err!(
                DexError::out_of_bounds(self.ix, rest.len() + 1, self.bytes.len()),
                "unterminated string_data_item at 0x{:x}",
                start
            ));
        };
        let s = self.read_mutf8(len)?;
        self.ix += 1;

        let units = s.encode_utf16().count();
        if units != utf16_size
        {
            warn!(
                "[strings] string_data_item at 0x{:x} declares {} UTF-16 units, decoded {}",
                start, utf16_size, units
            );
        }
        Ok(s)
    }
}

/// Modified UTF-8 as Java writes it: U+0000 is `C0 80` and supplementary
/// characters are encoded as surrogate pairs.
pub fn decode_mutf8(raw: &[u8]) -> Result<String, DexError>
{
    match cesu8::from_java_cesu8(raw)
    {
        Ok(s) => Ok(s.into_owned()),
        Err(_) => Err(DexError::invalid_format(format!("invalid MUTF-8 sequence {:02x?}", raw))),
    }
}
