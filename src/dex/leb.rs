/// Why a LEB128 decode failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LebError {
    /// The input ended while the continuation bit was still set.
    Truncated,
    /// More than 5 bytes, or bits that do not fit in 32.
    Overlong,
}

// DEX uleb128/sleb128 values are 32-bit, so valid encodings are at most 5 bytes.
const MAX_LEB_BYTES: usize = 5;

pub(crate) fn decode_uleb128(encoded: &[u8]) -> Result<(u32, usize), LebError> {
    let mut value: u32 = 0;
    let mut shift: u32 = 0;

    for (count, &byte) in encoded.iter().enumerate() {
        let low = (byte & 0x7F) as u32;
        if count == MAX_LEB_BYTES - 1 && (byte & 0x70) != 0 {
            // only the low 4 bits of the fifth byte are significant
            return Err(LebError::Overlong);
        }
        value |= low << shift;

        if (byte & 0x80) == 0 {
            return Ok((value, count + 1));
        }
        if count == MAX_LEB_BYTES - 1 {
            return Err(LebError::Overlong);
        }
        shift += 7;
    }

    Err(LebError::Truncated)
}

pub(crate) fn decode_sleb128(encoded: &[u8]) -> Result<(i32, usize), LebError> {
    let mut value: i32 = 0;
    let mut shift: u32 = 0;

    for (count, &byte) in encoded.iter().enumerate() {
        let low = (byte & 0x7F) as i32;
        value |= low.wrapping_shl(shift);
        shift += 7;

        if (byte & 0x80) == 0 {
            // Sign-extend from the last encoded byte if we didn't fill all 32 bits
            if (byte & 0x40) != 0 && shift < 32 {
                value |= (-1i32) << shift;
            }
            return Ok((value, count + 1));
        }
        if count == MAX_LEB_BYTES - 1 {
            return Err(LebError::Overlong);
        }
    }

    Err(LebError::Truncated)
}

/// uleb128p1: the encoded value minus one, so `NO_INDEX` (-1) encodes as a single 0 byte.
pub(crate) fn decode_uleb128p1(encoded: &[u8]) -> Result<(Option<u32>, usize), LebError> {
    let (v, c) = decode_uleb128(encoded)?;
    Ok((v.checked_sub(1), c))
}

#[cfg(test)]
pub(crate) fn encode_uleb128(value: u32) -> Vec<u8> {
    let mut result = Vec::new();
    let mut remaining = value;

    loop {
        let mut byte = (remaining & 0x7F) as u8;
        remaining >>= 7;
        if remaining != 0 {
            byte |= 0x80;
        }
        result.push(byte);
        if remaining == 0 {
            break;
        }
    }

    result
}

#[cfg(test)]
pub(crate) fn encode_sleb128(value: i32) -> Vec<u8> {
    let mut result = Vec::new();
    let mut remaining = value;

    loop {
        let mut byte = (remaining & 0x7F) as u8;
        remaining >>= 7;

        let is_more =
            !((remaining == 0 && (byte & 0x40) == 0) || (remaining == -1 && (byte & 0x40) != 0));
        if is_more {
            byte |= 0x80;
        }

        result.push(byte);

        if !is_more {
            break;
        }
    }

    result
}

#[cfg(test)]
pub(crate) fn encode_uleb128p1(value: Option<u32>) -> Vec<u8> {
    encode_uleb128(value.map_or(0, |v| v + 1))
}
