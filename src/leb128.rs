//! LEB128 variable-length integer encoding/decoding.

// This module uses `as` casts which have been thoroughly reviewed for correctness.
#![allow(clippy::as_conversions)]

use crate::error::DecodeError;

/// Types that can be encoded as, and decoded from, a LEB128 encoded integer.
pub trait LebCodec: Sized + Copy {
    /// Maximum number of bytes a value of this type occupies when encoded.
    const MAX_LEB_BYTES: usize;

    /// Decode a LEB128 variable length integer from the front of `buf`,
    /// advancing past it.
    ///
    /// Returns a tuple of the decoded value and the number of bytes read.
    fn decode_leb128_buf<B: bytes::Buf>(buf: &mut B) -> Result<(Self, usize), DecodeError>;

    /// Encode `self` as a LEB128 variable length integer into the provided
    /// buffer, returning the number of bytes written.
    fn encode_leb128<B: bytes::BufMut>(self, buf: &mut B) -> usize;

    /// The number of bytes required to encode this integer.
    fn encoded_leb128_len(self) -> usize;
}

impl LebCodec for u64 {
    const MAX_LEB_BYTES: usize = 10;

    #[inline]
    fn decode_leb128_buf<B: bytes::Buf>(buf: &mut B) -> Result<(Self, usize), DecodeError> {
        let mut value = 0u64;
        for i in 0..Self::MAX_LEB_BYTES {
            if !buf.has_remaining() {
                return Err(DecodeError::UnexpectedEndOfBuffer);
            }
            let b = buf.get_u8();
            value |= u64::from(b & 0x7F) << (7 * i);
            if b < 0x80 {
                // The tenth byte may only carry the single remaining bit.
                if i == Self::MAX_LEB_BYTES - 1 && b > 1 {
                    return Err(DecodeError::InvalidVarint);
                }
                return Ok((value, i + 1));
            }
        }
        Err(DecodeError::InvalidVarint)
    }

    #[inline]
    fn encode_leb128<B: bytes::BufMut>(self, buf: &mut B) -> usize {
        let mut value = self;
        let mut written = 1;
        while value >= 0x80 {
            buf.put_u8((value as u8) | 0x80);
            value >>= 7;
            written += 1;
        }
        buf.put_u8(value as u8);
        written
    }

    #[inline]
    fn encoded_leb128_len(self) -> usize {
        // Each byte carries 7 bits, and zero still takes one byte.
        let bits = 64 - (self | 1).leading_zeros() as usize;
        bits.div_ceil(7)
    }
}

impl LebCodec for u32 {
    const MAX_LEB_BYTES: usize = 5;

    #[inline]
    fn decode_leb128_buf<B: bytes::Buf>(buf: &mut B) -> Result<(Self, usize), DecodeError> {
        let (value, len) = u64::decode_leb128_buf(buf)?;
        let value = u32::try_from(value).map_err(|_| DecodeError::InvalidVarint)?;
        Ok((value, len))
    }

    #[inline]
    fn encode_leb128<B: bytes::BufMut>(self, buf: &mut B) -> usize {
        u64::from(self).encode_leb128(buf)
    }

    #[inline]
    fn encoded_leb128_len(self) -> usize {
        let bits = 32 - (self | 1).leading_zeros() as usize;
        bits.div_ceil(7)
    }
}
