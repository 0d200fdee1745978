//! Wire format for Google's Protocol Buffers, aka [protobuf](https://protobuf.dev).

use crate::error::DecodeError;
use crate::leb128::LebCodec;

/// Minimum value of a protobuf field number.
pub const MINIMUM_TAG_VAL: u32 = 1;
/// Maximum value of a protobuf field number.
pub const MAXIMUM_TAG_VAL: u32 = (1 << 29) - 1;

/// Field numbers reserved for the protobuf implementation itself.
pub const RESERVED_TAG_RANGE: core::ops::RangeInclusive<u32> = 19_000..=19_999;

// A tag for the largest field number must still fit in a u32.
static_assertions::const_assert!(MAXIMUM_TAG_VAL <= u32::MAX >> 3);

/// Combines a field number and a [`WireType`] into a tag.
///
/// See the "Message Structure" section of <https://protobuf.dev/programming-guides/encoding>.
#[inline(always)]
pub const fn make_tag(field_number: u32, wire_type: WireType) -> u32 {
    (field_number << 3) | wire_type.into_val() as u32
}

/// Returns the field number component of a tag.
#[inline(always)]
pub const fn tag_field_number(tag: u32) -> u32 {
    tag >> 3
}

/// Returns the [`WireType`] component of a tag.
#[inline]
pub fn tag_wire_type(tag: u32) -> Result<WireType, DecodeError> {
    // Masked to three bits, so the cast is lossless.
    #[allow(clippy::as_conversions)]
    let raw = (tag & 0b111) as u8;
    WireType::try_from(raw)
}

/// Encodes the provided field number and wire type as a protobuf tag.
#[inline(always)]
pub fn encode_key<B: bytes::BufMut>(wire_type: WireType, field_number: u32, buf: &mut B) {
    make_tag(field_number, wire_type).encode_leb128(buf);
}

/// Returns the encoded length of a tag for `field_number`.
///
/// The wire type doesn't affect the length since it only uses the low 3 bits.
#[inline(always)]
pub fn encoded_key_len(field_number: u32) -> usize {
    (field_number << 3).encoded_leb128_len()
}

/// Denotes the type of a field in an encoded protobuf message.
///
/// Protobuf messages are a series of key-value pairs. When encoded each key-value pair
/// is turned into a record consisting of a field number, a [`WireType`], and a payload.
/// The [`WireType`] indicates how large the proceeding payload is.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum WireType {
    /// Variable length integer.
    ///
    /// Used for: `int32`, `int64`, `uint32`, `uint64`, `sint32`, `sint64`, `bool`, `enum`.
    Varint = 0,
    /// 64-bit integer.
    ///
    /// Used for: `fixed64`, `sfixed64`, `double`.
    I64 = 1,
    /// Variable length field.
    ///
    /// Used for: `string`, `bytes`, `message`, packed `repeated` fields.
    Len = 2,
    /// Group start.
    SGroup = 3,
    /// Group end.
    EGroup = 4,
    /// 32-bit integer.
    ///
    /// Used for: `fixed32`, `sfixed32`, `float`.
    I32 = 5,
}

// N.B. It's not super important that these are the same size, but keeping them as such
// allows the compiler to make as many optimizations as possible.
static_assertions::assert_eq_size!(WireType, Option<WireType>);

#[allow(clippy::as_conversions)]
impl WireType {
    /// Maximum value an [`WireType`] can be.
    const MAX_VAL: u8 = WireType::I32 as u8;

    /// Return the raw value for this [`WireType`].
    #[inline(always)]
    pub const fn into_val(self) -> u8 {
        self as u8
    }

    /// Size in bytes of the payload for fixed-width wire types.
    pub const fn fixed_size(self) -> Option<usize> {
        match self {
            WireType::I32 => Some(4),
            WireType::I64 => Some(8),
            _ => None,
        }
    }
}

impl TryFrom<u8> for WireType {
    type Error = DecodeError;

    #[inline]
    fn try_from(value: u8) -> Result<Self, DecodeError> {
        match value {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::I64),
            2 => Ok(WireType::Len),
            3 => Ok(WireType::SGroup),
            4 => Ok(WireType::EGroup),
            v if v > WireType::MAX_VAL => Err(DecodeError::InvalidWireType { value: v }),
            _ => Ok(WireType::I32),
        }
    }
}
