//! Reading protobuf wire data, one field at a time.

use bytes::{Buf, Bytes};

use crate::error::DecodeError;
use crate::leb128::LebCodec;
use crate::message::Message;
use crate::wire::{WireType, make_tag, tag_field_number, tag_wire_type};

/// Maximum number of nested groups [`CodedInput`] descends into by default.
pub const DEFAULT_RECURSION_LIMIT: u32 = 100;

/// Cursor over an encoded message.
///
/// Generated `merge_from_input` implementations drive this with
/// [`CodedInput::read_tag`], dispatch on the returned tag and read the payload
/// with one of the `read_*` methods, or skip it with
/// [`CodedInput::skip_last_field`].
#[derive(Debug)]
pub struct CodedInput<B> {
    buf: B,
    last_tag: u32,
    recursion_depth: u32,
    recursion_limit: u32,
}

impl<B: Buf> CodedInput<B> {
    pub fn new(buf: B) -> Self {
        Self::with_recursion_limit(buf, DEFAULT_RECURSION_LIMIT)
    }

    pub fn with_recursion_limit(buf: B, recursion_limit: u32) -> Self {
        CodedInput {
            buf,
            last_tag: 0,
            recursion_depth: 0,
            recursion_limit,
        }
    }

    /// The tag most recently returned by [`CodedInput::read_tag`].
    ///
    /// Zero once the input is exhausted, or the end-group tag that stopped the
    /// last read loop.
    pub fn last_tag(&self) -> u32 {
        self.last_tag
    }

    /// Returns `true` if there is no more data to read.
    pub fn is_at_end(&self) -> bool {
        !self.buf.has_remaining()
    }

    /// Reads the next tag.
    ///
    /// Returns `None` at the end of the input and when an end-group tag is
    /// read. The caller tells the two apart with [`CodedInput::last_tag`].
    pub fn read_tag(&mut self) -> Result<Option<u32>, DecodeError> {
        if !self.buf.has_remaining() {
            self.last_tag = 0;
            return Ok(None);
        }

        let (tag, _) = u32::decode_leb128_buf(&mut self.buf)?;
        if tag_field_number(tag) == 0 {
            return Err(DecodeError::InvalidTag { tag });
        }
        let wire_type = tag_wire_type(tag)?;
        self.last_tag = tag;

        if wire_type == WireType::EGroup {
            Ok(None)
        } else {
            Ok(Some(tag))
        }
    }

    /// Skips the payload of the field whose tag was just read.
    pub fn skip_last_field(&mut self) -> Result<(), DecodeError> {
        let tag = self.last_tag;
        match tag_wire_type(tag)? {
            WireType::Varint => {
                u64::decode_leb128_buf(&mut self.buf)?;
            }
            WireType::I64 => self.advance(8)?,
            WireType::Len => {
                let len = self.read_length()?;
                self.advance(len)?;
            }
            WireType::SGroup => self.skip_group(tag_field_number(tag))?,
            WireType::EGroup => {
                return Err(DecodeError::UnexpectedEndGroup {
                    field_number: tag_field_number(tag),
                });
            }
            WireType::I32 => self.advance(4)?,
        }
        Ok(())
    }

    /// Merges a group-encoded message into `message`.
    ///
    /// The start tag has already been consumed; this reads up to and including
    /// the matching end tag.
    pub fn read_group<M: Message>(
        &mut self,
        field_number: u32,
        message: &mut M,
    ) -> Result<(), DecodeError> {
        self.enter_group()?;
        message.merge_from_input(self)?;
        self.recursion_depth -= 1;
        self.check_end_group(field_number)
    }

    pub fn read_double(&mut self) -> Result<f64, DecodeError> {
        Ok(f64::from_bits(self.read_fixed64()?))
    }

    pub fn read_float(&mut self) -> Result<f32, DecodeError> {
        Ok(f32::from_bits(self.read_fixed32()?))
    }

    /// Negative values are sign-extended to ten bytes on the wire, so the
    /// value is read as 64 bits and truncated.
    #[allow(clippy::as_conversions)]
    pub fn read_int32(&mut self) -> Result<i32, DecodeError> {
        Ok(self.read_varint()? as i32)
    }

    #[allow(clippy::as_conversions)]
    pub fn read_int64(&mut self) -> Result<i64, DecodeError> {
        Ok(self.read_varint()? as i64)
    }

    #[allow(clippy::as_conversions)]
    pub fn read_uint32(&mut self) -> Result<u32, DecodeError> {
        Ok(self.read_varint()? as u32)
    }

    pub fn read_uint64(&mut self) -> Result<u64, DecodeError> {
        self.read_varint()
    }

    #[allow(clippy::as_conversions)]
    pub fn read_sint32(&mut self) -> Result<i32, DecodeError> {
        let n = self.read_varint()? as u32;
        Ok(((n >> 1) as i32) ^ -((n & 1) as i32))
    }

    #[allow(clippy::as_conversions)]
    pub fn read_sint64(&mut self) -> Result<i64, DecodeError> {
        let n = self.read_varint()?;
        Ok(((n >> 1) as i64) ^ -((n & 1) as i64))
    }

    pub fn read_fixed32(&mut self) -> Result<u32, DecodeError> {
        self.ensure_remaining(4)?;
        Ok(self.buf.get_u32_le())
    }

    pub fn read_fixed64(&mut self) -> Result<u64, DecodeError> {
        self.ensure_remaining(8)?;
        Ok(self.buf.get_u64_le())
    }

    pub fn read_sfixed32(&mut self) -> Result<i32, DecodeError> {
        self.ensure_remaining(4)?;
        Ok(self.buf.get_i32_le())
    }

    pub fn read_sfixed64(&mut self) -> Result<i64, DecodeError> {
        self.ensure_remaining(8)?;
        Ok(self.buf.get_i64_le())
    }

    pub fn read_bool(&mut self) -> Result<bool, DecodeError> {
        Ok(self.read_varint()? != 0)
    }

    pub fn read_string(&mut self) -> Result<String, DecodeError> {
        let bytes = self.read_bytes()?;
        match std::str::from_utf8(&bytes) {
            Ok(s) => Ok(s.to_owned()),
            Err(_) => Err(DecodeError::InvalidUtf8),
        }
    }

    pub fn read_bytes(&mut self) -> Result<Bytes, DecodeError> {
        let len = self.read_length()?;
        Ok(self.buf.copy_to_bytes(len))
    }

    fn read_varint(&mut self) -> Result<u64, DecodeError> {
        let (value, _) = u64::decode_leb128_buf(&mut self.buf)?;
        Ok(value)
    }

    /// Reads a length prefix and checks it against the remaining input.
    fn read_length(&mut self) -> Result<usize, DecodeError> {
        let value = self.read_varint()?;
        let len = usize::try_from(value).map_err(|_| DecodeError::LengthOverflow { value })?;
        self.ensure_remaining(len)?;
        Ok(len)
    }

    fn ensure_remaining(&self, len: usize) -> Result<(), DecodeError> {
        if self.buf.remaining() < len {
            Err(DecodeError::UnexpectedEndOfBuffer)
        } else {
            Ok(())
        }
    }

    fn advance(&mut self, len: usize) -> Result<(), DecodeError> {
        self.ensure_remaining(len)?;
        self.buf.advance(len);
        Ok(())
    }

    fn enter_group(&mut self) -> Result<(), DecodeError> {
        if self.recursion_depth >= self.recursion_limit {
            return Err(DecodeError::RecursionLimitExceeded {
                limit: self.recursion_limit,
            });
        }
        self.recursion_depth += 1;
        Ok(())
    }

    fn skip_group(&mut self, field_number: u32) -> Result<(), DecodeError> {
        self.enter_group()?;
        while self.read_tag()?.is_some() {
            self.skip_last_field()?;
        }
        self.recursion_depth -= 1;
        self.check_end_group(field_number)
    }

    fn check_end_group(&self, field_number: u32) -> Result<(), DecodeError> {
        let expected = make_tag(field_number, WireType::EGroup);
        match self.last_tag {
            tag if tag == expected => Ok(()),
            0 => Err(DecodeError::TruncatedGroup { field_number }),
            actual => Err(DecodeError::MismatchedEndGroup { expected, actual }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CodedInput;
    use crate::error::DecodeError;
    use crate::message::Message;
    use crate::message::testing::Node;

    #[test]
    fn test_read_tag_rejects_field_zero() {
        let mut input = CodedInput::new(&[0x00u8, 0x01][..]);
        assert_eq!(input.read_tag(), Err(DecodeError::InvalidTag { tag: 0 }));

        let mut input = CodedInput::new(&[0x0Eu8][..]);
        assert_eq!(
            input.read_tag(),
            Err(DecodeError::InvalidWireType { value: 6 })
        );
    }

    #[test]
    fn test_read_tag_stops_at_end_group() {
        let mut input = CodedInput::new(&[0x08u8, 0x01, 0x14][..]);
        assert_eq!(input.read_tag(), Ok(Some(8)));
        assert_eq!(input.read_int32(), Ok(1));
        assert_eq!(input.read_tag(), Ok(None));
        assert_eq!(input.last_tag(), 0x14);

        let mut input = CodedInput::new(&[][..]);
        assert_eq!(input.read_tag(), Ok(None));
        assert_eq!(input.last_tag(), 0);
    }

    #[test]
    fn test_skip_every_wire_type() {
        #[rustfmt::skip]
        let data = [
            // field 3, varint
            0x18, 0x96, 0x01,
            // field 4, i64
            0x21, 1, 2, 3, 4, 5, 6, 7, 8,
            // field 5, len
            0x2A, 0x02, b'h', b'i',
            // field 6, i32
            0x35, 1, 2, 3, 4,
            // field 7, group holding a varint and a nested group 8
            0x3B, 0x08, 0x01, 0x43, 0x44, 0x3C,
            // field 1, varint, the only known field
            0x08, 0x2A,
        ];
        let node = Node::decode(&data[..]).unwrap();
        assert_eq!(node.value, Some(42));
        assert_eq!(node.child, None);
    }

    #[test]
    fn test_group_roundtrip() {
        let node = Node::nested(3);
        let encoded = node.encode_to_vec();
        assert_eq!(encoded.len(), node.calculate_size());

        let decoded = Node::decode(&encoded[..]).unwrap();
        assert_eq!(decoded, node);
        assert_eq!(decoded.encode_to_vec(), encoded);
    }

    #[test]
    fn test_group_end_tag_errors() {
        // Group 2 closed by the end tag of field 3.
        let data = [0x13u8, 0x08, 0x01, 0x1C];
        assert_eq!(
            Node::decode(&data[..]),
            Err(DecodeError::MismatchedEndGroup {
                expected: 0x14,
                actual: 0x1C
            })
        );

        // Input ends before the group does.
        let data = [0x13u8, 0x08, 0x01];
        assert_eq!(
            Node::decode(&data[..]),
            Err(DecodeError::TruncatedGroup { field_number: 2 })
        );

        // An unknown group must be closed as well.
        let data = [0x3Bu8, 0x08, 0x01];
        assert_eq!(
            Node::decode(&data[..]),
            Err(DecodeError::TruncatedGroup { field_number: 7 })
        );

        // End tag with no group open.
        let data = [0x08u8, 0x01, 0x14];
        assert_eq!(
            Node::decode(&data[..]),
            Err(DecodeError::UnexpectedEndGroup { field_number: 2 })
        );
    }

    #[test]
    fn test_recursion_limit() {
        let ok = Node::nested(3).encode_to_vec();
        let mut node = Node::default();
        let mut input = CodedInput::with_recursion_limit(&ok[..], 3);
        node.merge_from_input(&mut input).unwrap();

        let too_deep = Node::nested(4).encode_to_vec();
        let mut node = Node::default();
        let mut input = CodedInput::with_recursion_limit(&too_deep[..], 3);
        assert_eq!(
            node.merge_from_input(&mut input),
            Err(DecodeError::RecursionLimitExceeded { limit: 3 })
        );
    }

    #[test]
    fn test_length_delimited_errors() {
        let mut input = CodedInput::new(&[0x05u8, b'a'][..]);
        assert_eq!(input.read_bytes(), Err(DecodeError::UnexpectedEndOfBuffer));

        let mut input = CodedInput::new(&[0x02u8, 0xC3, 0x28][..]);
        assert_eq!(input.read_string(), Err(DecodeError::InvalidUtf8));

        let mut input = CodedInput::new(&[0x03u8, b'a', b'b', b'c'][..]);
        assert_eq!(input.read_string().as_deref(), Ok("abc"));
        assert!(input.is_at_end());

        let mut input = CodedInput::new(&[0x01u8, 0x02][..]);
        assert_eq!(input.read_fixed32(), Err(DecodeError::UnexpectedEndOfBuffer));
    }

    #[test]
    fn test_read_scalars() {
        #[rustfmt::skip]
        let data = [
            // int32 -1, sign-extended
            0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01,
            // sint32 -2
            0x03,
            // sint64 1
            0x02,
            // double 1.5
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF8, 0x3F,
            // bool
            0x01,
        ];
        let mut input = CodedInput::new(&data[..]);
        assert_eq!(input.read_int32(), Ok(-1));
        assert_eq!(input.read_sint32(), Ok(-2));
        assert_eq!(input.read_sint64(), Ok(1));
        assert_eq!(input.read_double(), Ok(1.5));
        assert_eq!(input.read_bool(), Ok(true));
        assert!(input.is_at_end());
    }
}
