//! Tag values for generated fields, computed once at generation time.

use protofield::leb128::LebCodec;
use protofield::wire::{WireType, make_tag};

/// A field's tag and its minimal varint encoding.
///
/// Generated code writes [`Tag::bytes`] as a literal instead of encoding the
/// tag at runtime, and size computation reuses [`Tag::size`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    field_number: u32,
    wire_type: WireType,
    value: u32,
    bytes: Vec<u8>,
}

impl Tag {
    /// Field numbers are validated before a tag is built, so this can't fail.
    pub fn new(field_number: u32, wire_type: WireType) -> Tag {
        let value = make_tag(field_number, wire_type);
        let mut bytes = Vec::with_capacity(u32::MAX_LEB_BYTES);
        value.encode_leb128(&mut bytes);

        Tag {
            field_number,
            wire_type,
            value,
            bytes,
        }
    }

    pub fn field_number(&self) -> u32 {
        self.field_number
    }

    pub fn wire_type(&self) -> WireType {
        self.wire_type
    }

    /// `(field_number << 3) | wire_type`.
    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of bytes the tag occupies on the wire.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// The start and end tags bracketing a group field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupTags {
    pub start: Tag,
    pub end: Tag,
}

impl GroupTags {
    pub fn new(field_number: u32) -> GroupTags {
        GroupTags {
            start: Tag::new(field_number, WireType::SGroup),
            end: Tag::new(field_number, WireType::EGroup),
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use protofield::wire::{MAXIMUM_TAG_VAL, MINIMUM_TAG_VAL, WireType};

    use super::{GroupTags, Tag};

    #[test]
    fn test_double_field_five() {
        let tag = Tag::new(5, WireType::I64);
        assert_eq!(tag.value(), 41);
        assert_eq!(tag.bytes(), [0x29]);
        assert_eq!(tag.size(), 1);
    }

    #[test]
    fn test_group_field_sixteen() {
        let tags = GroupTags::new(16);
        assert_eq!(tags.start.value(), 131);
        assert_eq!(tags.start.bytes(), [0x83, 0x01]);
        assert_eq!(tags.end.value(), 132);
        assert_eq!(tags.end.bytes(), [0x84, 0x01]);
        assert_eq!(tags.start.field_number(), tags.end.field_number());
        assert_eq!(tags.end.wire_type(), WireType::EGroup);
    }

    #[test]
    fn test_largest_field_number() {
        let tag = Tag::new(MAXIMUM_TAG_VAL, WireType::I32);
        assert_eq!(tag.size(), 5);
        assert_eq!(tag.value(), u32::MAX - 2);
    }

    #[test]
    fn proptest_tag_bytes_decode_to_value() {
        fn arb_wiretype() -> impl Strategy<Value = WireType> {
            (0..=5u8).prop_map(|val| WireType::try_from(val).expect("known valid"))
        }

        fn test(field_number: u32, wire_type: WireType) {
            let tag = Tag::new(field_number, wire_type);
            assert_eq!(tag, Tag::new(field_number, wire_type));

            let mut reader = tag.bytes();
            let decoded = leb128::read::unsigned(&mut reader).expect("valid varint");
            assert_eq!(decoded, u64::from(tag.value()));
            assert!(reader.is_empty());

            // Minimal encoding: only the last byte lacks the continuation bit.
            let (last, rest) = tag.bytes().split_last().expect("non-empty");
            assert!(*last < 0x80);
            assert!(rest.iter().all(|b| *b >= 0x80));
        }

        let strat = (MINIMUM_TAG_VAL..=MAXIMUM_TAG_VAL, arb_wiretype());
        proptest!(|((field_number, wire_type) in strat)| test(field_number, wire_type))
    }
}
