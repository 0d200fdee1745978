use std::fmt;

use bytes::{Buf, BufMut};

use crate::display::FieldPrinter;
use crate::error::DecodeError;
use crate::input::CodedInput;
use crate::output::CodedOutput;
use crate::wire::tag_field_number;

/// A generated protobuf message.
///
/// Every method besides the provided ones is emitted by `protofield-build`,
/// one fragment per field.
pub trait Message: Default + Clone + PartialEq + fmt::Debug {
    /// Reads fields until the end of input or an end-group tag, merging each
    /// into `self`.
    fn merge_from_input<B: Buf>(&mut self, input: &mut CodedInput<B>) -> Result<(), DecodeError>;

    /// Writes every present field in field number order.
    fn write_to<B: BufMut>(&self, output: &mut CodedOutput<B>);

    /// Number of bytes [`Message::write_to`] will write.
    fn calculate_size(&self) -> usize;

    /// Merges the present fields of `other` into `self`. Nested messages are
    /// merged recursively, everything else is overwritten.
    fn merge_from(&mut self, other: &Self);

    /// Returns `false` if a required field, directly or in a nested message,
    /// is missing.
    fn is_initialized(&self) -> bool;

    fn print_fields(&self, printer: &mut FieldPrinter<'_, '_>) -> fmt::Result;

    fn encode_to_vec(&self) -> Vec<u8> {
        let mut output = CodedOutput::new(Vec::with_capacity(self.calculate_size()));
        self.write_to(&mut output);
        output.into_inner()
    }

    /// Merges a complete encoded message into `self`.
    fn merge_from_bytes<B: Buf>(&mut self, buf: B) -> Result<(), DecodeError> {
        let mut input = CodedInput::new(buf);
        self.merge_from_input(&mut input)?;
        match input.last_tag() {
            0 => Ok(()),
            tag => Err(DecodeError::UnexpectedEndGroup {
                field_number: tag_field_number(tag),
            }),
        }
    }

    /// Decodes a complete message, requiring every required field be set.
    fn decode<B: Buf>(buf: B) -> Result<Self, DecodeError> {
        let mut message = Self::default();
        message.merge_from_bytes(buf)?;
        if !message.is_initialized() {
            return Err(DecodeError::UninitializedMessage);
        }
        Ok(message)
    }
}


#[cfg(test)]
mod tests {
    use super::Message;
    use super::testing::Node;

    #[test]
    fn test_merge_is_additive_for_groups() {
        let mut dest = Node::nested(1);
        let mut source = Node::default();
        source.child = Some(Box::new(Node {
            value: None,
            child: Some(Box::default()),
        }));

        dest.merge_from(&source);
        let child = dest.child.as_deref().unwrap();
        assert_eq!(child.value, Some(1));
        assert!(child.child.is_some());
    }

    #[test]
    fn test_merge_from_bytes_accumulates() {
        let mut node = Node::default();
        node.merge_from_bytes(&[0x08u8, 0x03][..]).unwrap();
        node.merge_from_bytes(&[0x13u8, 0x08, 0x07, 0x14][..]).unwrap();
        assert_eq!(node.value, Some(3));
        assert_eq!(node.child.as_ref().and_then(|c| c.value), Some(7));
    }
}
