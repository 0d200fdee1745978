//! Errors produced while decoding protobuf wire data.

/// Error returned when an encoded message cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("unexpected end of buffer")]
    UnexpectedEndOfBuffer,
    #[error("invalid leb128 varint")]
    InvalidVarint,
    #[error("invalid 'wire type' value: {value}")]
    InvalidWireType { value: u8 },
    #[error("invalid tag: {tag}")]
    InvalidTag { tag: u32 },
    #[error("invalid UTF-8 in string field")]
    InvalidUtf8,
    #[error("length prefix {value} exceeds platform addressable memory")]
    LengthOverflow { value: u64 },
    #[error("group ended with tag {actual}, expected {expected}")]
    MismatchedEndGroup { expected: u32, actual: u32 },
    #[error("end-group tag for field {field_number} outside of a group")]
    UnexpectedEndGroup { field_number: u32 },
    #[error("input ended inside group for field {field_number}")]
    TruncatedGroup { field_number: u32 },
    #[error("message nesting exceeds recursion limit of {limit}")]
    RecursionLimitExceeded { limit: u32 },
    #[error("message is missing required fields")]
    UninitializedMessage,
}
