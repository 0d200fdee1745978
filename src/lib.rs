//! Runtime support for protobuf messages generated by `protofield-build`.
//!
//! Generated code refers to this crate by absolute path, so everything it
//! calls is re-exported from the crate root.

#![deny(clippy::as_conversions)]

mod error;
mod input;
mod message;
mod output;

// Publically export `leb128` because the functions are useful on their own.
pub mod leb128;

pub mod display;
pub mod equality;
pub mod wire;

pub use bytes;

pub use crate::display::{FieldPrinter, FieldValue, write_message};
pub use crate::error::DecodeError;
pub use crate::input::{CodedInput, DEFAULT_RECURSION_LIMIT};
pub use crate::message::Message;
pub use crate::output::{
    CodedOutput, compute_bytes_size, compute_group_size, compute_int32_size, compute_int64_size,
    compute_length_size, compute_sint32_size, compute_sint64_size, compute_string_size,
    compute_uint32_size, compute_uint64_size,
};
