//! Writing protobuf wire data, and computing how much of it there will be.

use bytes::BufMut;

use crate::leb128::LebCodec;
use crate::message::Message;
use crate::wire::{WireType, encode_key};

/// Sink for an encoded message.
///
/// Tags are usually written with [`CodedOutput::write_raw_tag`] using bytes
/// computed at generation time, followed by one of the `write_*` methods.
#[derive(Debug)]
pub struct CodedOutput<B> {
    buf: B,
}

impl<B: BufMut> CodedOutput<B> {
    pub fn new(buf: B) -> Self {
        CodedOutput { buf }
    }

    pub fn into_inner(self) -> B {
        self.buf
    }

    /// Writes an already encoded tag.
    #[inline]
    pub fn write_raw_tag(&mut self, tag: &[u8]) {
        self.buf.put_slice(tag);
    }

    #[inline]
    pub fn write_tag(&mut self, field_number: u32, wire_type: WireType) {
        encode_key(wire_type, field_number, &mut self.buf);
    }

    pub fn write_double(&mut self, value: f64) {
        self.buf.put_f64_le(value);
    }

    pub fn write_float(&mut self, value: f32) {
        self.buf.put_f32_le(value);
    }

    /// Negative values are sign-extended and always take ten bytes.
    #[allow(clippy::as_conversions)]
    pub fn write_int32(&mut self, value: i32) {
        (i64::from(value) as u64).encode_leb128(&mut self.buf);
    }

    #[allow(clippy::as_conversions)]
    pub fn write_int64(&mut self, value: i64) {
        (value as u64).encode_leb128(&mut self.buf);
    }

    pub fn write_uint32(&mut self, value: u32) {
        value.encode_leb128(&mut self.buf);
    }

    pub fn write_uint64(&mut self, value: u64) {
        value.encode_leb128(&mut self.buf);
    }

    pub fn write_sint32(&mut self, value: i32) {
        zigzag32(value).encode_leb128(&mut self.buf);
    }

    pub fn write_sint64(&mut self, value: i64) {
        zigzag64(value).encode_leb128(&mut self.buf);
    }

    pub fn write_fixed32(&mut self, value: u32) {
        self.buf.put_u32_le(value);
    }

    pub fn write_fixed64(&mut self, value: u64) {
        self.buf.put_u64_le(value);
    }

    pub fn write_sfixed32(&mut self, value: i32) {
        self.buf.put_i32_le(value);
    }

    pub fn write_sfixed64(&mut self, value: i64) {
        self.buf.put_i64_le(value);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.put_u8(u8::from(value));
    }

    pub fn write_string(&mut self, value: &str) {
        self.write_bytes(value.as_bytes());
    }

    pub fn write_bytes(&mut self, value: &[u8]) {
        write_length(value.len(), &mut self.buf);
        self.buf.put_slice(value);
    }

    /// Writes the fields of a group-encoded message.
    ///
    /// The caller writes the start and end tags around it.
    pub fn write_group<M: Message>(&mut self, message: &M) {
        message.write_to(self);
    }
}

#[allow(clippy::as_conversions)]
fn write_length<B: BufMut>(len: usize, buf: &mut B) {
    (len as u64).encode_leb128(buf);
}

#[allow(clippy::as_conversions)]
fn zigzag32(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

#[allow(clippy::as_conversions)]
fn zigzag64(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

pub fn compute_int32_size(value: i32) -> usize {
    match u32::try_from(value) {
        Ok(value) => value.encoded_leb128_len(),
        Err(_) => u64::MAX_LEB_BYTES,
    }
}

#[allow(clippy::as_conversions)]
pub fn compute_int64_size(value: i64) -> usize {
    (value as u64).encoded_leb128_len()
}

pub fn compute_uint32_size(value: u32) -> usize {
    value.encoded_leb128_len()
}

pub fn compute_uint64_size(value: u64) -> usize {
    value.encoded_leb128_len()
}

pub fn compute_sint32_size(value: i32) -> usize {
    zigzag32(value).encoded_leb128_len()
}

pub fn compute_sint64_size(value: i64) -> usize {
    zigzag64(value).encoded_leb128_len()
}

/// Size of a length prefix for a payload of `len` bytes.
#[allow(clippy::as_conversions)]
pub fn compute_length_size(len: usize) -> usize {
    (len as u64).encoded_leb128_len()
}

pub fn compute_string_size(value: &str) -> usize {
    compute_bytes_size(value.as_bytes())
}

pub fn compute_bytes_size(value: &[u8]) -> usize {
    compute_length_size(value.len()) + value.len()
}

/// Size of a group's fields, excluding its start and end tags.
pub fn compute_group_size<M: Message>(message: &M) -> usize {
    message.calculate_size()
}
