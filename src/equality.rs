//! Bitwise equality and hashing for floating point fields.
//!
//! Two float fields are equal only if their bit patterns are. This makes
//! `NaN` equal to itself, distinguishes NaN payloads and tells `0.0` apart
//! from `-0.0`, so messages can implement [`Eq`] and [`Hash`] consistently.

use std::hash::Hasher;

#[inline]
pub fn bitwise_eq_f64(a: f64, b: f64) -> bool {
    a.to_bits() == b.to_bits()
}

#[inline]
pub fn bitwise_eq_f32(a: f32, b: f32) -> bool {
    a.to_bits() == b.to_bits()
}

#[inline]
pub fn bitwise_hash_f64<H: Hasher>(value: f64, state: &mut H) {
    state.write_u64(value.to_bits());
}

#[inline]
pub fn bitwise_hash_f32<H: Hasher>(value: f32, state: &mut H) {
    state.write_u32(value.to_bits());
}
