//! Human readable rendering of messages, for diagnostics.
//!
//! Messages render as `{ "name": value, ... }` listing only present fields.
//! Strings are JSON string literals, bytes are base64 encoded and non-finite
//! floats are quoted as `"NaN"`, `"Infinity"` or `"-Infinity"`.

use std::fmt;

use base64::Engine;
use bytes::Bytes;

use crate::message::Message;

/// A value that can appear in a rendered message.
pub trait FieldValue {
    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

macro_rules! display_field_value {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    fmt::Display::fmt(self, f)
                }
            }
        )*
    };
}

display_field_value!(i32, i64, u32, u64, bool);

macro_rules! float_field_value {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    if self.is_nan() {
                        f.write_str("\"NaN\"")
                    } else if self.is_infinite() && self.is_sign_positive() {
                        f.write_str("\"Infinity\"")
                    } else if self.is_infinite() {
                        f.write_str("\"-Infinity\"")
                    } else {
                        fmt::Display::fmt(self, f)
                    }
                }
            }
        )*
    };
}

float_field_value!(f32, f64);

impl FieldValue for str {
    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quoted = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&quoted)
    }
}

impl FieldValue for Bytes {
    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = base64::engine::general_purpose::STANDARD.encode(self);
        write!(f, "\"{encoded}\"")
    }
}

impl<M: Message> FieldValue for M {
    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_message(self, f)
    }
}

/// Collects the fields of one message while it is rendered.
pub struct FieldPrinter<'a, 'b> {
    f: &'a mut fmt::Formatter<'b>,
    empty: bool,
}

impl FieldPrinter<'_, '_> {
    /// Writes `"name": value` if `present`.
    pub fn field<V: FieldValue + ?Sized>(
        &mut self,
        name: &str,
        present: bool,
        value: &V,
    ) -> fmt::Result {
        if !present {
            return Ok(());
        }
        let separator = if self.empty { " " } else { ", " };
        self.empty = false;
        write!(self.f, "{separator}\"{name}\": ")?;
        value.fmt_value(self.f)
    }

    fn finish(self) -> fmt::Result {
        self.f.write_str(" }")
    }
}

/// Renders `message`; generated `Display` impls call this.
pub fn write_message<M: Message>(message: &M, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("{")?;
    let mut printer = FieldPrinter { f, empty: true };
    message.print_fields(&mut printer)?;
    printer.finish()
}
