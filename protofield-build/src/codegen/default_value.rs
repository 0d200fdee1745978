//! Translating a field's text-form default value into a Rust expression.

use proc_macro2::{Literal, TokenStream};
use quote::quote;

use crate::Error;

use super::types::ScalarType;

/// Returns the constant expression for the default of a scalar field.
///
/// `value` is the descriptor's `default_value`; `None` means the type's
/// zero value. Bytes defaults come back as a byte string literal for use
/// with `Bytes::from_static`.
pub fn default_value(
    field: &str,
    scalar: ScalarType,
    value: Option<&str>,
) -> Result<TokenStream, Error> {
    let invalid = || Error::InvalidDefault {
        field: field.to_string(),
        value: value.unwrap_or_default().to_string(),
    };

    let tokens = match (scalar, value) {
        (ScalarType::String, value) => {
            let lit = Literal::string(value.unwrap_or_default());
            quote!(#lit)
        }
        (ScalarType::Bytes, value) => {
            let bytes = unescape_c_bytes(value.unwrap_or_default()).ok_or_else(invalid)?;
            let lit = Literal::byte_string(&bytes);
            quote!(#lit)
        }
        (ScalarType::Bool, None) => quote!(false),
        (ScalarType::Bool, Some("true")) => quote!(true),
        (ScalarType::Bool, Some("false")) => quote!(false),
        (ScalarType::Bool, Some(_)) => return Err(invalid()),
        (ScalarType::Double, value) => float_literal(value, quote!(f64), |s| {
            let v = s.parse::<f64>().ok().filter(|v| v.is_finite())?;
            Some((v.is_sign_negative(), Literal::f64_unsuffixed(v.abs())))
        })
        .ok_or_else(invalid)?,
        (ScalarType::Float, value) => float_literal(value, quote!(f32), |s| {
            let v = s.parse::<f32>().ok().filter(|v| v.is_finite())?;
            Some((v.is_sign_negative(), Literal::f32_unsuffixed(v.abs())))
        })
        .ok_or_else(invalid)?,
        (ScalarType::Int32 | ScalarType::Sint32 | ScalarType::Sfixed32, value) => {
            let v: i32 = value.unwrap_or("0").parse().map_err(|_| invalid())?;
            signed_literal(v < 0, Literal::u32_unsuffixed(v.unsigned_abs()))
        }
        (ScalarType::Int64 | ScalarType::Sint64 | ScalarType::Sfixed64, value) => {
            let v: i64 = value.unwrap_or("0").parse().map_err(|_| invalid())?;
            signed_literal(v < 0, Literal::u64_unsuffixed(v.unsigned_abs()))
        }
        (ScalarType::Uint32 | ScalarType::Fixed32, value) => {
            let v: u32 = value.unwrap_or("0").parse().map_err(|_| invalid())?;
            let lit = Literal::u32_unsuffixed(v);
            quote!(#lit)
        }
        (ScalarType::Uint64 | ScalarType::Fixed64, value) => {
            let v: u64 = value.unwrap_or("0").parse().map_err(|_| invalid())?;
            let lit = Literal::u64_unsuffixed(v);
            quote!(#lit)
        }
    };

    Ok(tokens)
}

fn signed_literal(negative: bool, magnitude: Literal) -> TokenStream {
    if negative {
        quote!(-#magnitude)
    } else {
        quote!(#magnitude)
    }
}

/// protoc spells non-finite defaults `inf`, `-inf` and `nan`. `finite` parses
/// anything else into a sign and magnitude.
fn float_literal(
    value: Option<&str>,
    ty: TokenStream,
    finite: impl Fn(&str) -> Option<(bool, Literal)>,
) -> Option<TokenStream> {
    let tokens = match value.unwrap_or("0") {
        "inf" => quote!(#ty::INFINITY),
        "-inf" => quote!(#ty::NEG_INFINITY),
        "nan" => quote!(#ty::NAN),
        other => {
            let (negative, magnitude) = finite(other)?;
            signed_literal(negative, magnitude)
        }
    };
    Some(tokens)
}

/// Undoes the C-style escaping protoc applies to bytes defaults.
///
/// Returns `None` for a malformed escape sequence.
pub fn unescape_c_bytes(s: &str) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(s.len());
    let mut bytes = s.bytes().peekable();

    while let Some(b) = bytes.next() {
        if b != b'\\' {
            out.push(b);
            continue;
        }

        let escaped = match bytes.next()? {
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'a' => 0x07,
            b'b' => 0x08,
            b'f' => 0x0C,
            b'v' => 0x0B,
            b'\\' => b'\\',
            b'\'' => b'\'',
            b'"' => b'"',
            b'?' => b'?',
            b'x' | b'X' => {
                let mut value = 0u8;
                let mut digits = 0;
                while digits < 2 {
                    let Some(digit) = bytes.peek().and_then(|c| char::from(*c).to_digit(16))
                    else {
                        break;
                    };
                    value = value * 16 + u8::try_from(digit).ok()?;
                    bytes.next();
                    digits += 1;
                }
                if digits == 0 {
                    return None;
                }
                value
            }
            first @ b'0'..=b'7' => {
                let mut value = u32::from(first - b'0');
                for _ in 0..2 {
                    match bytes.peek() {
                        Some(c @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(c - b'0');
                            bytes.next();
                        }
                        _ => break,
                    }
                }
                u8::try_from(value).ok()?
            }
            _ => return None,
        };
        out.push(escaped);
    }

    Some(out)
}
