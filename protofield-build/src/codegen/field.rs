//! The contract every field encoding strategy implements, and the
//! fragments the strategies share.
//!
//! A strategy owns the substitution context of one field and emits Rust
//! source for each per-field operation of the generated message. The
//! message generator splices the fragments into fixed positions:
//!
//! | operation        | position                                              |
//! |------------------|-------------------------------------------------------|
//! | `declare_storage`| struct body, inherent `impl`, companion module        |
//! | `generate_parse` | match arm on the tag inside `merge_from_input`        |
//! | `generate_serialize` | `write_to`, in field-number order                 |
//! | `generate_size`  | `calculate_size`, adding to a local `size`            |
//! | `generate_merge` | `merge_from`, reading from `other`                    |
//! | `generate_clone` | `Clone::clone`, writing into a local `cloned`         |
//! | `generate_equality` | `PartialEq::eq`, returning `false` on a mismatch   |
//! | `generate_hash`  | `Hash::hash`, feeding `state`                         |
//! | `generate_display` | `print_fields`, writing through `printer`           |
//! | `generate_is_initialized` | `is_initialized`, returning `false` early    |
//!
//! Oneof members emit their merge and clone fragments as the body of a
//! match arm on the oneof's case.

use proc_macro2::{Literal, TokenStream};
use quote::quote;
use syn::Ident;
use tracing::trace;

use crate::tag::Tag;

use super::group::{GroupField, GroupOneofField};
use super::primitive::{PrimitiveField, PrimitiveOneofField};
use super::types::{FloatWidth, Representation, ScalarType};
use super::variables::{FieldContext, OneofFieldContext, OneofScope, ValueKind};

/// What a field adds to the declaration of its message.
#[derive(Default)]
pub struct FieldStorage {
    /// Struct field. Oneof members share their oneof's field instead.
    pub field: Option<TokenStream>,
    /// Associated constants and accessors.
    pub members: TokenStream,
    /// Items for the message's companion module.
    pub module_items: TokenStream,
}

pub trait FieldGenerator {
    fn context(&self) -> &FieldContext;

    /// `Some` for members of a oneof.
    fn oneof_member(&self) -> Option<&OneofFieldContext> {
        None
    }

    fn declare_storage(&self) -> FieldStorage;
    fn generate_parse(&self) -> TokenStream;
    fn generate_serialize(&self) -> TokenStream;
    fn generate_size(&self) -> TokenStream;
    fn generate_merge(&self) -> TokenStream;
    fn generate_clone(&self) -> TokenStream;
    fn generate_equality(&self) -> TokenStream;
    fn generate_hash(&self) -> TokenStream;
    fn generate_display(&self) -> TokenStream;
    fn generate_is_initialized(&self) -> TokenStream;
}

/// Selects the strategy for a field by its wire category and whether it
/// lives in a oneof.
pub fn create_field_generator(
    field: FieldContext,
    oneof: Option<(&OneofScope, Ident)>,
) -> Box<dyn FieldGenerator> {
    match (field.value.clone(), oneof) {
        (ValueKind::Scalar(value), None) => {
            trace!(field = %field.proto_name, strategy = "primitive", "selected field generator");
            Box::new(PrimitiveField::new(field, value))
        }
        (ValueKind::Scalar(value), Some((scope, variant))) => {
            trace!(field = %field.proto_name, strategy = "primitive oneof", "selected field generator");
            Box::new(PrimitiveOneofField::new(
                OneofFieldContext::new(field, scope, variant),
                value,
            ))
        }
        (ValueKind::Group(value), None) => {
            trace!(field = %field.proto_name, strategy = "group", "selected field generator");
            Box::new(GroupField::new(field, value))
        }
        (ValueKind::Group(value), Some((scope, variant))) => {
            trace!(field = %field.proto_name, strategy = "group oneof", "selected field generator");
            Box::new(GroupOneofField::new(
                OneofFieldContext::new(field, scope, variant),
                value,
            ))
        }
    }
}

/// `&[0x83, 0x01]`, for `CodedOutput::write_raw_tag`.
pub fn tag_bytes(tag: &Tag) -> TokenStream {
    let bytes = tag.bytes().iter().map(|b| Literal::u8_unsuffixed(*b));
    quote!(&[#(#bytes),*])
}

pub fn tag_size(tag: &Tag) -> Literal {
    Literal::usize_unsuffixed(tag.size())
}

pub fn number_const(ctx: &FieldContext) -> TokenStream {
    let name = &ctx.number_const;
    let number = ctx.number_literal();
    quote! {
        pub const #name: u32 = #number;
    }
}

/// The default constant of a scalar field.
///
/// Bytes can't be built in a `const`, so their default is a `static` in the
/// companion module and the returned member tokens are empty.
pub fn default_const(ctx: &FieldContext, scalar: ScalarType, default: &TokenStream) -> FieldStorage {
    let name = &ctx.default_const;
    match scalar.representation() {
        Representation::Copy => {
            let ty = scalar.rust_type();
            FieldStorage {
                members: quote!(pub const #name: #ty = #default;),
                ..Default::default()
            }
        }
        Representation::Str => FieldStorage {
            members: quote!(pub const #name: &'static str = #default;),
            ..Default::default()
        },
        Representation::Bytes => FieldStorage {
            module_items: quote! {
                pub static #name: ::protofield::bytes::Bytes =
                    ::protofield::bytes::Bytes::from_static(#default);
            },
            ..Default::default()
        },
    }
}

/// `if present { write tag; write value; }`.
pub fn scalar_serialize(ctx: &FieldContext, scalar: ScalarType) -> TokenStream {
    let has = &ctx.has_property_check;
    let tag = tag_bytes(&ctx.tag);
    let write = scalar.write_method();
    let value = ctx.getter_call(&quote!(self));
    quote! {
        if #has {
            output.write_raw_tag(#tag);
            output.#write(#value);
        }
    }
}

pub fn scalar_size(ctx: &FieldContext, scalar: ScalarType) -> TokenStream {
    let has = &ctx.has_property_check;
    let tag_size = tag_size(&ctx.tag);
    let value_size = match scalar.fixed_size() {
        Some(width) => {
            let width = Literal::usize_unsuffixed(width);
            quote!(#width)
        }
        None => {
            let compute = scalar.size_function();
            let value = ctx.getter_call(&quote!(self));
            quote!(::protofield::#compute(#value))
        }
    };
    quote! {
        if #has {
            size += #tag_size + #value_size;
        }
    }
}

/// Expression that is `true` when `self` and `other` hold different values.
/// Floats compare by bit pattern.
pub fn values_differ(ctx: &FieldContext) -> TokenStream {
    let ours = ctx.getter_call(&quote!(self));
    let theirs = ctx.getter_call(&quote!(other));
    let float = match &ctx.value {
        ValueKind::Scalar(value) => value.scalar.float_width(),
        ValueKind::Group(_) => None,
    };
    match float {
        Some(FloatWidth::F64) => quote!(!::protofield::equality::bitwise_eq_f64(#ours, #theirs)),
        Some(FloatWidth::F32) => quote!(!::protofield::equality::bitwise_eq_f32(#ours, #theirs)),
        None => quote!(#ours != #theirs),
    }
}

pub fn hash_value(ctx: &FieldContext) -> TokenStream {
    let has = &ctx.has_property_check;
    let float = match &ctx.value {
        ValueKind::Scalar(value) => value.scalar.float_width(),
        ValueKind::Group(_) => None,
    };
    let value = ctx.getter_call(&quote!(self));
    let hash = match float {
        Some(FloatWidth::F64) => quote!(::protofield::equality::bitwise_hash_f64(#value, state);),
        Some(FloatWidth::F32) => quote!(::protofield::equality::bitwise_hash_f32(#value, state);),
        None => {
            let value = ctx.value_ref(&quote!(self));
            quote!(::core::hash::Hash::hash(#value, state);)
        }
    };
    quote! {
        if #has {
            #hash
        }
    }
}

pub fn display(ctx: &FieldContext) -> TokenStream {
    let name = ctx.name_literal();
    let has = &ctx.has_property_check;
    let value = ctx.value_ref(&quote!(self));
    quote! {
        printer.field(#name, #has, #value)?;
    }
}

/// A set required field must be present.
pub fn required_check(ctx: &FieldContext) -> TokenStream {
    if !ctx.required {
        return TokenStream::new();
    }
    let has = &ctx.has_property_check;
    quote! {
        if !#has {
            return false;
        }
    }
}
