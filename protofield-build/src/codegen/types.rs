//! Scalar field types and how each maps onto Rust and the runtime codec.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::Ident;

use protofield::wire::WireType;

use crate::descriptor::Type;

/// A protobuf scalar type supported by the primitive field generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Double,
    Float,
    Int64,
    Uint64,
    Int32,
    Fixed64,
    Fixed32,
    Bool,
    String,
    Bytes,
    Uint32,
    Sfixed32,
    Sfixed64,
    Sint32,
    Sint64,
}

/// How a scalar is stored and handed out by accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    /// Stored and returned by value.
    Copy,
    /// Stored as `String`, returned as `&str`.
    Str,
    /// Stored as `Bytes`, returned as `&Bytes`.
    Bytes,
}

/// Floating point types compare and hash by bit pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatWidth {
    F32,
    F64,
}

impl ScalarType {
    /// Returns `None` for groups, messages and enums.
    pub fn from_type(ty: Type) -> Option<ScalarType> {
        let scalar = match ty {
            Type::Double => ScalarType::Double,
            Type::Float => ScalarType::Float,
            Type::Int64 => ScalarType::Int64,
            Type::Uint64 => ScalarType::Uint64,
            Type::Int32 => ScalarType::Int32,
            Type::Fixed64 => ScalarType::Fixed64,
            Type::Fixed32 => ScalarType::Fixed32,
            Type::Bool => ScalarType::Bool,
            Type::String => ScalarType::String,
            Type::Bytes => ScalarType::Bytes,
            Type::Uint32 => ScalarType::Uint32,
            Type::Sfixed32 => ScalarType::Sfixed32,
            Type::Sfixed64 => ScalarType::Sfixed64,
            Type::Sint32 => ScalarType::Sint32,
            Type::Sint64 => ScalarType::Sint64,
            Type::Group | Type::Message | Type::Enum => return None,
        };
        Some(scalar)
    }

    pub fn wire_type(self) -> WireType {
        match self {
            ScalarType::Double | ScalarType::Fixed64 | ScalarType::Sfixed64 => WireType::I64,
            ScalarType::Float | ScalarType::Fixed32 | ScalarType::Sfixed32 => WireType::I32,
            ScalarType::String | ScalarType::Bytes => WireType::Len,
            ScalarType::Int64
            | ScalarType::Uint64
            | ScalarType::Int32
            | ScalarType::Uint32
            | ScalarType::Sint32
            | ScalarType::Sint64
            | ScalarType::Bool => WireType::Varint,
        }
    }

    /// The name shared by the runtime's `read_*`, `write_*` and
    /// `compute_*_size` functions.
    fn codec_name(self) -> &'static str {
        match self {
            ScalarType::Double => "double",
            ScalarType::Float => "float",
            ScalarType::Int64 => "int64",
            ScalarType::Uint64 => "uint64",
            ScalarType::Int32 => "int32",
            ScalarType::Fixed64 => "fixed64",
            ScalarType::Fixed32 => "fixed32",
            ScalarType::Bool => "bool",
            ScalarType::String => "string",
            ScalarType::Bytes => "bytes",
            ScalarType::Uint32 => "uint32",
            ScalarType::Sfixed32 => "sfixed32",
            ScalarType::Sfixed64 => "sfixed64",
            ScalarType::Sint32 => "sint32",
            ScalarType::Sint64 => "sint64",
        }
    }

    pub fn read_method(self) -> Ident {
        format_ident!("read_{}", self.codec_name())
    }

    pub fn write_method(self) -> Ident {
        format_ident!("write_{}", self.codec_name())
    }

    /// Runtime function computing the encoded size of a variable width value.
    pub fn size_function(self) -> Ident {
        format_ident!("compute_{}_size", self.codec_name())
    }

    /// Encoded size of the value, for types whose size doesn't depend on it.
    pub fn fixed_size(self) -> Option<usize> {
        match self {
            ScalarType::Bool => Some(1),
            other => other.wire_type().fixed_size(),
        }
    }

    pub fn representation(self) -> Representation {
        match self {
            ScalarType::String => Representation::Str,
            ScalarType::Bytes => Representation::Bytes,
            _ => Representation::Copy,
        }
    }

    pub fn float_width(self) -> Option<FloatWidth> {
        match self {
            ScalarType::Float => Some(FloatWidth::F32),
            ScalarType::Double => Some(FloatWidth::F64),
            _ => None,
        }
    }

    /// The owned type held in storage.
    pub fn rust_type(self) -> TokenStream {
        match self {
            ScalarType::Double => quote!(f64),
            ScalarType::Float => quote!(f32),
            ScalarType::Int64 | ScalarType::Sfixed64 | ScalarType::Sint64 => quote!(i64),
            ScalarType::Uint64 | ScalarType::Fixed64 => quote!(u64),
            ScalarType::Int32 | ScalarType::Sfixed32 | ScalarType::Sint32 => quote!(i32),
            ScalarType::Uint32 | ScalarType::Fixed32 => quote!(u32),
            ScalarType::Bool => quote!(bool),
            ScalarType::String => quote!(::std::string::String),
            ScalarType::Bytes => quote!(::protofield::bytes::Bytes),
        }
    }

    /// The type returned by the getter.
    pub fn getter_type(self) -> TokenStream {
        match self.representation() {
            Representation::Copy => self.rust_type(),
            Representation::Str => quote!(&str),
            Representation::Bytes => quote!(&::protofield::bytes::Bytes),
        }
    }
}
