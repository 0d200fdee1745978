//! The names and fragments a field generator substitutes into its output.
//!
//! A [`FieldContext`] is built once per field and never changes afterwards.
//! Fields that belong to a oneof wrap it in a [`OneofFieldContext`], which
//! swaps the presence checks for discriminant comparisons and adds the
//! names of the shared slot.

use proc_macro2::{Literal, TokenStream};
use quote::{format_ident, quote};
use syn::Ident;
use tracing::trace;

use protofield::wire::{MAXIMUM_TAG_VAL, MINIMUM_TAG_VAL, RESERVED_TAG_RANGE};

use crate::Error;
use crate::context::{GenerationContext, TypeInfo, to_rust_field_name, to_snake_case, to_upper_snake_case};
use crate::descriptor::{FieldDescriptorProto, Label, Type};
use crate::tag::{GroupTags, Tag};

use super::default_value::default_value;
use super::types::{Representation, ScalarType};

/// Where the message owning a field lives.
pub struct MessageScope<'a> {
    pub ctx: &'a GenerationContext,
    /// Fully-qualified proto name of the message, e.g. `.pkg.Envelope`.
    pub proto_path: String,
    /// Name of the message's companion module, e.g. `envelope`.
    pub companion: Ident,
    /// Number of modules between the root of the generated file and the
    /// message.
    pub depth: usize,
}

/// A scalar field's type and default.
#[derive(Debug, Clone)]
pub struct ScalarValue {
    pub scalar: ScalarType,
    /// Constant expression; a byte string literal for `bytes`.
    pub default: TokenStream,
}

/// A group field's message type and closing tag.
#[derive(Debug, Clone)]
pub struct GroupValue {
    pub message: TypeInfo,
    /// Path to the group's type from the owning message's module.
    pub type_path: TokenStream,
    pub end_tag: Tag,
}

#[derive(Debug, Clone)]
pub enum ValueKind {
    Scalar(ScalarValue),
    Group(GroupValue),
}

#[derive(Debug, Clone)]
pub struct FieldContext {
    /// Name as declared in the schema, used when printing.
    pub proto_name: String,
    pub number: u32,
    pub required: bool,
    /// Struct field and getter, e.g. `ratio`.
    pub storage: Ident,
    pub setter: Ident,
    pub has: Ident,
    pub clear: Ident,
    /// Construct-if-absent accessor of group fields.
    pub mutable: Ident,
    pub number_const: Ident,
    pub default_const: Ident,
    pub companion: Ident,
    pub depth: usize,
    pub value: ValueKind,
    /// The only tag of a scalar field, the start tag of a group.
    pub tag: Tag,
    /// Expression that is `true` when `self` holds an explicit value.
    pub has_property_check: TokenStream,
    /// Same as `has_property_check`, evaluated on the merge source `other`.
    pub other_has_property_check: TokenStream,
}

impl FieldContext {
    pub fn new(scope: &MessageScope<'_>, field: &FieldDescriptorProto) -> Result<Self, Error> {
        let proto_name = field.name.clone().ok_or(Error::MissingName)?;
        let number = validate_field_number(&proto_name, field.number)?;

        let raw_type = field.r#type.unwrap_or(-1);
        let field_type = field.field_type().ok_or(Error::InvalidFieldType(raw_type))?;

        let label = match field.label {
            None => Label::Optional,
            Some(raw) => Label::from_i32(raw).ok_or(Error::InvalidLabel(raw))?,
        };
        if label == Label::Repeated {
            return Err(Error::UnsupportedField {
                field: proto_name,
                reason: "repeated fields are not supported",
            });
        }

        let (value, tag) = match field_type {
            Type::Group => {
                let type_name = field.type_name.as_deref().unwrap_or_default();
                let message = scope
                    .ctx
                    .resolve_type(&scope.proto_path, type_name)
                    .cloned()
                    .ok_or_else(|| Error::UnresolvedType {
                        field: proto_name.clone(),
                        type_name: type_name.to_string(),
                    })?;
                trace!(
                    field = %proto_name,
                    type_name,
                    file = %message.file_name,
                    "resolved group type"
                );
                let tags = GroupTags::new(number);
                let value = ValueKind::Group(GroupValue {
                    type_path: message.path_at_depth(scope.depth),
                    message,
                    end_tag: tags.end,
                });
                (value, tags.start)
            }
            Type::Message => {
                return Err(Error::UnsupportedField {
                    field: proto_name,
                    reason: "message fields are not supported",
                });
            }
            Type::Enum => {
                return Err(Error::UnsupportedField {
                    field: proto_name,
                    reason: "enum fields are not supported",
                });
            }
            scalar_type => {
                let scalar = ScalarType::from_type(scalar_type)
                    .ok_or(Error::InvalidFieldType(raw_type))?;
                let default = default_value(&proto_name, scalar, field.default_value.as_deref())?;
                let tag = Tag::new(number, scalar.wire_type());
                (ValueKind::Scalar(ScalarValue { scalar, default }), tag)
            }
        };

        let snake = to_snake_case(&proto_name);
        let upper = to_upper_snake_case(&proto_name);
        let storage = format_ident!("{}", to_rust_field_name(&proto_name));
        let has = format_ident!("has_{}", snake);

        Ok(FieldContext {
            number,
            required: label == Label::Required,
            setter: format_ident!("set_{}", snake),
            clear: format_ident!("clear_{}", snake),
            mutable: format_ident!("{}_mut", snake),
            number_const: format_ident!("{}_FIELD_NUMBER", upper),
            default_const: format_ident!("{}_DEFAULT", upper),
            companion: scope.companion.clone(),
            depth: scope.depth,
            value,
            tag,
            has_property_check: quote!(self.#has()),
            other_has_property_check: quote!(other.#has()),
            has,
            storage,
            proto_name,
        })
    }

    /// `receiver.field()`.
    pub fn getter_call(&self, receiver: &TokenStream) -> TokenStream {
        let storage = &self.storage;
        quote!(#receiver.#storage())
    }

    /// A reference to the current value, for APIs taking `&T`.
    pub fn value_ref(&self, receiver: &TokenStream) -> TokenStream {
        let getter = self.getter_call(receiver);
        match &self.value {
            ValueKind::Scalar(value) if value.scalar.representation() == Representation::Copy => {
                quote!(&#getter)
            }
            _ => getter,
        }
    }

    /// The current value in the form the setter accepts.
    pub fn value_for_setter(&self, receiver: &TokenStream) -> TokenStream {
        let getter = self.getter_call(receiver);
        match &self.value {
            ValueKind::Scalar(value) if value.scalar.representation() != Representation::Bytes => {
                getter
            }
            _ => quote!(::core::clone::Clone::clone(#getter)),
        }
    }

    /// Type of this field's variant in a oneof slot enum, which sits one
    /// module below the message.
    pub fn slot_type(&self) -> TokenStream {
        match &self.value {
            ValueKind::Scalar(value) => value.scalar.rust_type(),
            ValueKind::Group(group) => {
                let path = group.message.path_at_depth(self.depth + 1);
                quote!(::std::boxed::Box<#path>)
            }
        }
    }

    pub fn name_literal(&self) -> Literal {
        Literal::string(&self.proto_name)
    }

    pub fn number_literal(&self) -> Literal {
        Literal::u32_unsuffixed(self.number)
    }
}

/// The discriminated slot shared by the members of one oneof.
#[derive(Debug, Clone)]
pub struct OneofScope {
    pub proto_name: String,
    /// Struct field holding the slot, e.g. `body`.
    pub storage: Ident,
    /// Discriminant accessor, e.g. `body_case`.
    pub case_accessor: Ident,
    pub clear: Ident,
    /// Slot enum name inside the companion module, e.g. `Body`.
    pub slot_ident: Ident,
    /// Case enum name inside the companion module, e.g. `BodyCase`.
    pub case_ident: Ident,
    /// `envelope::Body`, from the message's module.
    pub slot_type: TokenStream,
    /// `envelope::BodyCase`, from the message's module.
    pub case_type: TokenStream,
}

impl OneofScope {
    pub fn case_none(&self) -> TokenStream {
        let case_type = &self.case_type;
        quote!(#case_type::None)
    }
}

#[derive(Debug, Clone)]
pub struct OneofFieldContext {
    pub base: FieldContext,
    pub oneof: OneofScope,
    /// Variant name shared by the slot and case enums, e.g. `Code`.
    pub variant: Ident,
    /// `envelope::Body::Code`.
    pub slot_variant: TokenStream,
    /// `envelope::BodyCase::Code`.
    pub case_value: TokenStream,
}

impl OneofFieldContext {
    pub fn new(mut base: FieldContext, oneof: &OneofScope, variant: Ident) -> Self {
        let slot_type = &oneof.slot_type;
        let case_type = &oneof.case_type;
        let case_accessor = &oneof.case_accessor;

        let slot_variant = quote!(#slot_type::#variant);
        let case_value = quote!(#case_type::#variant);
        base.has_property_check = quote!(self.#case_accessor() == #case_value);
        base.other_has_property_check = quote!(other.#case_accessor() == #case_value);

        OneofFieldContext {
            base,
            oneof: oneof.clone(),
            variant,
            slot_variant,
            case_value,
        }
    }
}

/// Field numbers must be in range and outside the block reserved for the
/// protobuf implementation.
fn validate_field_number(field: &str, number: Option<i32>) -> Result<u32, Error> {
    let number = number.ok_or_else(|| Error::MissingFieldNumber(field.to_string()))?;
    match u32::try_from(number) {
        Ok(n) if (MINIMUM_TAG_VAL..=MAXIMUM_TAG_VAL).contains(&n) && !RESERVED_TAG_RANGE.contains(&n) => {
            Ok(n)
        }
        _ => Err(Error::InvalidFieldNumber {
            field: field.to_string(),
            number,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{DescriptorProto, FileDescriptorProto};

    fn generation_context() -> GenerationContext {
        let file = FileDescriptorProto::new("envelope.proto")
            .with_package("conformance")
            .with_message(DescriptorProto::new("Envelope").with_nested(DescriptorProto::new("Header")));
        GenerationContext::new(&file)
    }

    fn scope(ctx: &GenerationContext) -> MessageScope<'_> {
        MessageScope {
            ctx,
            proto_path: ".conformance.Envelope".to_string(),
            companion: format_ident!("envelope"),
            depth: 0,
        }
    }

    #[test]
    fn test_scalar_context() {
        let ctx = generation_context();
        let field = FieldDescriptorProto::new("displayName", 5, Type::String).with_default("unnamed");
        let field = FieldContext::new(&scope(&ctx), &field).unwrap();

        assert_eq!(field.storage, "display_name");
        assert_eq!(field.setter, "set_display_name");
        assert_eq!(field.has, "has_display_name");
        assert_eq!(field.number_const, "DISPLAY_NAME_FIELD_NUMBER");
        assert_eq!(field.default_const, "DISPLAY_NAME_DEFAULT");
        assert_eq!(field.tag.bytes(), [0x2A]);
        assert_eq!(
            field.has_property_check.to_string(),
            quote!(self.has_display_name()).to_string()
        );
        assert_eq!(
            field.other_has_property_check.to_string(),
            quote!(other.has_display_name()).to_string()
        );
        assert_eq!(
            field.value_ref(&quote!(self)).to_string(),
            quote!(self.display_name()).to_string()
        );
    }

    #[test]
    fn test_group_context() {
        let ctx = generation_context();
        let field = FieldDescriptorProto::group("header", 16, "Header");
        let field = FieldContext::new(&scope(&ctx), &field).unwrap();

        assert_eq!(field.tag.value(), 131);
        let ValueKind::Group(group) = &field.value else {
            panic!("expected a group");
        };
        assert_eq!(group.end_tag.value(), 132);
        assert_eq!(group.type_path.to_string(), quote!(envelope::Header).to_string());
        assert_eq!(
            field.slot_type().to_string(),
            quote!(::std::boxed::Box<super::envelope::Header>).to_string()
        );
    }

    #[test]
    fn test_oneof_context_replaces_presence() {
        let ctx = generation_context();
        let field = FieldDescriptorProto::new("code", 2, Type::Int32).in_oneof(0);
        let base = FieldContext::new(&scope(&ctx), &field).unwrap();
        let oneof = OneofScope {
            proto_name: "body".to_string(),
            storage: format_ident!("body"),
            case_accessor: format_ident!("body_case"),
            clear: format_ident!("clear_body"),
            slot_ident: format_ident!("Body"),
            case_ident: format_ident!("BodyCase"),
            slot_type: quote!(envelope::Body),
            case_type: quote!(envelope::BodyCase),
        };
        let member = OneofFieldContext::new(base.clone(), &oneof, format_ident!("Code"));

        assert_eq!(
            member.base.has_property_check.to_string(),
            quote!(self.body_case() == envelope::BodyCase::Code).to_string()
        );
        assert_eq!(
            member.slot_variant.to_string(),
            quote!(envelope::Body::Code).to_string()
        );
        // The wrapped context is otherwise untouched.
        assert_eq!(member.base.storage, base.storage);
        assert_eq!(member.base.tag, base.tag);
    }

    #[test]
    fn test_rejected_fields() {
        let ctx = generation_context();
        let scope = scope(&ctx);

        let err = FieldContext::new(&scope, &FieldDescriptorProto::new("zero", 0, Type::Int32));
        assert!(matches!(err, Err(Error::InvalidFieldNumber { number: 0, .. })));

        let reserved = FieldDescriptorProto::new("reserved", 19_500, Type::Int32);
        assert!(matches!(
            FieldContext::new(&scope, &reserved),
            Err(Error::InvalidFieldNumber { number: 19_500, .. })
        ));

        let too_big = FieldDescriptorProto::new("big", 1 << 29, Type::Int32);
        assert!(FieldContext::new(&scope, &too_big).is_err());

        let repeated = FieldDescriptorProto::new("items", 1, Type::Int32).with_label(Label::Repeated);
        assert!(matches!(
            FieldContext::new(&scope, &repeated),
            Err(Error::UnsupportedField { .. })
        ));

        let message = FieldDescriptorProto::new("child", 1, Type::Message);
        assert!(matches!(
            FieldContext::new(&scope, &message),
            Err(Error::UnsupportedField { .. })
        ));

        let unresolved = FieldDescriptorProto::group("meta", 3, "Meta");
        assert!(matches!(
            FieldContext::new(&scope, &unresolved),
            Err(Error::UnresolvedType { .. })
        ));

        let bad_label = FieldDescriptorProto {
            label: Some(7),
            ..FieldDescriptorProto::new("x", 1, Type::Int32)
        };
        assert!(matches!(
            FieldContext::new(&scope, &bad_label),
            Err(Error::InvalidLabel(7))
        ));
    }
}
