//! Group fields: a nested message bracketed by a start and an end tag
//! instead of being length-prefixed.

use proc_macro2::TokenStream;
use quote::quote;

use super::field::{self, FieldGenerator, FieldStorage};
use super::variables::{FieldContext, GroupValue, OneofFieldContext};

/// `if present { start tag; fields; end tag; }`.
fn serialize(ctx: &FieldContext, group: &GroupValue) -> TokenStream {
    let has = &ctx.has_property_check;
    let start = field::tag_bytes(&ctx.tag);
    let end = field::tag_bytes(&group.end_tag);
    let value = ctx.getter_call(&quote!(self));
    quote! {
        if #has {
            output.write_raw_tag(#start);
            output.write_group(#value);
            output.write_raw_tag(#end);
        }
    }
}

/// Both tags count towards the size, there is no length prefix.
fn size(ctx: &FieldContext, group: &GroupValue) -> TokenStream {
    let has = &ctx.has_property_check;
    let start = field::tag_size(&ctx.tag);
    let end = field::tag_size(&group.end_tag);
    let value = ctx.getter_call(&quote!(self));
    quote! {
        if #has {
            size += #start + #end + ::protofield::compute_group_size(#value);
        }
    }
}

fn is_initialized(ctx: &FieldContext) -> TokenStream {
    let required = field::required_check(ctx);
    let has = &ctx.has_property_check;
    let value = ctx.getter_call(&quote!(self));
    quote! {
        #required
        if #has && !::protofield::Message::is_initialized(#value) {
            return false;
        }
    }
}

/// A singular group, stored boxed so groups may nest themselves.
pub struct GroupField {
    ctx: FieldContext,
    group: GroupValue,
}

impl GroupField {
    pub fn new(ctx: FieldContext, group: GroupValue) -> Self {
        GroupField { ctx, group }
    }
}

impl FieldGenerator for GroupField {
    fn context(&self) -> &FieldContext {
        &self.ctx
    }

    fn declare_storage(&self) -> FieldStorage {
        let FieldContext {
            storage,
            setter,
            has,
            clear,
            mutable,
            ..
        } = &self.ctx;
        let ty = &self.group.type_path;
        let number_const = field::number_const(&self.ctx);

        FieldStorage {
            field: Some(quote!(#storage: ::core::option::Option<::std::boxed::Box<#ty>>,)),
            members: quote! {
                #number_const

                pub fn #storage(&self) -> &#ty {
                    match self.#storage.as_deref() {
                        ::core::option::Option::Some(value) => value,
                        ::core::option::Option::None => #ty::default_instance(),
                    }
                }

                /// Returns the group, setting it to an empty one first if absent.
                pub fn #mutable(&mut self) -> &mut #ty {
                    self.#storage.get_or_insert_with(::std::boxed::Box::default)
                }

                pub fn #setter(&mut self, value: #ty) {
                    self.#storage = ::core::option::Option::Some(::std::boxed::Box::new(value));
                }

                pub fn #has(&self) -> bool {
                    self.#storage.is_some()
                }

                pub fn #clear(&mut self) {
                    self.#storage = ::core::option::Option::None;
                }
            },
            module_items: TokenStream::new(),
        }
    }

    fn generate_parse(&self) -> TokenStream {
        let mutable = &self.ctx.mutable;
        let number = self.ctx.number_literal();
        quote! {
            input.read_group(#number, self.#mutable())?;
        }
    }

    fn generate_serialize(&self) -> TokenStream {
        serialize(&self.ctx, &self.group)
    }

    fn generate_size(&self) -> TokenStream {
        size(&self.ctx, &self.group)
    }

    /// Groups merge field by field rather than being replaced.
    fn generate_merge(&self) -> TokenStream {
        let other_has = &self.ctx.other_has_property_check;
        let mutable = &self.ctx.mutable;
        let theirs = self.ctx.getter_call(&quote!(other));
        quote! {
            if #other_has {
                ::protofield::Message::merge_from(self.#mutable(), #theirs);
            }
        }
    }

    fn generate_clone(&self) -> TokenStream {
        let storage = &self.ctx.storage;
        quote!(cloned.#storage = self.#storage.clone();)
    }

    fn generate_equality(&self) -> TokenStream {
        let has = &self.ctx.has_property_check;
        let other_has = &self.ctx.other_has_property_check;
        let differ = field::values_differ(&self.ctx);
        quote! {
            if #has != #other_has || #differ {
                return false;
            }
        }
    }

    fn generate_hash(&self) -> TokenStream {
        field::hash_value(&self.ctx)
    }

    fn generate_display(&self) -> TokenStream {
        field::display(&self.ctx)
    }

    fn generate_is_initialized(&self) -> TokenStream {
        is_initialized(&self.ctx)
    }
}

/// A group member of a oneof, boxed inside the slot enum.
pub struct GroupOneofField {
    member: OneofFieldContext,
    group: GroupValue,
}

impl GroupOneofField {
    pub fn new(member: OneofFieldContext, group: GroupValue) -> Self {
        GroupOneofField { member, group }
    }

    /// Builds the merged value in a temporary, folding in what the slot held
    /// if it already selected this member, then stores it.
    fn sub_builder(&self, fill: TokenStream) -> TokenStream {
        let ctx = &self.member.base;
        let ty = &self.group.type_path;
        let has = &ctx.has_property_check;
        let setter = &ctx.setter;
        let ours = ctx.getter_call(&quote!(self));
        quote! {
            let mut sub_builder = <#ty as ::core::default::Default>::default();
            if #has {
                ::protofield::Message::merge_from(&mut sub_builder, #ours);
            }
            #fill
            self.#setter(sub_builder);
        }
    }
}

impl FieldGenerator for GroupOneofField {
    fn context(&self) -> &FieldContext {
        &self.member.base
    }

    fn oneof_member(&self) -> Option<&OneofFieldContext> {
        Some(&self.member)
    }

    fn declare_storage(&self) -> FieldStorage {
        let ctx = &self.member.base;
        let FieldContext {
            storage,
            setter,
            has,
            clear,
            has_property_check,
            ..
        } = ctx;
        let slot = &self.member.oneof.storage;
        let slot_variant = &self.member.slot_variant;
        let ty = &self.group.type_path;
        let number_const = field::number_const(ctx);

        FieldStorage {
            field: None,
            members: quote! {
                #number_const

                pub fn #storage(&self) -> &#ty {
                    match &self.#slot {
                        ::core::option::Option::Some(#slot_variant(value)) => &**value,
                        _ => #ty::default_instance(),
                    }
                }

                pub fn #setter(&mut self, value: #ty) {
                    self.#slot = ::core::option::Option::Some(#slot_variant(::std::boxed::Box::new(value)));
                }

                pub fn #has(&self) -> bool {
                    #has_property_check
                }

                pub fn #clear(&mut self) {
                    if #has_property_check {
                        self.#slot = ::core::option::Option::None;
                    }
                }
            },
            module_items: TokenStream::new(),
        }
    }

    fn generate_parse(&self) -> TokenStream {
        let number = self.member.base.number_literal();
        self.sub_builder(quote! {
            input.read_group(#number, &mut sub_builder)?;
        })
    }

    fn generate_serialize(&self) -> TokenStream {
        serialize(&self.member.base, &self.group)
    }

    fn generate_size(&self) -> TokenStream {
        size(&self.member.base, &self.group)
    }

    fn generate_merge(&self) -> TokenStream {
        let theirs = self.member.base.getter_call(&quote!(other));
        self.sub_builder(quote! {
            ::protofield::Message::merge_from(&mut sub_builder, #theirs);
        })
    }

    fn generate_clone(&self) -> TokenStream {
        let setter = &self.member.base.setter;
        let value = self.member.base.value_for_setter(&quote!(self));
        quote! {
            cloned.#setter(#value);
        }
    }

    fn generate_equality(&self) -> TokenStream {
        let has = &self.member.base.has_property_check;
        let differ = field::values_differ(&self.member.base);
        quote! {
            if #has && #differ {
                return false;
            }
        }
    }

    fn generate_hash(&self) -> TokenStream {
        field::hash_value(&self.member.base)
    }

    fn generate_display(&self) -> TokenStream {
        field::display(&self.member.base)
    }

    fn generate_is_initialized(&self) -> TokenStream {
        is_initialized(&self.member.base)
    }
}

#[cfg(test)]
mod tests {
    use quote::{format_ident, quote};

    use super::*;
    use crate::codegen::field::create_field_generator;
    use crate::codegen::variables::{MessageScope, OneofScope};
    use crate::context::GenerationContext;
    use crate::descriptor::{DescriptorProto, FieldDescriptorProto, FileDescriptorProto, Label};

    fn generator(field: FieldDescriptorProto, oneof: bool) -> Box<dyn FieldGenerator> {
        let file = FileDescriptorProto::new("t.proto").with_message(
            DescriptorProto::new("Envelope")
                .with_nested(DescriptorProto::new("Header"))
                .with_nested(DescriptorProto::new("Detail")),
        );
        let ctx = GenerationContext::new(&file);
        let scope = MessageScope {
            ctx: &ctx,
            proto_path: ".Envelope".to_string(),
            companion: format_ident!("envelope"),
            depth: 0,
        };
        let field = FieldContext::new(&scope, &field).unwrap();
        if !oneof {
            return create_field_generator(field, None);
        }
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
        create_field_generator(field, Some((&oneof, format_ident!("Detail"))))
    }

    #[test]
    fn test_start_and_end_tags() {
        let header = generator(FieldDescriptorProto::group("header", 16, "Header"), false);

        let expected = quote! {
            if self.has_header() {
                output.write_raw_tag(&[131, 1]);
                output.write_group(self.header());
                output.write_raw_tag(&[132, 1]);
            }
        };
        assert_eq!(header.generate_serialize().to_string(), expected.to_string());

        let expected = quote! {
            if self.has_header() {
                size += 2 + 2 + ::protofield::compute_group_size(self.header());
            }
        };
        assert_eq!(header.generate_size().to_string(), expected.to_string());
    }

    #[test]
    fn test_singular_parse_and_merge() {
        let header = generator(FieldDescriptorProto::group("header", 16, "Header"), false);
        assert_eq!(
            header.generate_parse().to_string(),
            quote!(input.read_group(16, self.header_mut())?;).to_string()
        );

        let expected = quote! {
            if other.has_header() {
                ::protofield::Message::merge_from(self.header_mut(), other.header());
            }
        };
        assert_eq!(header.generate_merge().to_string(), expected.to_string());
    }

    #[test]
    fn test_required_group_is_initialized() {
        let header = generator(
            FieldDescriptorProto::group("header", 16, "Header").with_label(Label::Required),
            false,
        );
        let expected = quote! {
            if !self.has_header() {
                return false;
            }
            if self.has_header() && !::protofield::Message::is_initialized(self.header()) {
                return false;
            }
        };
        assert_eq!(header.generate_is_initialized().to_string(), expected.to_string());
    }

    #[test]
    fn test_oneof_parse_uses_sub_builder() {
        let detail = generator(FieldDescriptorProto::group("detail", 17, "Detail").in_oneof(0), true);

        let expected = quote! {
            let mut sub_builder = <envelope::Detail as ::core::default::Default>::default();
            if self.body_case() == envelope::BodyCase::Detail {
                ::protofield::Message::merge_from(&mut sub_builder, self.detail());
            }
            input.read_group(17, &mut sub_builder)?;
            self.set_detail(sub_builder);
        };
        assert_eq!(detail.generate_parse().to_string(), expected.to_string());
    }

    #[test]
    fn test_oneof_merge_accumulates() {
        let detail = generator(FieldDescriptorProto::group("detail", 17, "Detail").in_oneof(0), true);

        let expected = quote! {
            let mut sub_builder = <envelope::Detail as ::core::default::Default>::default();
            if self.body_case() == envelope::BodyCase::Detail {
                ::protofield::Message::merge_from(&mut sub_builder, self.detail());
            }
            ::protofield::Message::merge_from(&mut sub_builder, other.detail());
            self.set_detail(sub_builder);
        };
        assert_eq!(detail.generate_merge().to_string(), expected.to_string());
        assert_eq!(
            detail.generate_clone().to_string(),
            quote!(cloned.set_detail(::core::clone::Clone::clone(self.detail()));).to_string()
        );
    }
}
