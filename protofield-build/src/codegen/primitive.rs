//! Scalar fields, standalone and inside a oneof.

use proc_macro2::TokenStream;
use quote::quote;

use super::field::{self, FieldGenerator, FieldStorage};
use super::types::Representation;
use super::variables::{FieldContext, OneofFieldContext, ScalarValue};

/// A singular scalar with explicit presence, stored as `Option<T>`.
pub struct PrimitiveField {
    ctx: FieldContext,
    value: ScalarValue,
}

impl PrimitiveField {
    pub fn new(ctx: FieldContext, value: ScalarValue) -> Self {
        PrimitiveField { ctx, value }
    }
}

impl FieldGenerator for PrimitiveField {
    fn context(&self) -> &FieldContext {
        &self.ctx
    }

    fn declare_storage(&self) -> FieldStorage {
        let FieldContext {
            storage,
            setter,
            has,
            clear,
            default_const,
            companion,
            ..
        } = &self.ctx;
        let scalar = self.value.scalar;
        let rust_type = scalar.rust_type();
        let getter_type = scalar.getter_type();

        let (getter, setter_fn) = match scalar.representation() {
            Representation::Copy => (
                quote!(self.#storage.unwrap_or(Self::#default_const)),
                quote! {
                    pub fn #setter(&mut self, value: #rust_type) {
                        self.#storage = ::core::option::Option::Some(value);
                    }
                },
            ),
            Representation::Str => (
                quote!(self.#storage.as_deref().unwrap_or(Self::#default_const)),
                quote! {
                    pub fn #setter(&mut self, value: impl ::core::convert::Into<::std::string::String>) {
                        self.#storage = ::core::option::Option::Some(value.into());
                    }
                },
            ),
            Representation::Bytes => (
                quote!(self.#storage.as_ref().unwrap_or(&#companion::#default_const)),
                quote! {
                    pub fn #setter(&mut self, value: impl ::core::convert::Into<::protofield::bytes::Bytes>) {
                        self.#storage = ::core::option::Option::Some(value.into());
                    }
                },
            ),
        };

        let number_const = field::number_const(&self.ctx);
        let defaults = field::default_const(&self.ctx, scalar, &self.value.default);
        let default_members = defaults.members;

        FieldStorage {
            field: Some(quote!(#storage: ::core::option::Option<#rust_type>,)),
            members: quote! {
                #number_const
                #default_members

                pub fn #storage(&self) -> #getter_type {
                    #getter
                }

                #setter_fn

                pub fn #has(&self) -> bool {
                    self.#storage.is_some()
                }

                pub fn #clear(&mut self) {
                    self.#storage = ::core::option::Option::None;
                }
            },
            module_items: defaults.module_items,
        }
    }

    fn generate_parse(&self) -> TokenStream {
        let setter = &self.ctx.setter;
        let read = self.value.scalar.read_method();
        quote! {
            self.#setter(input.#read()?);
        }
    }

    fn generate_serialize(&self) -> TokenStream {
        field::scalar_serialize(&self.ctx, self.value.scalar)
    }

    fn generate_size(&self) -> TokenStream {
        field::scalar_size(&self.ctx, self.value.scalar)
    }

    fn generate_merge(&self) -> TokenStream {
        let other_has = &self.ctx.other_has_property_check;
        let setter = &self.ctx.setter;
        let value = self.ctx.value_for_setter(&quote!(other));
        quote! {
            if #other_has {
                self.#setter(#value);
            }
        }
    }

    fn generate_clone(&self) -> TokenStream {
        let storage = &self.ctx.storage;
        match self.value.scalar.representation() {
            Representation::Copy => quote!(cloned.#storage = self.#storage;),
            Representation::Str | Representation::Bytes => {
                quote!(cloned.#storage = self.#storage.clone();)
            }
        }
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
        field::required_check(&self.ctx)
    }
}

/// A scalar member of a oneof. The value lives in the oneof's slot enum and
/// presence means the oneof's case selects this member.
pub struct PrimitiveOneofField {
    member: OneofFieldContext,
    value: ScalarValue,
}

impl PrimitiveOneofField {
    pub fn new(member: OneofFieldContext, value: ScalarValue) -> Self {
        PrimitiveOneofField { member, value }
    }
}

impl FieldGenerator for PrimitiveOneofField {
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
            default_const,
            companion,
            has_property_check,
            ..
        } = ctx;
        let slot = &self.member.oneof.storage;
        let slot_variant = &self.member.slot_variant;
        let scalar = self.value.scalar;
        let getter_type = scalar.getter_type();

        let (selected, fallback, setter_fn) = match scalar.representation() {
            Representation::Copy => {
                let rust_type = scalar.rust_type();
                (
                    quote!(*value),
                    quote!(Self::#default_const),
                    quote! {
                        pub fn #setter(&mut self, value: #rust_type) {
                            self.#slot = ::core::option::Option::Some(#slot_variant(value));
                        }
                    },
                )
            }
            Representation::Str => (
                quote!(value.as_str()),
                quote!(Self::#default_const),
                quote! {
                    pub fn #setter(&mut self, value: impl ::core::convert::Into<::std::string::String>) {
                        self.#slot = ::core::option::Option::Some(#slot_variant(value.into()));
                    }
                },
            ),
            Representation::Bytes => (
                quote!(value),
                quote!(&#companion::#default_const),
                quote! {
                    pub fn #setter(&mut self, value: impl ::core::convert::Into<::protofield::bytes::Bytes>) {
                        self.#slot = ::core::option::Option::Some(#slot_variant(value.into()));
                    }
                },
            ),
        };

        let number_const = field::number_const(ctx);
        let defaults = field::default_const(ctx, scalar, &self.value.default);
        let default_members = defaults.members;

        FieldStorage {
            field: None,
            members: quote! {
                #number_const
                #default_members

                pub fn #storage(&self) -> #getter_type {
                    match &self.#slot {
                        ::core::option::Option::Some(#slot_variant(value)) => #selected,
                        _ => #fallback,
                    }
                }

                #setter_fn

                pub fn #has(&self) -> bool {
                    #has_property_check
                }

                pub fn #clear(&mut self) {
                    if #has_property_check {
                        self.#slot = ::core::option::Option::None;
                    }
                }
            },
            module_items: defaults.module_items,
        }
    }

    fn generate_parse(&self) -> TokenStream {
        let setter = &self.member.base.setter;
        let read = self.value.scalar.read_method();
        quote! {
            self.#setter(input.#read()?);
        }
    }

    fn generate_serialize(&self) -> TokenStream {
        field::scalar_serialize(&self.member.base, self.value.scalar)
    }

    fn generate_size(&self) -> TokenStream {
        field::scalar_size(&self.member.base, self.value.scalar)
    }

    fn generate_merge(&self) -> TokenStream {
        let setter = &self.member.base.setter;
        let value = self.member.base.value_for_setter(&quote!(other));
        quote! {
            self.#setter(#value);
        }
    }

    fn generate_clone(&self) -> TokenStream {
        let setter = &self.member.base.setter;
        let value = self.member.base.value_for_setter(&quote!(self));
        quote! {
            cloned.#setter(#value);
        }
    }

    fn generate_equality(&self) -> TokenStream {
        // The message compares the cases before any member.
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
        TokenStream::new()
    }
}
