//! Oneof slot and case enums, and the accessors on the owning message.

use std::collections::HashSet;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::Ident;

use crate::context::{to_rust_field_name, to_snake_case};
use crate::descriptor::{DescriptorProto, FieldDescriptorProto, OneofDescriptorProto};
use crate::Error;

use super::variables::{OneofFieldContext, OneofScope};

/// Information about a oneof and its fields.
pub struct OneofInfo<'a> {
    /// The oneof descriptor.
    pub oneof: &'a OneofDescriptorProto,
    /// Fields that belong to this oneof.
    pub fields: Vec<&'a FieldDescriptorProto>,
    /// Index of the oneof in the parent message.
    pub oneof_index: usize,
}

/// Collect oneofs from a message, skipping any without members.
pub fn collect_oneofs(message: &DescriptorProto) -> Vec<OneofInfo<'_>> {
    message
        .oneof_decl
        .iter()
        .enumerate()
        .filter_map(|(index, oneof)| {
            let fields: Vec<_> = message
                .field
                .iter()
                .filter(|f| f.oneof_index.and_then(|i| usize::try_from(i).ok()) == Some(index))
                .collect();

            if fields.is_empty() {
                return None;
            }

            Some(OneofInfo {
                oneof,
                fields,
                oneof_index: index,
            })
        })
        .collect()
}

/// Fields pointing at a oneof the message doesn't declare.
pub fn check_oneof_indices(message: &DescriptorProto) -> Result<(), Error> {
    let declared = message.oneof_decl.len();
    let dangling = message.field.iter().find(|f| {
        f.oneof_index
            .is_some_and(|i| usize::try_from(i).map_or(true, |i| i >= declared))
    });
    match dangling {
        None => Ok(()),
        Some(field) => Err(Error::InvalidOneof {
            message: message.name.clone().unwrap_or_default(),
            reason: format!(
                "field '{}' refers to undeclared oneof {}",
                field.name.as_deref().unwrap_or_default(),
                field.oneof_index.unwrap_or_default()
            ),
        }),
    }
}

impl OneofScope {
    /// `taken` holds the item names already in the companion module. Enums
    /// that would collide with one are named `<Oneof>Oneof` and
    /// `<Oneof>OneofCase` instead.
    pub fn new(
        message: &str,
        info: &OneofInfo<'_>,
        companion: &Ident,
        taken: &mut HashSet<String>,
    ) -> Result<Self, Error> {
        let proto_name = info.oneof.name.clone().ok_or(Error::MissingName)?;
        let snake = to_snake_case(&proto_name);
        let pascal = to_pascal_case(&proto_name);
        check_member_variants(message, info)?;

        let (slot_name, case_name) = [pascal.clone(), format!("{pascal}Oneof")]
            .into_iter()
            .map(|slot| {
                let case = format!("{slot}Case");
                (slot, case)
            })
            .find(|(slot, case)| slot != "Self" && !taken.contains(slot) && !taken.contains(case))
            .ok_or_else(|| Error::InvalidOneof {
                message: message.to_string(),
                reason: format!("enums for '{proto_name}' clash with other items"),
            })?;
        let slot_ident = format_ident!("{}", slot_name);
        let case_ident = format_ident!("{}", case_name);
        taken.insert(slot_name);
        taken.insert(case_name);

        Ok(OneofScope {
            storage: format_ident!("{}", to_rust_field_name(&proto_name)),
            case_accessor: format_ident!("{}_case", snake),
            clear: format_ident!("clear_{}", snake),
            slot_type: quote!(#companion::#slot_ident),
            case_type: quote!(#companion::#case_ident),
            slot_ident,
            case_ident,
            proto_name,
        })
    }
}

/// Variant name of a oneof member. `None` is taken by the empty case.
pub fn member_variant(message: &str, field: &FieldDescriptorProto) -> Result<Ident, Error> {
    let name = field.name.as_deref().ok_or(Error::MissingName)?;
    let variant = to_pascal_case(name);
    if variant == "None" || variant == "Self" {
        return Err(Error::InvalidOneof {
            message: message.to_string(),
            reason: format!("member '{name}' clashes with the empty case"),
        });
    }
    Ok(format_ident!("{}", variant))
}

/// Members must map to distinct variants, e.g. not both `foo_bar` and `fooBar`.
fn check_member_variants(message: &str, info: &OneofInfo<'_>) -> Result<(), Error> {
    let mut seen = HashSet::new();
    for field in &info.fields {
        let variant = member_variant(message, field)?;
        if !seen.insert(variant.to_string()) {
            return Err(Error::InvalidOneof {
                message: message.to_string(),
                reason: format!("more than one member maps to variant '{variant}'"),
            });
        }
    }
    Ok(())
}

/// The slot and case enums, for the message's companion module.
pub fn generate_oneof_enums(oneof: &OneofScope, members: &[&OneofFieldContext]) -> TokenStream {
    let slot_ident = &oneof.slot_ident;
    let case_ident = &oneof.case_ident;

    let slot_variants = members.iter().map(|member| {
        let variant = &member.variant;
        let ty = member.base.slot_type();
        quote!(#variant(#ty),)
    });
    let case_variants = members.iter().map(|member| {
        let variant = &member.variant;
        quote!(#variant,)
    });

    quote! {
        #[derive(Clone, Debug)]
        pub enum #slot_ident {
            #(#slot_variants)*
        }

        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        pub enum #case_ident {
            #[default]
            None,
            #(#case_variants)*
        }
    }
}

/// The struct field holding the slot.
pub fn generate_oneof_field(oneof: &OneofScope) -> TokenStream {
    let storage = &oneof.storage;
    let slot_type = &oneof.slot_type;
    quote!(#storage: ::core::option::Option<#slot_type>,)
}

/// `<oneof>_case()` and `clear_<oneof>()` on the message.
pub fn generate_oneof_accessors(oneof: &OneofScope, members: &[&OneofFieldContext]) -> TokenStream {
    let storage = &oneof.storage;
    let case_accessor = &oneof.case_accessor;
    let clear = &oneof.clear;
    let case_type = &oneof.case_type;
    let case_none = oneof.case_none();

    let arms = members.iter().map(|member| {
        let slot_variant = &member.slot_variant;
        let case_value = &member.case_value;
        quote!(::core::option::Option::Some(#slot_variant(_)) => #case_value,)
    });

    quote! {
        /// Which member of the oneof is set.
        pub fn #case_accessor(&self) -> #case_type {
            match &self.#storage {
                ::core::option::Option::None => #case_none,
                #(#arms)*
            }
        }

        pub fn #clear(&mut self) {
            self.#storage = ::core::option::Option::None;
        }
    }
}

/// Convert snake_case to PascalCase.
pub fn to_pascal_case(s: &str) -> String {
    s.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect()
}
