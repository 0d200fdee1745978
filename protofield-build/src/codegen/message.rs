//! Message struct code generation.
//!
//! Assembles the fragments of every field's generator into the struct, its
//! accessors, the standard trait impls, and the `::protofield::Message`
//! impl. Items that need their own namespace (oneof enums, bytes defaults
//! and nested messages) go in a companion module named after the message.

use std::collections::HashSet;

use proc_macro2::{Literal, TokenStream};
use quote::{format_ident, quote};
use tracing::debug;

use crate::context::{to_rust_field_name, to_rust_type_name, GenerationContext};
use crate::descriptor::DescriptorProto;
use crate::Error;

use super::field::{create_field_generator, FieldGenerator};
use super::oneof::{
    check_oneof_indices, collect_oneofs, generate_oneof_accessors, generate_oneof_enums,
    generate_oneof_field, member_variant,
};
use super::variables::{FieldContext, MessageScope, OneofFieldContext, OneofScope};

struct GeneratedField {
    /// Position in the message's list of oneof scopes.
    oneof: Option<usize>,
    generator: Box<dyn FieldGenerator>,
}

/// Generate Rust code for a proto message and, recursively, its nested
/// messages.
///
/// `parent_path` is the fully-qualified proto name of the enclosing package
/// or message (empty for the root package) and `depth` the number of modules
/// between the file root and the generated struct.
pub fn generate_message(
    ctx: &GenerationContext,
    parent_path: &str,
    message: &DescriptorProto,
    depth: usize,
) -> Result<TokenStream, Error> {
    let name = message.name.as_ref().ok_or(Error::MissingName)?;
    let struct_name = format_ident!("{}", to_rust_type_name(name));
    let full_path = format!("{}.{}", parent_path, name);
    let companion = format_ident!("{}", to_rust_field_name(name));

    debug!(
        message = %full_path,
        fields = message.field.len(),
        oneofs = message.oneof_decl.len(),
        "generating message"
    );

    check_oneof_indices(message)?;
    check_field_numbers(name, message)?;

    let scope = MessageScope {
        ctx,
        proto_path: full_path.clone(),
        companion: companion.clone(),
        depth,
    };

    let oneof_infos = collect_oneofs(message);
    let mut taken: HashSet<String> = message
        .nested_type
        .iter()
        .filter_map(|nested| nested.name.as_deref())
        .map(to_rust_type_name)
        .collect();
    let oneofs = oneof_infos
        .iter()
        .map(|info| OneofScope::new(name, info, &companion, &mut taken))
        .collect::<Result<Vec<_>, _>>()?;

    let mut fields = Vec::with_capacity(message.field.len());
    for field in &message.field {
        let context = FieldContext::new(&scope, field)?;
        let position = field.oneof_index.and_then(|index| {
            oneof_infos
                .iter()
                .position(|info| i32::try_from(info.oneof_index).ok() == Some(index))
        });

        let generator = match position {
            None => create_field_generator(context, None),
            Some(position) => {
                if context.required {
                    return Err(Error::InvalidOneof {
                        message: name.clone(),
                        reason: format!("member '{}' can't be required", context.proto_name),
                    });
                }
                let variant = member_variant(name, field)?;
                create_field_generator(context, Some((&oneofs[position], variant)))
            }
        };
        fields.push(GeneratedField {
            oneof: position,
            generator,
        });
    }
    fields.sort_by_key(|field| field.generator.context().number);

    let members_of = |position: usize| -> Vec<&OneofFieldContext> {
        fields
            .iter()
            .filter(|field| field.oneof == Some(position))
            .filter_map(|field| field.generator.oneof_member())
            .collect()
    };
    let singular: Vec<&dyn FieldGenerator> = fields
        .iter()
        .filter(|field| field.oneof.is_none())
        .map(|field| field.generator.as_ref())
        .collect();

    // Storage and accessors.
    let mut struct_fields = Vec::new();
    let mut members = TokenStream::new();
    let mut module_items = TokenStream::new();
    for field in &fields {
        let storage = field.generator.declare_storage();
        struct_fields.extend(storage.field);
        members.extend(storage.members);
        module_items.extend(storage.module_items);
    }
    for (position, oneof) in oneofs.iter().enumerate() {
        let oneof_members = members_of(position);
        debug!(
            message = %full_path,
            oneof = %oneof.proto_name,
            members = oneof_members.len(),
            "generating oneof"
        );
        struct_fields.push(generate_oneof_field(oneof));
        members.extend(generate_oneof_accessors(oneof, &oneof_members));
        module_items.extend(generate_oneof_enums(oneof, &oneof_members));
    }
    for nested in &message.nested_type {
        module_items.extend(generate_message(ctx, &full_path, nested, depth + 1)?);
    }

    // Per-operation fragments. Serialization, size and display follow field
    // number order, which `fields` is sorted in.
    let parse_arms = fields.iter().map(|field| {
        let tag = Literal::u32_unsuffixed(field.generator.context().tag.value());
        let parse = field.generator.generate_parse();
        quote! {
            #tag => {
                #parse
            }
        }
    });
    let serialize = fields.iter().map(|field| field.generator.generate_serialize());
    let size = fields.iter().map(|field| field.generator.generate_size());
    let display = fields.iter().map(|field| field.generator.generate_display());
    let is_initialized = fields.iter().map(|field| field.generator.generate_is_initialized());

    let mut merge: Vec<TokenStream> = singular.iter().map(|g| g.generate_merge()).collect();
    let mut clone: Vec<TokenStream> = singular.iter().map(|g| g.generate_clone()).collect();
    let mut equality: Vec<TokenStream> = singular.iter().map(|g| g.generate_equality()).collect();
    let mut hash: Vec<TokenStream> = singular.iter().map(|g| g.generate_hash()).collect();

    for (position, oneof) in oneofs.iter().enumerate() {
        let case_accessor = &oneof.case_accessor;
        let case_none = oneof.case_none();
        let oneof_fields: Vec<&dyn FieldGenerator> = fields
            .iter()
            .filter(|field| field.oneof == Some(position))
            .map(|field| field.generator.as_ref())
            .collect();

        let case_arms = |fragment: fn(&dyn FieldGenerator) -> TokenStream| {
            let arms = oneof_fields.iter().filter_map(|generator| {
                let case_value = &generator.oneof_member()?.case_value;
                let body = fragment(*generator);
                Some(quote!(#case_value => { #body }))
            });
            quote! {
                #(#arms)*
                #case_none => {}
            }
        };

        let merge_arms = case_arms(|g| g.generate_merge());
        merge.push(quote! {
            match other.#case_accessor() {
                #merge_arms
            }
        });

        let clone_arms = case_arms(|g| g.generate_clone());
        clone.push(quote! {
            match self.#case_accessor() {
                #clone_arms
            }
        });

        let member_equality = oneof_fields.iter().map(|g| g.generate_equality());
        equality.push(quote! {
            if self.#case_accessor() != other.#case_accessor() {
                return false;
            }
            #(#member_equality)*
        });

        let member_hash = oneof_fields.iter().map(|g| g.generate_hash());
        hash.push(quote! {
            ::core::hash::Hash::hash(&self.#case_accessor(), state);
            #(#member_hash)*
        });
    }

    let module = if module_items.is_empty() {
        TokenStream::new()
    } else {
        quote! {
            pub mod #companion {
                #module_items
            }
        }
    };

    Ok(quote! {
        #[derive(Debug, Default)]
        pub struct #struct_name {
            #(#struct_fields)*
        }

        impl #struct_name {
            #members

            /// The shared instance with no fields set.
            pub fn default_instance() -> &'static #struct_name {
                static INSTANCE: ::std::sync::LazyLock<#struct_name> =
                    ::std::sync::LazyLock::new(<#struct_name as ::core::default::Default>::default);
                &INSTANCE
            }
        }

        #[allow(unused_mut)]
        impl ::core::clone::Clone for #struct_name {
            fn clone(&self) -> Self {
                let mut cloned = <Self as ::core::default::Default>::default();
                #(#clone)*
                cloned
            }
        }

        #[allow(unused_variables)]
        impl ::core::cmp::PartialEq for #struct_name {
            fn eq(&self, other: &Self) -> bool {
                #(#equality)*
                true
            }
        }

        impl ::core::cmp::Eq for #struct_name {}

        #[allow(unused_variables)]
        impl ::core::hash::Hash for #struct_name {
            fn hash<H: ::core::hash::Hasher>(&self, state: &mut H) {
                #(#hash)*
            }
        }

        impl ::core::fmt::Display for #struct_name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::protofield::write_message(self, f)
            }
        }

        #[allow(unused_mut, unused_variables)]
        impl ::protofield::Message for #struct_name {
            fn merge_from_input<B: ::protofield::bytes::Buf>(
                &mut self,
                input: &mut ::protofield::CodedInput<B>,
            ) -> ::core::result::Result<(), ::protofield::DecodeError> {
                while let ::core::option::Option::Some(tag) = input.read_tag()? {
                    match tag {
                        #(#parse_arms)*
                        _ => input.skip_last_field()?,
                    }
                }
                ::core::result::Result::Ok(())
            }

            fn write_to<B: ::protofield::bytes::BufMut>(&self, output: &mut ::protofield::CodedOutput<B>) {
                #(#serialize)*
            }

            fn calculate_size(&self) -> usize {
                let mut size = 0usize;
                #(#size)*
                size
            }

            fn merge_from(&mut self, other: &Self) {
                #(#merge)*
            }

            fn is_initialized(&self) -> bool {
                #(#is_initialized)*
                true
            }

            fn print_fields(&self, printer: &mut ::protofield::FieldPrinter<'_, '_>) -> ::core::fmt::Result {
                #(#display)*
                ::core::result::Result::Ok(())
            }
        }

        #module
    })
}

/// Field numbers must be unique within a message, oneof members included.
fn check_field_numbers(name: &str, message: &DescriptorProto) -> Result<(), Error> {
    let mut seen = HashSet::new();
    for field in &message.field {
        let Some(number) = field.number.and_then(|n| u32::try_from(n).ok()) else {
            continue;
        };
        if !seen.insert(number) {
            return Err(Error::DuplicateFieldNumber {
                message: name.to_string(),
                number,
            });
        }
    }
    Ok(())
}
