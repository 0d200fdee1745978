//! Generation context for type resolution.

use std::collections::HashMap;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::descriptor::{DescriptorProto, FileDescriptorProto};

/// Information about a message type in the registry.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    /// The file this type is defined in.
    pub file_name: String,
    /// Path from the root of the generated file, e.g. `["envelope", "Header"]`
    /// for a message `Header` nested in `Envelope`.
    pub rust_path: Vec<String>,
}

impl TypeInfo {
    /// Path to this type from code `depth` modules below the file root.
    pub fn path_at_depth(&self, depth: usize) -> TokenStream {
        let supers = (0..depth).map(|_| quote!(super::));
        let segments = self.rust_path.iter().map(|s| format_ident!("{}", s));
        quote!(#(#supers)* #(#segments)::*)
    }
}

/// Context for code generation, including type registry.
pub struct GenerationContext {
    /// Map from fully-qualified proto type name -> type info.
    pub type_registry: HashMap<String, TypeInfo>,
}

impl GenerationContext {
    /// Create a new generation context for a single file.
    pub fn new(file: &FileDescriptorProto) -> Self {
        let mut type_registry = HashMap::new();

        let file_name = file.name.clone().unwrap_or_default();
        let package = file.package.as_deref().unwrap_or("");
        let prefix = if package.is_empty() {
            ".".to_string()
        } else {
            format!(".{}.", package)
        };

        // Register top-level messages
        for message in &file.message_type {
            register_message(&mut type_registry, &file_name, &prefix, &[], message);
        }

        Self { type_registry }
    }

    /// Resolve a type name as written in a field of the message `scope`.
    ///
    /// Fully-qualified names (leading `.`) are looked up directly. Relative
    /// names are searched for from the innermost scope outward, like protoc.
    pub fn resolve_type(&self, scope: &str, type_name: &str) -> Option<&TypeInfo> {
        if type_name.starts_with('.') {
            return self.type_registry.get(type_name);
        }

        let mut scope = scope;
        loop {
            let candidate = format!("{}.{}", scope, type_name);
            if let Some(info) = self.type_registry.get(&candidate) {
                return Some(info);
            }
            match scope.rfind('.') {
                Some(idx) => scope = &scope[..idx],
                None => return None,
            }
        }
    }
}

/// Register a message and its nested types in the registry.
fn register_message(
    registry: &mut HashMap<String, TypeInfo>,
    file_name: &str,
    prefix: &str,
    parent_modules: &[String],
    message: &DescriptorProto,
) {
    if let Some(name) = &message.name {
        // prefix is like "." or ".package." or ".Parent."
        let full_name = format!("{}{}", prefix, name);

        let mut rust_path = parent_modules.to_vec();
        rust_path.push(to_rust_type_name(name));
        registry.insert(
            full_name.clone(),
            TypeInfo {
                file_name: file_name.to_string(),
                rust_path,
            },
        );

        // Nested types live in the parent's companion module.
        let nested_prefix = format!("{}.", full_name);
        let mut nested_modules = parent_modules.to_vec();
        nested_modules.push(to_rust_field_name(name));
        for nested in &message.nested_type {
            register_message(registry, file_name, &nested_prefix, &nested_modules, nested);
        }
    }
}

/// Convert proto name to valid Rust type identifier (PascalCase).
pub fn to_rust_type_name(name: &str) -> String {
    escape_keyword(name.to_string())
}

/// Convert proto field name to Rust field name (snake_case).
pub fn to_rust_field_name(name: &str) -> String {
    escape_keyword(to_snake_case(name))
}

/// Keywords become raw identifiers, except the few that can't be raw.
fn escape_keyword(ident: String) -> String {
    match ident.as_str() {
        "self" | "Self" | "super" | "crate" => format!("{}_", ident),
        s if is_rust_keyword(s) => format!("r#{}", ident),
        _ => ident,
    }
}

/// Convert a proto name to the SCREAMING_SNAKE_CASE used for constants.
pub fn to_upper_snake_case(name: &str) -> String {
    to_snake_case(name).to_uppercase()
}

/// Convert a string to snake_case.
///
/// Handles consecutive uppercase letters correctly:
/// - "HTTPServer" -> "http_server"
/// - "myField" -> "my_field"
/// - "XMLParser" -> "xml_parser"
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            // Add underscore if:
            // 1. Not at start AND previous char was lowercase, OR
            // 2. Not at start AND previous was uppercase AND next is lowercase
            //    (handles "HTTPServer" -> "http_server")
            if i > 0 {
                let prev_lower = chars[i - 1].is_lowercase();
                let prev_upper = chars[i - 1].is_uppercase();
                let next_lower = chars.get(i + 1).map(|c| c.is_lowercase()).unwrap_or(false);
                if prev_lower || (prev_upper && next_lower) {
                    result.push('_');
                }
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// Check if a string is a Rust keyword.
fn is_rust_keyword(s: &str) -> bool {
    matches!(
        s,
        "as" | "break"
            | "const"
            | "continue"
            | "crate"
            | "else"
            | "enum"
            | "extern"
            | "false"
            | "fn"
            | "for"
            | "if"
            | "impl"
            | "in"
            | "let"
            | "loop"
            | "match"
            | "mod"
            | "move"
            | "mut"
            | "pub"
            | "ref"
            | "return"
            | "self"
            | "Self"
            | "static"
            | "struct"
            | "super"
            | "trait"
            | "true"
            | "type"
            | "unsafe"
            | "use"
            | "where"
            | "while"
            | "async"
            | "await"
            | "dyn"
            | "abstract"
            | "become"
            | "box"
            | "do"
            | "final"
            | "macro"
            | "override"
            | "priv"
            | "typeof"
            | "unsized"
            | "virtual"
            | "yield"
            | "try"
    )
}
