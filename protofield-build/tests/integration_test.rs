//! Integration test for protofield-build.

use protofield_build::descriptor::{
    DescriptorProto, FieldDescriptorProto, FileDescriptorProto, Label, Type,
};
use protofield_build::{Config, Error};
use std::fs;
use tempfile::tempdir;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn envelope_file() -> FileDescriptorProto {
    FileDescriptorProto::new("proto/envelope.proto")
        .with_package("test")
        .with_message(
            DescriptorProto::new("Envelope")
                .with_field(FieldDescriptorProto::new("id", 1, Type::Int32).with_label(Label::Required))
                .with_field(FieldDescriptorProto::new("ratio", 5, Type::Double).with_default("0.5"))
                .with_field(FieldDescriptorProto::new("code", 2, Type::Sint32).in_oneof(0))
                .with_field(FieldDescriptorProto::new("blob", 3, Type::Bytes).in_oneof(0))
                .with_field(FieldDescriptorProto::group("header", 16, "Header"))
                .with_nested(
                    DescriptorProto::new("Header")
                        .with_field(FieldDescriptorProto::new("title", 1, Type::String)),
                )
                .with_oneof("body"),
        )
}

#[test]
fn test_compile_files() {
    init_tracing();
    let out_dir = tempdir().expect("Failed to create temp dir");

    Config::new()
        .out_dir(out_dir.path())
        .compile_files(&[envelope_file()])
        .expect("Failed to generate code");

    let envelope_rs = out_dir.path().join("envelope.rs");
    assert!(envelope_rs.exists(), "envelope.rs should be generated");

    let content = fs::read_to_string(&envelope_rs).expect("Failed to read envelope.rs");
    syn::parse_file(&content).expect("Generated code should parse");

    assert!(
        content.starts_with("// This file is @generated by protofield-build."),
        "Should start with the generated header"
    );

    // Structures
    assert!(content.contains("pub struct Envelope"), "Should contain Envelope struct");
    assert!(content.contains("pub mod envelope"), "Should contain companion module");
    assert!(content.contains("pub struct Header"), "Should contain Header struct");
    assert!(content.contains("pub enum Body"), "Should contain oneof slot enum");
    assert!(content.contains("pub enum BodyCase"), "Should contain oneof case enum");

    // Accessors
    assert!(content.contains("pub fn ratio(&self) -> f64"), "Should contain ratio getter");
    assert!(content.contains("pub fn has_ratio(&self) -> bool"), "Should contain has_ratio");
    assert!(content.contains("pub fn header_mut(&mut self)"), "Should contain header_mut");
    assert!(content.contains("pub fn body_case(&self)"), "Should contain body_case");
    assert!(content.contains("pub const RATIO_DEFAULT: f64 = 0.5;"), "Should contain default");
    assert!(content.contains("pub static BLOB_DEFAULT"), "Bytes default should be a static");

    // Tags are emitted as literals
    assert!(content.contains("write_raw_tag(&[41])"), "Should write the ratio tag 0x29");
    assert!(content.contains("write_raw_tag(&[131, 1])"), "Should write the header start tag");
    assert!(content.contains("write_raw_tag(&[132, 1])"), "Should write the header end tag");

    // Floats compare and hash by bits
    assert!(content.contains("bitwise_eq_f64"), "Should compare floats bitwise");
    assert!(content.contains("bitwise_hash_f64"), "Should hash floats bitwise");

    assert!(content.contains("impl ::protofield::Message for Envelope"));
}

#[test]
fn test_generate_file_without_writing() {
    init_tracing();
    let code = Config::new()
        .skip_format()
        .generate_file(&envelope_file())
        .expect("Failed to generate code");
    syn::parse_file(&code).expect("Unformatted code should parse");
}

#[test]
fn test_missing_out_dir() {
    // Only meaningful outside of a build script.
    if std::env::var_os("OUT_DIR").is_some() {
        return;
    }
    let err = protofield_build::compile_files(&[envelope_file()]).unwrap_err();
    assert!(matches!(err, Error::MissingOutDir));
}

#[test]
fn test_errors_abort_the_file() {
    init_tracing();
    let bad = |field: FieldDescriptorProto| {
        FileDescriptorProto::new("bad.proto").with_message(DescriptorProto::new("Bad").with_field(field))
    };
    let generate = |file: FileDescriptorProto| Config::new().generate_file(&file).unwrap_err();

    assert!(matches!(
        generate(bad(FieldDescriptorProto::new("x", 19_000, Type::Int32))),
        Error::InvalidFieldNumber { number: 19_000, .. }
    ));
    assert!(matches!(
        generate(bad(FieldDescriptorProto::new("x", 1, Type::Int32).with_default("abc"))),
        Error::InvalidDefault { .. }
    ));
    assert!(matches!(
        generate(bad(FieldDescriptorProto::group("g", 1, ".missing.Group"))),
        Error::UnresolvedType { .. }
    ));
    assert!(matches!(
        generate(bad(FieldDescriptorProto::new("x", 1, Type::Enum))),
        Error::UnsupportedField { .. }
    ));
    assert!(matches!(
        generate(bad(FieldDescriptorProto {
            r#type: Some(42),
            ..FieldDescriptorProto::new("x", 1, Type::Int32)
        })),
        Error::InvalidFieldType(42)
    ));

    let oneof_none = FileDescriptorProto::new("bad.proto").with_message(
        DescriptorProto::new("Bad")
            .with_field(FieldDescriptorProto::new("none", 1, Type::Int32).in_oneof(0))
            .with_oneof("choice"),
    );
    assert!(matches!(generate(oneof_none), Error::InvalidOneof { .. }));
}

#[test]
fn test_keyword_names() {
    let file = FileDescriptorProto::new("keywords.proto").with_message(
        DescriptorProto::new("Keywords")
            .with_field(FieldDescriptorProto::new("type", 1, Type::String))
            .with_field(FieldDescriptorProto::new("self", 2, Type::Bool))
            .with_field(FieldDescriptorProto::new("loop", 3, Type::Int32).in_oneof(0))
            .with_oneof("match"),
    );
    let code = Config::new().generate_file(&file).expect("Keywords should be escaped");
    syn::parse_file(&code).expect("Generated code should parse");
    assert!(code.contains("r#type"));
    assert!(code.contains("self_"));
}

#[test]
fn test_oneof_named_like_nested_type() {
    init_tracing();
    let file = FileDescriptorProto::new("event.proto").with_message(
        DescriptorProto::new("Event")
            .with_field(FieldDescriptorProto::new("code", 1, Type::Int32).in_oneof(0))
            .with_field(FieldDescriptorProto::group("payload_group", 2, "Payload").in_oneof(0))
            .with_nested(
                DescriptorProto::new("Payload")
                    .with_field(FieldDescriptorProto::new("label", 1, Type::String)),
            )
            .with_oneof("payload"),
    );
    let code = Config::new().generate_file(&file).expect("Failed to generate code");
    let parsed = syn::parse_file(&code).expect("Generated code should parse");

    let syn::Item::Mod(module) = parsed
        .items
        .iter()
        .find(|item| matches!(item, syn::Item::Mod(m) if m.ident == "event"))
        .expect("Should contain companion module")
    else {
        unreachable!()
    };
    let mut names: Vec<String> = module
        .content
        .iter()
        .flat_map(|(_, items)| items)
        .filter_map(|item| match item {
            syn::Item::Struct(s) => Some(s.ident.to_string()),
            syn::Item::Enum(e) => Some(e.ident.to_string()),
            _ => None,
        })
        .collect();
    names.sort();
    assert_eq!(names, ["Payload", "PayloadOneof", "PayloadOneofCase"]);
    assert!(code.contains("pub fn payload_case(&self) -> event::PayloadOneofCase"));
}

#[test]
fn test_trait_calls_are_qualified() {
    let file = FileDescriptorProto::new("setting.proto").with_message(
        DescriptorProto::new("Setting")
            .with_field(FieldDescriptorProto::new("default", 1, Type::Int32))
            .with_field(FieldDescriptorProto::group("inner", 2, "Inner").in_oneof(0))
            .with_nested(
                DescriptorProto::new("Inner")
                    .with_field(FieldDescriptorProto::new("clone", 1, Type::Int32)),
            )
            .with_oneof("choice"),
    );
    let code = Config::new().skip_format().generate_file(&file).expect("Failed to generate code");
    syn::parse_file(&code).expect("Generated code should parse");
    let contains = |tokens: proc_macro2::TokenStream| code.contains(&tokens.to_string());
    assert!(!contains(quote::quote!(Self::default())));
    assert!(!contains(quote::quote!(.clone())));
    assert!(contains(quote::quote!(<Self as ::core::default::Default>::default())));
    assert!(contains(quote::quote!(::core::clone::Clone::clone(self.inner()))));
}

#[test]
fn test_oneof_members_with_same_variant() {
    let file = FileDescriptorProto::new("bad.proto").with_message(
        DescriptorProto::new("Bad")
            .with_field(FieldDescriptorProto::new("foo_bar", 1, Type::Int32).in_oneof(0))
            .with_field(FieldDescriptorProto::new("fooBar", 2, Type::Int32).in_oneof(0))
            .with_oneof("choice"),
    );
    let err = Config::new().generate_file(&file).unwrap_err();
    assert!(matches!(err, Error::InvalidOneof { .. }));
}
