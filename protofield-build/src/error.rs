//! Error types for protofield-build.

use std::io;

/// Errors that can occur during protobuf code generation.
///
/// Any error aborts generation of the whole file it was found in.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("OUT_DIR not set. Run from build.rs or set out_dir().")]
    MissingOutDir,
    #[error("Missing name in descriptor")]
    MissingName,
    #[error("Missing number for field '{0}'")]
    MissingFieldNumber(String),
    #[error("Invalid number {number} for field '{field}'")]
    InvalidFieldNumber { field: String, number: i32 },
    #[error("Field number {number} used more than once in message '{message}'")]
    DuplicateFieldNumber { message: String, number: u32 },
    #[error("Invalid field type: {0} (expected 1-18)")]
    InvalidFieldType(i32),
    #[error("Invalid field label: {0} (expected 1-3)")]
    InvalidLabel(i32),
    #[error("Unsupported field '{field}': {reason}")]
    UnsupportedField { field: String, reason: &'static str },
    #[error("Invalid default value {value:?} for field '{field}'")]
    InvalidDefault { field: String, value: String },
    #[error("Unresolved type '{type_name}' for field '{field}'")]
    UnresolvedType { field: String, type_name: String },
    #[error("Invalid oneof in message '{message}': {reason}")]
    InvalidOneof { message: String, reason: String },
    #[error("Failed to parse generated code: {0}")]
    SynParse(String),
}
