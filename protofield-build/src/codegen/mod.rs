//! Code generation from protobuf descriptors.

mod default_value;
mod field;
mod group;
mod message;
mod oneof;
mod primitive;
mod types;
mod variables;

use std::path::{Path, PathBuf};

use proc_macro2::TokenStream;
use tracing::debug;

use crate::config::Config;
use crate::context::GenerationContext;
use crate::descriptor::FileDescriptorProto;
use crate::Error;

const HEADER: &str = "// This file is @generated by protofield-build.\n\n";

/// Generate every file, then write them all to the output directory.
pub fn compile_files(config: &Config, files: &[FileDescriptorProto]) -> Result<(), Error> {
    let out_dir = config
        .out_dir
        .clone()
        .or_else(|| std::env::var_os("OUT_DIR").map(Into::into))
        .ok_or(Error::MissingOutDir)?;

    let generated = files
        .iter()
        .map(|file| Ok((output_path(&out_dir, file), generate_file(config, file)?)))
        .collect::<Result<Vec<_>, Error>>()?;

    std::fs::create_dir_all(&out_dir)?;
    for (path, code) in generated {
        debug!(path = %path.display(), bytes = code.len(), "writing generated file");
        std::fs::write(&path, code)?;
    }

    Ok(())
}

/// Generate the Rust source for a single .proto file.
pub fn generate_file(config: &Config, file: &FileDescriptorProto) -> Result<String, Error> {
    debug!(
        file = file.name.as_deref().unwrap_or_default(),
        messages = file.message_type.len(),
        "generating file"
    );

    let tokens = generate_tokens(file)?;
    let body = if config.skip_format {
        tokens.to_string()
    } else {
        let parsed: syn::File =
            syn::parse2(tokens).map_err(|e| Error::SynParse(e.to_string()))?;
        prettyplease::unparse(&parsed)
    };

    Ok(format!("{HEADER}{body}"))
}

fn generate_tokens(file: &FileDescriptorProto) -> Result<TokenStream, Error> {
    let ctx = GenerationContext::new(file);
    let package = file
        .package
        .as_deref()
        .filter(|p| !p.is_empty())
        .map(|p| format!(".{p}"))
        .unwrap_or_default();

    let mut tokens = TokenStream::new();
    for msg in &file.message_type {
        tokens.extend(message::generate_message(&ctx, &package, msg, 0)?);
    }
    Ok(tokens)
}

/// `<out_dir>/<file stem>.rs`.
fn output_path(out_dir: &Path, file: &FileDescriptorProto) -> PathBuf {
    let name = file.name.as_deref().unwrap_or("unknown");
    let stem = Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");
    out_dir.join(format!("{stem}.rs"))
}
