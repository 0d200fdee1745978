//! Configuration for protobuf code generation.

use std::path::{Path, PathBuf};

use crate::descriptor::FileDescriptorProto;

/// Configuration for protobuf code generation.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Output directory for generated files.
    pub(crate) out_dir: Option<PathBuf>,

    /// Disable formatting with prettyplease.
    pub(crate) skip_format: bool,
}

impl Config {
    /// Create a new Config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output directory for generated Rust files.
    ///
    /// Defaults to the `OUT_DIR` environment variable set by Cargo for build
    /// scripts.
    pub fn out_dir(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.out_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Skip formatting with prettyplease.
    pub fn skip_format(&mut self) -> &mut Self {
        self.skip_format = true;
        self
    }

    /// Generate one `<file stem>.rs` per descriptor.
    ///
    /// Every file is generated before any is written, so an invalid
    /// descriptor leaves the output directory untouched.
    pub fn compile_files(&self, files: &[FileDescriptorProto]) -> Result<(), crate::Error> {
        crate::codegen::compile_files(self, files)
    }

    /// Generate the Rust source for a single file without writing it.
    pub fn generate_file(&self, file: &FileDescriptorProto) -> Result<String, crate::Error> {
        crate::codegen::generate_file(self, file)
    }
}
