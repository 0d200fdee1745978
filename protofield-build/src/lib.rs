//! `protofield-build` generates Rust message types from protobuf
//! descriptors, for use with the `protofield` runtime.
//!
//! Every field of a message is handled by one of four encoding strategies,
//! picked by whether the field is a scalar or a group and whether it
//! belongs to a oneof. Each strategy emits the field's storage and
//! accessors along with its share of parsing, serialization, size
//! computation, merging, cloning, equality, hashing and printing. Tags are
//! computed at generation time and written as byte literals.
//!
//! # Example
//!
//! ```rust,no_run
//! // In build.rs
//! use protofield_build::descriptor::{DescriptorProto, FieldDescriptorProto, FileDescriptorProto, Type};
//!
//! fn main() -> Result<(), protofield_build::Error> {
//!     let file = FileDescriptorProto::new("point.proto").with_message(
//!         DescriptorProto::new("Point")
//!             .with_field(FieldDescriptorProto::new("x", 1, Type::Sint32))
//!             .with_field(FieldDescriptorProto::new("y", 2, Type::Sint32)),
//!     );
//!     protofield_build::compile_files(&[file])
//! }
//! ```
//!
//! The generated `point.rs` lands in `OUT_DIR` and is pulled in with
//! `include!(concat!(env!("OUT_DIR"), "/point.rs"));`.
//!
//! # Advanced Usage
//!
//! ```rust,no_run
//! # use protofield_build::descriptor::FileDescriptorProto;
//! # let files: Vec<FileDescriptorProto> = Vec::new();
//! protofield_build::Config::new()
//!     .out_dir("src/generated")
//!     .skip_format()
//!     .compile_files(&files)?;
//! # Ok::<(), protofield_build::Error>(())
//! ```

mod codegen;
mod config;
mod context;
pub mod descriptor;
mod error;
pub mod tag;

pub use config::Config;
pub use error::Error;

use descriptor::FileDescriptorProto;

/// Generate Rust code for `files` into `OUT_DIR` with default settings.
pub fn compile_files(files: &[FileDescriptorProto]) -> Result<(), Error> {
    Config::new().compile_files(files)
}
