//! Protobuf descriptor extractor
//!
//! Works directly on the raw `FileDescriptorProto` values protoc sends in a
//! `CodeGeneratorRequest`, or on a `FileDescriptorSet` written by
//! `protoc --descriptor_set_out`.
//!
//! Descriptors are never resolved against each other: type names are taken
//! as opaque strings, so a request whose imports are incomplete still
//! produces output.
//!
//! ## Example
//! ```rust,ignore
//! use twirp_unity_parser::DescriptorExtractor;
//!
//! let extractor = DescriptorExtractor::from_file("service.pb")?;
//! let model = extractor.extract("echo/v1/echo.proto")?;
//! ```

mod converter;
mod parser;

pub use converter::{bare_type_name, capitalize_package, extract_render_model, service_url};
pub use parser::{find_file_descriptor, DescriptorExtractor};
