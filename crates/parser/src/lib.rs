//! Descriptor extraction for Twirp client generation
//!
//! This crate locates the `FileDescriptorProto` for a requested file and
//! projects its package, services and methods into a `RenderModel`.
//!
//! ## Projection
//!
//! - Namespace: `csharp_namespace` option verbatim, otherwise the proto
//!   package with each dot-separated segment capitalized
//!   (`my.pkg` → `My.Pkg`)
//! - Service URL: raw package plus service name (`my.pkg.Greeter`)
//! - Message types: fully-qualified names reduced to their last segment
//!   (`.my.pkg.HelloRequest` → `HelloRequest`)

mod protobuf;

pub use protobuf::{
    bare_type_name, capitalize_package, extract_render_model, find_file_descriptor,
    service_url, DescriptorExtractor,
};

use prost_types::FileDescriptorProto;
use twirp_unity_common::{RenderModel, Result};

/// Find `file_name` among `files` and project it into a `RenderModel`
///
/// # Arguments
/// * `files` - Every descriptor supplied with the request
/// * `file_name` - Path exactly as recorded in the descriptor (e.g., "echo/v1/echo.proto")
pub fn extract(files: &[FileDescriptorProto], file_name: &str) -> Result<RenderModel> {
    let fd = find_file_descriptor(files, file_name)?;
    Ok(extract_render_model(fd))
}
