//! Descriptor lookup and loading

use prost::Message;
use prost_types::{FileDescriptorProto, FileDescriptorSet};
use std::fs;
use std::path::Path;
use tracing::debug;
use twirp_unity_common::{GeneratorError, RenderModel, Result};

/// Find the descriptor whose recorded name equals `name`
///
/// Matching is exact and case-sensitive; paths are not normalized.
pub fn find_file_descriptor<'a>(
    files: &'a [FileDescriptorProto],
    name: &str,
) -> Result<&'a FileDescriptorProto> {
    // Requests carry a handful of files; a linear scan is enough
    files
        .iter()
        .find(|f| f.name() == name)
        .ok_or_else(|| GeneratorError::DescriptorNotFound(name.to_string()))
}

/// Owns the descriptors of one request or descriptor set
///
/// Parses descriptors once and extracts a `RenderModel` per requested file.
pub struct DescriptorExtractor {
    files: Vec<FileDescriptorProto>,
}

impl DescriptorExtractor {
    /// Wrap descriptors already decoded (e.g., `CodeGeneratorRequest.proto_file`)
    pub fn new(files: Vec<FileDescriptorProto>) -> Self {
        Self { files }
    }

    /// Load FileDescriptorSet from binary file
    ///
    /// # Example
    /// ```rust,ignore
    /// let extractor = DescriptorExtractor::from_file("service.pb")?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path.as_ref()).map_err(|e| {
            GeneratorError::Parse(format!(
                "Failed to read FileDescriptorSet file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_file_descriptor_set(&bytes)
    }

    /// Parse FileDescriptorSet from bytes
    pub fn from_file_descriptor_set(bytes: &[u8]) -> Result<Self> {
        let set = FileDescriptorSet::decode(bytes).map_err(|e| {
            GeneratorError::Parse(format!("Failed to decode FileDescriptorSet: {}", e))
        })?;

        debug!(files = set.file.len(), "decoded descriptor set");
        Ok(Self::new(set.file))
    }

    /// Project the named file into a `RenderModel`
    pub fn extract(&self, file_name: &str) -> Result<RenderModel> {
        let fd = find_file_descriptor(&self.files, file_name)?;
        Ok(super::converter::extract_render_model(fd))
    }

    /// Names of the files that declare at least one service, in set order
    pub fn files_with_services(&self) -> Vec<&str> {
        self.files
            .iter()
            .filter(|f| !f.service.is_empty())
            .map(|f| f.name())
            .collect()
    }

    /// Get reference to the underlying descriptors
    pub fn files(&self) -> &[FileDescriptorProto] {
        &self.files
    }
}
