//! Batch processing of a CodeGeneratorRequest
//!
//! Files are handled in request order. The first failure aborts the batch:
//! the response then carries only the error string and no files.

use crate::{output_file_name, ClientRenderer, TwirpClientGenerator};
use prost_types::compiler::code_generator_response::{Feature, File};
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};
use twirp_unity_common::{GeneratorError, GeneratorOptions};

/// Features advertised to protoc
///
/// Message fields are never inspected, so proto3 `optional` needs no handling.
pub const SUPPORTED_FEATURES: u64 = Feature::Proto3Optional as u64;

/// Processing step a file failed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Descriptor,
    Generate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Descriptor => write!(f, "descriptor"),
            Stage::Generate => write!(f, "generate"),
        }
    }
}

/// A per-file failure, tagged with the file and stage
#[derive(Error, Debug)]
#[error("File[{file}][{stage}]: {source}")]
pub struct BatchError {
    pub file: String,
    pub stage: Stage,
    #[source]
    pub source: GeneratorError,
}

/// Generate clients for every file in the request
///
/// Options come from the request's `parameter` field.
pub fn generate(request: &CodeGeneratorRequest) -> CodeGeneratorResponse {
    let options = match GeneratorOptions::from_parameter(request.parameter.as_deref()) {
        Ok(options) => options,
        Err(e) => return error_response(format!("parameter: {}", e)),
    };

    let generator = match TwirpClientGenerator::new(options) {
        Ok(generator) => generator,
        Err(e) => return error_response(format!("template: {}", e)),
    };

    generate_with(request, &generator)
}

/// Generate clients for every file in the request using `renderer`
pub fn generate_with<R: ClientRenderer + ?Sized>(
    request: &CodeGeneratorRequest,
    renderer: &R,
) -> CodeGeneratorResponse {
    match generate_files(request, renderer) {
        Ok(file) => {
            info!(files = file.len(), "generated twirp clients");
            CodeGeneratorResponse {
                file,
                supported_features: Some(SUPPORTED_FEATURES),
                ..Default::default()
            }
        }
        Err(e) => {
            warn!(error = %e, "generation aborted");
            error_response(e.to_string())
        }
    }
}

fn generate_files<R: ClientRenderer + ?Sized>(
    request: &CodeGeneratorRequest,
    renderer: &R,
) -> Result<Vec<File>, BatchError> {
    let mut files = Vec::with_capacity(request.file_to_generate.len());

    for file_name in &request.file_to_generate {
        debug!(file = %file_name, "processing");

        let model = twirp_unity_parser::extract(&request.proto_file, file_name).map_err(|source| {
            BatchError {
                file: file_name.clone(),
                stage: Stage::Descriptor,
                source,
            }
        })?;

        let content = renderer.render(&model).map_err(|source| BatchError {
            file: file_name.clone(),
            stage: Stage::Generate,
            source,
        })?;

        files.push(File {
            name: Some(output_file_name(file_name)),
            content: Some(content),
            ..Default::default()
        });
    }

    Ok(files)
}

fn error_response(error: String) -> CodeGeneratorResponse {
    CodeGeneratorResponse {
        error: Some(error),
        supported_features: Some(SUPPORTED_FEATURES),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockClientRenderer;
    use prost_types::{FileDescriptorProto, ServiceDescriptorProto};

    fn file(name: &str, package: &str, service: &str) -> FileDescriptorProto {
        FileDescriptorProto {
            name: Some(name.to_string()),
            package: Some(package.to_string()),
            service: vec![ServiceDescriptorProto {
                name: Some(service.to_string()),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn request(files_to_generate: &[&str]) -> CodeGeneratorRequest {
        CodeGeneratorRequest {
            file_to_generate: files_to_generate.iter().map(|f| f.to_string()).collect(),
            proto_file: vec![file("a.proto", "a", "Alpha"), file("b.proto", "b", "Beta")],
            ..Default::default()
        }
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Descriptor.to_string(), "descriptor");
        assert_eq!(Stage::Generate.to_string(), "generate");
    }

    #[test]
    fn test_files_in_request_order() {
        let mut renderer = MockClientRenderer::new();
        renderer
            .expect_render()
            .times(2)
            .returning(|model| Ok(format!("// {}", model.services[0].name)));

        let response = generate_with(&request(&["b.proto", "a.proto"]), &renderer);

        assert!(response.error.is_none());
        let names: Vec<&str> = response.file.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["BTwirp.cs", "ATwirp.cs"]);
        assert_eq!(response.file[0].content(), "// Beta");
        assert_eq!(response.supported_features, Some(SUPPORTED_FEATURES));
    }

    #[test]
    fn test_missing_descriptor_aborts_before_rendering() {
        let mut renderer = MockClientRenderer::new();
        renderer.expect_render().times(0);

        let response = generate_with(&request(&["missing.proto", "a.proto"]), &renderer);

        assert!(response.file.is_empty());
        let error = response.error.unwrap();
        assert!(error.starts_with("File[missing.proto][descriptor]: "));
        assert!(error.contains("could not find descriptor"));
    }

    #[test]
    fn test_render_failure_discards_earlier_files() {
        let mut renderer = MockClientRenderer::new();
        renderer.expect_render().times(2).returning(|model| {
            if model.file_name == "b.proto" {
                Err(GeneratorError::Render("boom".to_string()))
            } else {
                Ok(String::new())
            }
        });

        let response = generate_with(&request(&["a.proto", "b.proto"]), &renderer);

        assert!(response.file.is_empty());
        assert_eq!(
            response.error.as_deref(),
            Some("File[b.proto][generate]: render error: boom")
        );
    }

    #[test]
    fn test_invalid_parameter() {
        let mut req = request(&["a.proto"]);
        req.parameter = Some("bogus=1".to_string());

        let response = generate(&req);

        assert!(response.file.is_empty());
        assert!(response.error.unwrap().starts_with("parameter: "));
    }

    #[test]
    fn test_empty_request() {
        let response = generate(&CodeGeneratorRequest::default());
        assert!(response.error.is_none());
        assert!(response.file.is_empty());
    }
}
