//! Common types and utilities for protoc-gen-twirp_unity
//!
//! This crate contains the intermediate representation shared by the
//! descriptor extractor and the template renderer, the error type, and the
//! plugin options parsed from the protoc parameter string.

mod model;
mod options;

pub use model::{MethodModel, RenderModel, ServiceModel};
pub use options::{GeneratorOptions, DEFAULT_SERVER_PATH_PREFIX};

use thiserror::Error;

/// Errors that can occur during client generation
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("could not find descriptor for file: {0}")]
    DescriptorNotFound(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("invalid plugin parameter: {0}")]
    InvalidParameter(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;
