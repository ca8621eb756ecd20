//! Twirp client generation for Unity
//!
//! This crate renders a `RenderModel` into C# source through a tera template
//! and assembles the protoc `CodeGeneratorResponse` for a whole request.

mod driver;
mod naming;
mod templates;

pub use driver::{generate, generate_with, BatchError, Stage, SUPPORTED_FEATURES};
pub use naming::{output_file_name, OUTPUT_SUFFIX};

use prost_types::compiler::code_generator_response::File;
use std::error::Error as _;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tera::Tera;
use tracing::debug;
use twirp_unity_common::{GeneratorError, GeneratorOptions, RenderModel, Result};

/// Renders a model into generated source text
///
/// The batch driver only depends on this seam, so it can run against any
/// renderer.
#[cfg_attr(test, mockall::automock)]
pub trait ClientRenderer {
    fn render(&self, model: &RenderModel) -> Result<String>;
}

/// Twirp client generator
///
/// Transforms a RenderModel into one C# file containing a
/// `<Service>Client : TwirpClient` class per service.
pub struct TwirpClientGenerator {
    options: GeneratorOptions,
    tera: Tera,
}

impl TwirpClientGenerator {
    /// Create a new generator, loading the embedded templates
    pub fn new(options: GeneratorOptions) -> Result<Self> {
        let tera = templates::load_templates()?;
        Ok(Self { options, tera })
    }

    /// Render the model and wrap it in a response file record
    pub fn generate_file(&self, model: &RenderModel) -> Result<File> {
        let content = self.render(model)?;
        Ok(File {
            name: Some(output_file_name(&model.file_name)),
            content: Some(content),
            ..Default::default()
        })
    }

    /// Create template context from RenderModel
    fn create_context(&self, model: &RenderModel) -> tera::Context {
        let mut context = tera::Context::new();
        context.insert("file_name", &model.file_name);
        context.insert("namespace", &model.namespace);
        context.insert("services", &model.services);
        context.insert("server_path_prefix", &self.options.server_path_prefix);
        context
    }
}

impl ClientRenderer for TwirpClientGenerator {
    fn render(&self, model: &RenderModel) -> Result<String> {
        let context = self.create_context(model);
        let rendered = self
            .tera
            .render(templates::CLIENT_TEMPLATE, &context)
            .map_err(|e| GeneratorError::Render(describe_tera_error(&e)))?;

        debug!(
            file = %model.file_name,
            services = model.services.len(),
            methods = model.method_count(),
            bytes = rendered.len(),
            "rendered client"
        );

        Ok(rendered)
    }
}

/// Tera keeps the useful detail in the source chain
fn describe_tera_error(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Write generated files below `output_dir`, creating directories as needed
///
/// Returns the paths written, in input order.
pub fn write_files(files: &[File], output_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(files.len());

    for file in files {
        let name = file.name();
        let relative = Path::new(name);
        if name.is_empty() || relative.components().any(|c| !matches!(c, Component::Normal(_))) {
            return Err(GeneratorError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("refusing to write generated file outside output directory: '{}'", name),
            )));
        }

        let output_path = output_dir.join(relative);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, file.content())?;

        debug!(path = %output_path.display(), "wrote generated file");
        written.push(output_path);
    }

    Ok(written)
}
