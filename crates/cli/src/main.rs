//! protoc-gen-twirp_unity
//!
//! protoc plugin generating Twirp clients for Unity.
//!
//! Usage:
//!   protoc --twirp_unity_out=./Assets/Generated echo.proto
//!   protoc --twirp_unity_out=prefix=api:./Assets/Generated echo.proto
//!
//! Without a subcommand the binary speaks the plugin protocol: it reads a
//! `CodeGeneratorRequest` from stdin and writes a `CodeGeneratorResponse` to
//! stdout. Diagnostics go to stderr only.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use prost::Message;
use prost_types::compiler::CodeGeneratorRequest;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use twirp_unity_common::GeneratorOptions;
use twirp_unity_generator::{generate_with, write_files, TwirpClientGenerator};
use twirp_unity_parser::DescriptorExtractor;

#[derive(Parser)]
#[command(name = "protoc-gen-twirp_unity")]
#[command(version, about = "Generate Twirp clients for Unity from .proto services", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate clients from a FileDescriptorSet without running protoc as a driver
    #[command(after_help = "EXAMPLES:\n  \
        # Produce the descriptor set first\n  \
        protoc --include_imports --descriptor_set_out=api.pb echo.proto\n\n  \
        # Generate every file that declares a service\n  \
        protoc-gen-twirp_unity generate --descriptor-set api.pb --output ./Generated\n\n  \
        # Generate selected files with a custom route prefix\n  \
        protoc-gen-twirp_unity generate \\\n    \
        --descriptor-set api.pb \\\n    \
        --file echo.proto \\\n    \
        --prefix api \\\n    \
        --output ./Generated")]
    Generate {
        /// Path to a binary FileDescriptorSet
        #[arg(short, long)]
        descriptor_set: PathBuf,

        /// Proto file to generate, as recorded in the set (repeatable)
        #[arg(short, long = "file")]
        files: Vec<String>,

        /// Default server path prefix baked into client constructors
        #[arg(long)]
        prefix: Option<String>,

        /// Output directory
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,
    },

    /// Show the model extracted for one proto file as JSON
    Inspect {
        /// Path to a binary FileDescriptorSet
        #[arg(short, long)]
        descriptor_set: PathBuf,

        /// Proto file, as recorded in the set
        #[arg(short, long)]
        file: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        None => run_plugin(io::stdin().lock(), io::stdout().lock())?,
        Some(Commands::Generate {
            descriptor_set,
            files,
            prefix,
            output,
        }) => {
            generate_command(
                descriptor_set.as_path(),
                &files,
                prefix.as_deref(),
                output.as_path(),
                cli.verbose,
            )?;
        }
        Some(Commands::Inspect {
            descriptor_set,
            file,
        }) => {
            inspect_command(descriptor_set.as_path(), &file, cli.verbose)?;
        }
    }

    Ok(())
}

/// stdout belongs to the plugin protocol, so logs always go to stderr
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Read one request from `input`, write one response to `output`
fn run_plugin<R: Read, W: Write>(mut input: R, mut output: W) -> Result<()> {
    let mut bytes = Vec::new();
    input
        .read_to_end(&mut bytes)
        .context("couldn't read request from stdin")?;

    let request = CodeGeneratorRequest::decode(bytes.as_slice()).context(
        "couldn't parse CodeGeneratorRequest, make sure you're using this as a plugin to protoc",
    )?;
    debug!(
        files = request.file_to_generate.len(),
        descriptors = request.proto_file.len(),
        parameter = request.parameter(),
        "received request"
    );

    let response = twirp_unity_generator::generate(&request);

    output
        .write_all(&response.encode_to_vec())
        .context("couldn't write response to stdout")?;
    output.flush().context("couldn't flush stdout")?;

    Ok(())
}

fn generate_command(
    descriptor_set: &Path,
    files: &[String],
    prefix: Option<&str>,
    output: &Path,
    verbose: bool,
) -> Result<()> {
    println!(
        "{} Loading descriptor set: {}",
        "→".cyan(),
        descriptor_set.display()
    );
    let extractor =
        DescriptorExtractor::from_file(descriptor_set).context("Failed to load descriptor set")?;

    let file_to_generate: Vec<String> = if files.is_empty() {
        let discovered: Vec<String> = extractor
            .files_with_services()
            .into_iter()
            .map(String::from)
            .collect();
        println!(
            "{} Found {} files declaring services",
            "→".cyan(),
            discovered.len().to_string().yellow()
        );
        discovered
    } else {
        files.to_vec()
    };

    let mut options = GeneratorOptions::default();
    if let Some(prefix) = prefix {
        options = options
            .with_server_path_prefix(prefix)
            .context("Invalid --prefix")?;
    }

    if verbose {
        println!("  Files: {}", file_to_generate.join(", "));
        println!("  Prefix: {}", options.server_path_prefix);
        println!("  Output: {}", output.display());
    }

    let generator = TwirpClientGenerator::new(options).context("Failed to create generator")?;
    let request = CodeGeneratorRequest {
        file_to_generate,
        proto_file: extractor.files().to_vec(),
        ..Default::default()
    };

    println!("{} Generating clients...", "→".cyan());
    let response = generate_with(&request, &generator);
    if let Some(error) = response.error {
        bail!("Generation failed: {}", error);
    }

    let written = write_files(&response.file, output).context("Failed to write clients")?;

    println!("\n{}", "✓ Generation complete!".green().bold());
    println!("\n{}", "Generated files:".bold());
    for path in &written {
        println!("  📄 {}", path.display());
    }

    Ok(())
}

fn inspect_command(descriptor_set: &Path, file: &str, verbose: bool) -> Result<()> {
    let extractor =
        DescriptorExtractor::from_file(descriptor_set).context("Failed to load descriptor set")?;
    let model = extractor
        .extract(file)
        .with_context(|| format!("Failed to extract {}", file))?;

    if verbose {
        eprintln!(
            "{} {} services, {} methods, namespace {}",
            "✓".green(),
            model.services.len(),
            model.method_count(),
            model.namespace.yellow()
        );
    }

    println!("{}", serde_json::to_string_pretty(&model)?);
    Ok(())
}
