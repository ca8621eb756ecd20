//! Plugin options parsed from the protoc parameter string
//!
//! protoc forwards `--twirp_unity_opt=key=value,key=value` verbatim as the
//! request's `parameter` field.

use crate::GeneratorError;
use std::str::FromStr;

/// Default value of the generated `serverPathPrefix` constructor argument
pub const DEFAULT_SERVER_PATH_PREFIX: &str = "twirp";

/// Generator configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Baked into each client constructor as the optional prefix default
    pub server_path_prefix: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            server_path_prefix: DEFAULT_SERVER_PATH_PREFIX.to_string(),
        }
    }
}

impl GeneratorOptions {
    /// Parse the optional protoc parameter; absent or blank means defaults
    pub fn from_parameter(parameter: Option<&str>) -> crate::Result<Self> {
        match parameter {
            Some(p) => p.parse(),
            None => Ok(Self::default()),
        }
    }

    /// Override the server path prefix
    pub fn with_server_path_prefix(mut self, prefix: impl Into<String>) -> crate::Result<Self> {
        let prefix = prefix.into();
        validate_prefix(&prefix)?;
        self.server_path_prefix = prefix;
        Ok(self)
    }
}

impl FromStr for GeneratorOptions {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut options = Self::default();

        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (key, value) = entry.split_once('=').ok_or_else(|| {
                GeneratorError::InvalidParameter(format!("expected key=value, got '{}'", entry))
            })?;

            match key.trim() {
                "prefix" => options = options.with_server_path_prefix(value.trim())?,
                other => {
                    return Err(GeneratorError::InvalidParameter(format!(
                        "unknown option '{}'",
                        other
                    )))
                }
            }
        }

        Ok(options)
    }
}

/// The prefix ends up inside a C# string literal
fn validate_prefix(prefix: &str) -> crate::Result<()> {
    if prefix.chars().any(|c| c == '"' || c == '\\' || c.is_control()) {
        return Err(GeneratorError::InvalidParameter(format!(
            "prefix '{}' contains characters not allowed in a string literal",
            prefix.escape_default()
        )));
    }
    Ok(())
}
