//! Intermediate representation handed from the extractor to the renderer
//!
//! A `RenderModel` is built fresh for one proto file, rendered once and
//! dropped. Every field is always populated, possibly with empty values, so
//! templates never see a missing key.

use serde::{Deserialize, Serialize};

/// One proto file projected into the shape the client template expects
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderModel {
    /// Proto file path as recorded in the descriptor (e.g., "echo/v1/echo.proto")
    pub file_name: String,

    /// C# namespace holding the message types
    pub namespace: String,

    /// Services in declaration order
    pub services: Vec<ServiceModel>,
}

/// A proto service, rendered as one `<Name>Client` class
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceModel {
    pub name: String,

    /// Routing prefix, `<package>.<service>`
    pub service_url: String,

    /// Methods in declaration order
    pub methods: Vec<MethodModel>,
}

/// A single RPC
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodModel {
    /// Copied from the parent service
    pub service_url: String,

    /// Copied from the parent service
    pub service_name: String,

    pub name: String,

    /// Unqualified request type name
    pub input: String,

    /// Unqualified response type name
    pub output: String,
}

impl MethodModel {
    /// Wire path the generated client posts to, `<service_url>/<method>`
    pub fn route(&self) -> String {
        format!("{}/{}", self.service_url, self.name)
    }
}

impl RenderModel {
    /// Total number of RPCs across all services
    pub fn method_count(&self) -> usize {
        self.services.iter().map(|s| s.methods.len()).sum()
    }
}
