//! Converts protobuf descriptors to the RenderModel IR

use prost_types::{FileDescriptorProto, MethodDescriptorProto, ServiceDescriptorProto};
use tracing::debug;
use twirp_unity_common::{MethodModel, RenderModel, ServiceModel};

/// Convert one file descriptor into a RenderModel
///
/// Missing optional fields degrade to empty strings and lists; this never
/// fails because protoc has already validated the file.
pub fn extract_render_model(fd: &FileDescriptorProto) -> RenderModel {
    let package = fd.package();

    let namespace = match fd.options.as_ref().and_then(|o| o.csharp_namespace.as_deref()) {
        Some(explicit) => explicit.to_string(),
        None => capitalize_package(package),
    };

    let services = fd
        .service
        .iter()
        .map(|svc| convert_service(package, svc))
        .collect::<Vec<_>>();

    debug!(
        file = fd.name(),
        namespace = %namespace,
        services = services.len(),
        "extracted render model"
    );

    RenderModel {
        file_name: fd.name().to_string(),
        namespace,
        services,
    }
}

fn convert_service(package: &str, svc: &ServiceDescriptorProto) -> ServiceModel {
    let url = service_url(package, svc.name());

    let methods = svc
        .method
        .iter()
        .map(|m| convert_method(&url, svc.name(), m))
        .collect();

    ServiceModel {
        name: svc.name().to_string(),
        service_url: url,
        methods,
    }
}

fn convert_method(service_url: &str, service_name: &str, m: &MethodDescriptorProto) -> MethodModel {
    MethodModel {
        service_url: service_url.to_string(),
        service_name: service_name.to_string(),
        name: m.name().to_string(),
        input: bare_type_name(m.input_type()).to_string(),
        output: bare_type_name(m.output_type()).to_string(),
    }
}

/// Build the Twirp routing prefix for a service
///
/// Uses the raw package, never the capitalized namespace. Services declared
/// without a package are routed by their bare name.
///
/// Examples:
/// - ("my.pkg", "Greeter") -> "my.pkg.Greeter"
/// - ("", "Greeter") -> "Greeter"
pub fn service_url(package: &str, service_name: &str) -> String {
    if package.is_empty() {
        service_name.to_string()
    } else {
        format!("{}.{}", package, service_name)
    }
}

/// Strip the package qualification from a type name
///
/// Examples:
/// - ".my.pkg.HelloRequest" -> "HelloRequest"
/// - "HelloRequest" -> "HelloRequest"
pub fn bare_type_name(type_name: &str) -> &str {
    match type_name.rfind('.') {
        Some(idx) => &type_name[idx + 1..],
        None => type_name,
    }
}

/// Capitalize the first letter of every dot-separated package segment
///
/// Examples:
/// - "my.pkg" -> "My.Pkg"
/// - "acme.v1_beta" -> "Acme.V1_beta"
pub fn capitalize_package(package: &str) -> String {
    package
        .split('.')
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(".")
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost_types::FileOptions;

    fn method(name: &str, input: &str, output: &str) -> MethodDescriptorProto {
        MethodDescriptorProto {
            name: Some(name.to_string()),
            input_type: Some(input.to_string()),
            output_type: Some(output.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_capitalize_package() {
        assert_eq!(capitalize_package("my.pkg"), "My.Pkg");
        assert_eq!(capitalize_package("a"), "A");
        assert_eq!(capitalize_package(""), "");
        assert_eq!(capitalize_package("acme.v1_beta"), "Acme.V1_beta");
    }

    #[test]
    fn test_capitalize_package_is_idempotent() {
        for pkg in ["my.pkg", "Already.Capitalized", "mixed.Case.seg", "x"] {
            let once = capitalize_package(pkg);
            assert_eq!(capitalize_package(&once), once);
        }
    }

    #[test]
    fn test_bare_type_name() {
        assert_eq!(bare_type_name(".my.pkg.HelloRequest"), "HelloRequest");
        assert_eq!(bare_type_name("pkg.Outer.Inner"), "Inner");
        assert_eq!(bare_type_name("Unqualified"), "Unqualified");
        assert_eq!(bare_type_name(""), "");
    }

    #[test]
    fn test_service_url() {
        assert_eq!(service_url("my.pkg", "Greeter"), "my.pkg.Greeter");
        assert_eq!(service_url("", "Greeter"), "Greeter");
    }

    #[test]
    fn test_service_url_uses_raw_package() {
        let fd = FileDescriptorProto {
            name: Some("greeter.proto".to_string()),
            package: Some("my.pkg".to_string()),
            service: vec![ServiceDescriptorProto {
                name: Some("Greeter".to_string()),
                method: vec![method("SayHello", ".my.pkg.HelloRequest", ".my.pkg.HelloReply")],
                ..Default::default()
            }],
            ..Default::default()
        };

        let model = extract_render_model(&fd);
        assert_eq!(model.namespace, "My.Pkg");
        assert_eq!(model.services[0].service_url, "my.pkg.Greeter");
        assert_eq!(model.services[0].methods[0].route(), "my.pkg.Greeter/SayHello");
    }

    #[test]
    fn test_namespace_override_is_verbatim() {
        let fd = FileDescriptorProto {
            name: Some("a.proto".to_string()),
            package: Some("my.pkg".to_string()),
            options: Some(FileOptions {
                csharp_namespace: Some("acme.lowercase.Api".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let model = extract_render_model(&fd);
        assert_eq!(model.namespace, "acme.lowercase.Api");
    }

    #[test]
    fn test_methods_copy_parent_service() {
        let fd = FileDescriptorProto {
            name: Some("a.proto".to_string()),
            package: Some("a".to_string()),
            service: vec![ServiceDescriptorProto {
                name: Some("Echo".to_string()),
                method: vec![method("Do", ".a.DoRequest", ".a.DoResponse")],
                ..Default::default()
            }],
            ..Default::default()
        };

        let model = extract_render_model(&fd);
        let m = &model.services[0].methods[0];
        assert_eq!(m.service_name, "Echo");
        assert_eq!(m.service_url, "a.Echo");
        assert_eq!(m.input, "DoRequest");
        assert_eq!(m.output, "DoResponse");
    }

    #[test]
    fn test_missing_fields_degrade_to_empty() {
        let fd = FileDescriptorProto {
            service: vec![ServiceDescriptorProto {
                method: vec![MethodDescriptorProto::default()],
                ..Default::default()
            }],
            ..Default::default()
        };

        let model = extract_render_model(&fd);
        assert_eq!(model.file_name, "");
        assert_eq!(model.namespace, "");
        assert_eq!(model.services.len(), 1);
        assert_eq!(model.services[0].name, "");
        assert_eq!(model.services[0].methods[0].input, "");
    }
}
