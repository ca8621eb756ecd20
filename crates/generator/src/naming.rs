//! Output file naming

/// Appended to every generated file name
pub const OUTPUT_SUFFIX: &str = "Twirp.cs";

/// Derive the generated file name from a proto file path
///
/// The directory part is kept as-is; the basename loses its extension and is
/// title-cased into PascalCase.
///
/// Examples:
/// - "foo_service.proto" -> "FooServiceTwirp.cs"
/// - "a.proto" -> "ATwirp.cs"
/// - "echo/v1/echo.proto" -> "echo/v1/EchoTwirp.cs"
pub fn output_file_name(proto_file: &str) -> String {
    let (dir, base) = match proto_file.rfind('/') {
        Some(idx) => proto_file.split_at(idx + 1),
        None => ("", proto_file),
    };

    let stem = match base.rfind('.') {
        Some(idx) if idx > 0 => &base[..idx],
        _ => base,
    };

    format!("{}{}{}", dir, title_case(stem), OUTPUT_SUFFIX)
}

/// Upper-case the first letter of every word and drop the separators
fn title_case(s: &str) -> String {
    s.split(|c: char| c == '_' || c == '-' || c == '.' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
