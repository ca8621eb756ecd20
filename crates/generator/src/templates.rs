//! Template loading and management

use std::collections::HashMap;
use tera::{Tera, Value};
use twirp_unity_common::{GeneratorError, Result};

/// Name the client template is registered under
pub const CLIENT_TEMPLATE: &str = "twirp_client.cs";

/// Load all templates
pub fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();

    // Generated C# is never HTML-escaped
    tera.autoescape_on(vec![]);

    tera.register_filter("csharp_string", csharp_string_filter);

    tera.add_raw_template(
        CLIENT_TEMPLATE,
        include_str!("../templates/twirp_client.cs.tera"),
    )
    .map_err(|e| {
        GeneratorError::Render(format!("Failed to load {} template: {}", CLIENT_TEMPLATE, e))
    })?;

    Ok(tera)
}

/// Filter to escape a value for use inside a C# string literal
fn csharp_string_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("csharp_string filter expects a string"))?;

    let mut escaped = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(ch),
        }
    }

    Ok(Value::String(escaped))
}
