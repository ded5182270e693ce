//! Document tree aliases shared by the loader, resolver and binder

use serde_json::{Map, Value};

/// A parsed configuration tree (mappings keep insertion order)
pub type Document = Value;

/// A mapping node: the keyword arguments handed to a component
pub type Fragment = Map<String, Value>;

/// Reserved key selecting a variant in a one-of set
pub const DISCRIMINATOR_KEY: &str = "type";

/// Short name of a node's shape, for error messages
pub fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

/// Compact rendering of a node for error messages
pub(crate) fn preview(value: &Value) -> String {
    const MAX: usize = 60;
    let rendered = value.to_string();
    if rendered.chars().count() <= MAX {
        return rendered;
    }
    let cut: String = rendered.chars().take(MAX).collect();
    format!("{cut}...")
}
