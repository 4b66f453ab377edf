//! Bidirectional key-case translation between the wire format and the host
//! naming convention.
//!
//! The wire speaks lowerCamelCase; the host speaks snake_case. Scalar values
//! are never touched — only map keys are translated, element-wise through
//! arrays and recursively through nested objects.

use serde_json::Value;

/// Convert a snake_case name to lowerCamelCase.
///
/// The first segment is kept verbatim; subsequent segments have their first
/// character uppercased. Digits stay attached to their segment.
pub fn lower_camel(name: &str) -> String {
    let mut parts = name.split('_');
    let mut out = String::with_capacity(name.len());

    if let Some(first) = parts.next() {
        out.push_str(first);
    }
    for part in parts {
        let mut chars = part.chars();
        if let Some(c) = chars.next() {
            out.extend(c.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Convert a lowerCamelCase name to snake_case.
///
/// A boundary is inserted before an uppercase character that follows a
/// lowercase character or digit, and before the last uppercase character of
/// an acronym run when a lowercase character follows.
pub fn snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let boundary = match i.checked_sub(1).map(|p| chars[p]) {
                None => false,
                Some(prev) => {
                    prev.is_lowercase()
                        || prev.is_ascii_digit()
                        || (prev.is_uppercase()
                            && chars.get(i + 1).is_some_and(|n| n.is_lowercase()))
                }
            };
            if boundary {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Recursively translate all object keys from lowerCamelCase to snake_case.
pub fn keys_to_snake(value: &Value) -> Value {
    transform_keys(value, &snake)
}

/// Recursively translate all object keys from snake_case to lowerCamelCase.
pub fn keys_to_camel(value: &Value) -> Value {
    transform_keys(value, &lower_camel)
}

fn transform_keys(value: &Value, translate: &dyn Fn(&str) -> String) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| transform_keys(item, translate))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, val)| (translate(key), transform_keys(val, translate)))
                .collect(),
        ),
        other => other.clone(),
    }
}
