//! JSON conversion for PHP values.
//!
//! This module provides conversion from [`Value`] to JSON using serde_json.
//! Enable the `json` feature to use this module.

use serde_json::{json, Map, Value as JsonValue};

use crate::value::{Array, ArrayKey, Object, Value, Visibility};

/// Convert a PHP value to a JSON value.
///
/// # Mapping Rules
///
/// | PHP Type | JSON Type |
/// |----------|-----------|
/// | `null` | `null` |
/// | `bool` | `boolean` |
/// | `int` | `number` |
/// | `float` | `number` (or `null` for NaN, `"Infinity"`/`"-Infinity"`) |
/// | `string` | `string` (lossy UTF-8 conversion) |
/// | `array` (keys 0..n in order) | `array` |
/// | `array` (other keys) | `object` |
/// | `object` | `object` with `__class__` field |
///
/// Protected fields are keyed `*name`, private fields `Class::name`.
///
/// # Example
///
/// ```rust
/// use php_serialize_core::{from_bytes, json::to_json};
///
/// let data = br#"a:2:{s:4:"name";s:5:"Alice";s:3:"age";i:30;}"#;
/// let php_value = from_bytes(data).unwrap();
/// let json = to_json(&php_value);
/// assert_eq!(json, serde_json::json!({"name": "Alice", "age": 30}));
/// ```
pub fn to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Int(i) => json!(*i),
        Value::Float(f) => {
            if f.is_nan() {
                JsonValue::Null
            } else if f.is_infinite() {
                if f.is_sign_positive() {
                    json!("Infinity")
                } else {
                    json!("-Infinity")
                }
            } else {
                json!(*f)
            }
        }
        Value::String(s) => JsonValue::String(String::from_utf8_lossy(s).into_owned()),
        Value::Array(items) => array_to_json(items),
        Value::Object(object) => object_to_json(object),
    }
}

fn array_to_json(items: &Array) -> JsonValue {
    let is_list = items
        .keys()
        .enumerate()
        .all(|(i, k)| matches!(k, ArrayKey::Int(idx) if usize::try_from(*idx) == Ok(i)));

    if is_list {
        return JsonValue::Array(items.iter().map(|(_, v)| to_json(v)).collect());
    }

    // Later duplicates overwrite earlier ones, as PHP's json_encode would.
    let mut map = Map::new();
    for (k, v) in items {
        map.insert(k.to_string(), to_json(v));
    }
    JsonValue::Object(map)
}

fn object_to_json(object: &Object) -> JsonValue {
    let mut map = Map::new();
    map.insert("__class__".to_string(), json!(object.name()));

    for field in object.fields() {
        let key = match field.visibility {
            Visibility::Public => field.name.clone(),
            Visibility::Protected => format!("*{}", field.name),
            Visibility::Private => format!("{}::{}", object.name(), field.name),
        };
        map.insert(key, to_json(&field.value));
    }

    JsonValue::Object(map)
}

/// Convert a PHP value to a JSON string.
///
/// # Example
///
/// ```rust
/// use php_serialize_core::{from_bytes, json::to_json_string};
///
/// let data = br#"a:2:{s:4:"name";s:5:"Alice";s:3:"age";i:30;}"#;
/// let php_value = from_bytes(data).unwrap();
/// let json_str = to_json_string(&php_value).unwrap();
/// // JSON key order is not guaranteed, so check contents
/// assert!(json_str.contains(r#""name":"Alice""#));
/// assert!(json_str.contains(r#""age":30"#));
/// ```
pub fn to_json_string(value: &Value) -> serde_json::Result<String> {
    serde_json::to_string(&to_json(value))
}

/// Convert a PHP value to a pretty-printed JSON string.
pub fn to_json_string_pretty(value: &Value) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&to_json(value))
}
