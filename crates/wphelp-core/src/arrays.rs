//! Array and ordered-map helpers.
//!
//! Keyed collections are `serde_json` maps with insertion order preserved,
//! so "after key X" and "at the front" have a stable meaning.

use crate::error::{HelperError, Result};
use serde_json::{Map, Value};

/// Return a copy of `map` with `elements` inserted right after `key`.
///
/// If `key` is absent the result equals `map`. An inserted key that already
/// exists keeps its original position and takes the inserted value.
///
/// ```
/// use serde_json::{json, Map, Value};
/// use wphelp_core::arrays::insert_after;
///
/// let base = json!({"item_1": "foo", "item_2": "bar"});
/// let extra = json!({"item_1.5": "w00t"});
/// let out = insert_after(
///     base.as_object().unwrap(),
///     "item_1",
///     extra.as_object().unwrap(),
/// );
/// let keys: Vec<_> = out.keys().map(String::as_str).collect();
/// assert_eq!(keys, ["item_1", "item_1.5", "item_2"]);
/// ```
pub fn insert_after(
    map: &Map<String, Value>,
    key: &str,
    elements: &Map<String, Value>,
) -> Map<String, Value> {
    let mut out = Map::new();
    for (k, v) in map {
        out.insert(k.clone(), v.clone());
        if k == key {
            for (ek, ev) in elements {
                out.insert(ek.clone(), ev.clone());
            }
        }
    }
    out
}

/// Check whether `haystack` contains `needle`.
///
/// Arrays are searched by element, objects by value. With `strict` the type
/// and value must both match; otherwise the comparison is loose (see
/// [`loose_eq`]). Any other haystack is an `InvalidArgumentType` error.
pub fn includes(haystack: &Value, needle: &Value, strict: bool) -> Result<bool> {
    let matches = |candidate: &Value| {
        if strict {
            candidate == needle
        } else {
            loose_eq(candidate, needle)
        }
    };
    match haystack {
        Value::Array(items) => Ok(items.iter().any(matches)),
        Value::Object(map) => Ok(map.values().any(matches)),
        other => Err(HelperError::InvalidArgumentType(format!(
            "haystack must be an array or object, found {}",
            type_name(other)
        ))),
    }
}

/// Loose equality between two JSON values.
///
/// - numbers compare by value, also against numeric strings
/// - a boolean compares against the truthiness of the other side
/// - null equals any falsy value
/// - arrays and objects compare structurally
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, other) | (other, Value::Null) => !truthy(other),
        (Value::Bool(x), other) | (other, Value::Bool(x)) => *x == truthy(other),
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            match s.trim().parse::<f64>() {
                Ok(parsed) => n.as_f64() == Some(parsed),
                Err(_) => false,
            }
        }
        (Value::String(x), Value::String(y)) => x == y,
        _ => a == b,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Insert `items` so the first of them lands at 1-based `position`.
///
/// Positions past the end append; position 0 behaves like 1.
pub fn insert_at<T, I>(vec: &mut Vec<T>, items: I, position: usize)
where
    I: IntoIterator<Item = T>,
{
    let index = position.saturating_sub(1).min(vec.len());
    vec.splice(index..index, items);
}

/// Push `value` onto the front of `vec`.
pub fn prepend<T>(vec: &mut Vec<T>, value: T) {
    vec.insert(0, value);
}

/// Put `key` first in `map` with `value`, dropping any previous entry for it.
pub fn prepend_keyed(map: &mut Map<String, Value>, key: impl Into<String>, value: Value) {
    let key = key.into();
    let rest = std::mem::take(map);
    map.insert(key.clone(), value);
    for (k, v) in rest {
        if k != key {
            map.insert(k, v);
        }
    }
}

/// Remove the first element equal to `value`, or push it if none is found.
pub fn toggle<T: PartialEq>(vec: &mut Vec<T>, value: T) {
    match vec.iter().position(|item| *item == value) {
        Some(index) => {
            vec.remove(index);
        }
        None => vec.push(value),
    }
}

/// True for values that can be indexed by key: arrays and objects.
pub fn is_accessible(value: &Value) -> bool {
    value.is_array() || value.is_object()
}

/// True if `key` names an object member or a valid array index of `value`.
pub fn exists(value: &Value, key: &str) -> bool {
    match value {
        Value::Object(map) => map.contains_key(key),
        Value::Array(items) => key.parse::<usize>().is_ok_and(|i| i < items.len()),
        _ => false,
    }
}
