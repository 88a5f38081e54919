//! Keyed (JSON) representation of markup documents.
//!
//! The keyed form is a plain JSON object in which two reserved keys carry
//! metadata instead of naming child elements:
//!
//! - `@attributes`: an object of attribute name → scalar for the enclosing element
//! - `@value`: raw text content of the enclosing element
//!
//! Runs of sibling elements with the same name are written as an array, or
//! (for compatibility with older producers) as an object whose keys are
//! `0`, `1`, ... . See [`SequenceDetection`].
//!
//! This module converts between the keyed form and the tagged model in
//! [`crate::types`].

use crate::encoder::looks_numeric;
use crate::error::{HelperError, Result};
use crate::types::{Child, Element, Node, Scalar};
use serde::Deserialize;
use serde_json::{Map, Number, Value};

/// Reserved key holding an element's attribute bag.
pub const ATTRIBUTES_KEY: &str = "@attributes";

/// Reserved key holding an element's raw text content.
pub const VALUE_KEY: &str = "@value";

/// How a keyed object is recognized as a run of sibling records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SequenceDetection {
    /// An object whose *first* key is numeric is a sequence, as are arrays.
    ///
    /// Only the first key is inspected, so `{"0": .., "name": ..}` is treated
    /// as a sequence of two records. This matches the output of older
    /// producers and is the default.
    #[default]
    FirstKeyNumeric,
    /// Only JSON arrays are sequences. Objects always become elements.
    ArraysOnly,
}

/// Convert one keyed entry into a [`Child`].
///
/// `key` decides the kind of child: [`ATTRIBUTES_KEY`] yields
/// [`Child::Attributes`], [`VALUE_KEY`] with a scalar yields [`Child::Text`],
/// anything else yields a [`Child::Element`] named `key`.
pub fn child_from_keyed(key: &str, value: &Value, detection: SequenceDetection) -> Result<Child> {
    if key == ATTRIBUTES_KEY {
        return attributes_from_keyed(value).map(Child::Attributes);
    }
    match value {
        Value::Object(_) | Value::Array(_) => Ok(Child::Element(Element {
            name: key.to_string(),
            node: node_from_keyed(value, detection)?,
        })),
        scalar => {
            let scalar = scalar_from_json(scalar)?;
            if key == VALUE_KEY {
                Ok(Child::Text(scalar))
            } else {
                Ok(Child::Element(Element {
                    name: key.to_string(),
                    node: Node::Scalar(scalar),
                }))
            }
        }
    }
}

/// Convert the value side of a keyed entry into a [`Node`].
fn node_from_keyed(value: &Value, detection: SequenceDetection) -> Result<Node> {
    match value {
        Value::Array(items) if items.is_empty() => Ok(Node::Children(Vec::new())),
        Value::Array(items) => items
            .iter()
            .map(|item| record_from_keyed(item, detection))
            .collect::<Result<Vec<_>>>()
            .map(Node::Sequence),
        Value::Object(map) if map.is_empty() => Ok(Node::Children(Vec::new())),
        Value::Object(map) if is_sequence_object(map, detection) => map
            .values()
            .map(|item| record_from_keyed(item, detection))
            .collect::<Result<Vec<_>>>()
            .map(Node::Sequence),
        Value::Object(map) => fields_from_keyed(map, detection).map(Node::Children),
        scalar => scalar_from_json(scalar).map(Node::Scalar),
    }
}

/// One item of a sequence. Object items are records whose fields become the
/// children of the repeated element, without a second round of sequence
/// detection on the record itself.
fn record_from_keyed(item: &Value, detection: SequenceDetection) -> Result<Node> {
    match item {
        Value::Object(map) => fields_from_keyed(map, detection).map(Node::Children),
        other => node_from_keyed(other, detection),
    }
}

fn fields_from_keyed(map: &Map<String, Value>, detection: SequenceDetection) -> Result<Vec<Child>> {
    map.iter()
        .map(|(key, value)| child_from_keyed(key, value, detection))
        .collect()
}

fn is_sequence_object(map: &Map<String, Value>, detection: SequenceDetection) -> bool {
    match detection {
        SequenceDetection::FirstKeyNumeric => map.keys().next().is_some_and(|k| looks_numeric(k)),
        SequenceDetection::ArraysOnly => false,
    }
}

fn attributes_from_keyed(value: &Value) -> Result<Vec<(String, Scalar)>> {
    let map = value.as_object().ok_or_else(|| {
        HelperError::InvalidArgumentType(format!(
            "{} must be an object of name/value pairs",
            ATTRIBUTES_KEY
        ))
    })?;
    map.iter()
        .map(|(name, v)| Ok((name.clone(), scalar_from_json(v)?)))
        .collect()
}

fn scalar_from_json(value: &Value) -> Result<Scalar> {
    match value {
        Value::Null => Ok(Scalar::Null),
        Value::Bool(b) => Ok(Scalar::Bool(*b)),
        Value::Number(n) => Ok(scalar_from_number(n)),
        Value::String(s) => Ok(Scalar::String(s.clone())),
        Value::Array(_) | Value::Object(_) => Err(HelperError::InvalidArgumentType(
            "expected a scalar, found an array or object".into(),
        )),
    }
}

fn scalar_from_number(n: &Number) -> Scalar {
    if let Some(i) = n.as_i64() {
        return Scalar::Integer(i);
    }
    // Above i64::MAX: keep the exact digits rather than an f64 approximation.
    if let Some(u) = n.as_u64() {
        return Scalar::String(u.to_string());
    }
    Scalar::Float(n.as_f64().unwrap_or(0.0))
}

/// Convert an element back into keyed form: `{ name: content }`.
///
/// ```
/// use serde_json::json;
/// use wphelp_core::keyed::to_keyed;
/// use wphelp_core::types::{Child, Element, Node};
///
/// let e = Element::new("order", Node::children([
///     Child::attributes([("id", "5")]),
///     Child::element("id", 1),
/// ]));
/// assert_eq!(to_keyed(&e), json!({"order": {"@attributes": {"id": "5"}, "id": 1}}));
/// ```
pub fn to_keyed(element: &Element) -> Value {
    let mut map = Map::new();
    map.insert(element.name.clone(), node_to_keyed(&element.node));
    Value::Object(map)
}

/// Convert a node into the value side of a keyed entry.
///
/// Repeated child elements with the same name are gathered into an array at
/// the position of the first occurrence.
pub fn node_to_keyed(node: &Node) -> Value {
    match node {
        Node::Scalar(s) => scalar_to_json(s),
        Node::Sequence(items) => Value::Array(items.iter().map(node_to_keyed).collect()),
        Node::Children(children) => {
            let mut map = Map::new();
            for child in children {
                match child {
                    Child::Attributes(pairs) => {
                        let attrs = map
                            .entry(ATTRIBUTES_KEY)
                            .or_insert_with(|| Value::Object(Map::new()));
                        if let Value::Object(attrs) = attrs {
                            for (name, value) in pairs {
                                attrs.insert(name.clone(), scalar_to_json(value));
                            }
                        }
                    }
                    Child::Text(s) => {
                        map.insert(VALUE_KEY.to_string(), scalar_to_json(s));
                    }
                    Child::Element(e) => merge_element(&mut map, &e.name, node_to_keyed(&e.node)),
                }
            }
            Value::Object(map)
        }
    }
}

fn merge_element(map: &mut Map<String, Value>, name: &str, value: Value) {
    match map.get_mut(name) {
        None => {
            map.insert(name.to_string(), value);
        }
        Some(Value::Array(items)) => match value {
            Value::Array(more) => items.extend(more),
            other => items.push(other),
        },
        Some(existing) => {
            let first = existing.take();
            let mut items = vec![first];
            match value {
                Value::Array(more) => items.extend(more),
                other => items.push(other),
            }
            *existing = Value::Array(items);
        }
    }
}

fn scalar_to_json(scalar: &Scalar) -> Value {
    match scalar {
        Scalar::Null => Value::Null,
        Scalar::Bool(b) => Value::Bool(*b),
        Scalar::Integer(i) => Value::Number(Number::from(*i)),
        Scalar::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
        Scalar::String(s) => Value::String(s.clone()),
    }
}
