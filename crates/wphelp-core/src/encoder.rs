//! Structure-to-markup serializer.
//!
//! Walks a nested value and drives a [`MarkupWriter`]:
//!
//! - **Attributes** are attached to the element being written, before any of
//!   its children, wherever they appear among the fields
//! - **Sequences** become N sibling elements sharing one name
//! - **Records** (child lists) open one element and recurse into each field
//! - **Raw text** is written into the current element without a wrapper
//! - **Scalars** become `<key>text</key>`; text containing `<` or `>` is
//!   wrapped in CDATA instead of being entity-escaped
//!
//! Two input shapes are supported: the tagged model in [`crate::types`] and
//! the keyed JSON form in [`crate::keyed`], which is converted to the tagged
//! model first.
//!
//! # Example
//! ```
//! use wphelp_core::encoder::keyed_to_xml;
//! use wphelp_core::writer::WriterConfig;
//!
//! let json = r#"{"order":[{"id":1,"@attributes":{"id":"5"}}]}"#;
//! let xml = keyed_to_xml(json, &WriterConfig::default()).unwrap();
//! assert_eq!(xml, r#"<order id="5"><id>1</id></order>"#);
//! ```

use crate::error::{HelperError, Result};
use crate::keyed::{child_from_keyed, SequenceDetection};
use crate::types::{Child, Element, Node, Scalar};
use crate::writer::{MarkupWriter, WriterConfig, XmlWriter};
use serde_json::Value;
use tracing::debug;

/// Serialize a tagged element into a finished XML document.
pub fn to_xml(element: &Element, config: &WriterConfig) -> Result<String> {
    let mut writer = XmlWriter::new(config)?;
    write_element(&mut writer, &element.name, &element.node)?;
    writer.finish()
}

/// Serialize a keyed JSON document into XML.
///
/// The document must be a JSON object. Each top-level entry is serialized in
/// order, so `{"a":1,"b":2}` yields two sibling root elements.
pub fn keyed_to_xml(json: &str, config: &WriterConfig) -> Result<String> {
    let value: Value = serde_json::from_str(json)?;
    let map = value.as_object().ok_or_else(|| {
        HelperError::InvalidArgumentType("keyed document must be a JSON object".into())
    })?;
    let mut writer = XmlWriter::new(config)?;
    for (key, value) in map {
        serialize_keyed(&mut writer, key, value, config.sequence_detection)?;
    }
    writer.finish()
}

/// Serialize one keyed entry into `writer`.
///
/// This is the streaming form of [`keyed_to_xml`]: the caller owns the
/// writer, so attribute bags and `@value` text apply to whatever element the
/// caller currently has open.
pub fn serialize_keyed<W>(
    writer: &mut W,
    key: &str,
    value: &Value,
    detection: SequenceDetection,
) -> Result<()>
where
    W: MarkupWriter + ?Sized,
{
    let child = child_from_keyed(key, value, detection)?;
    write_child(writer, &child)
}

/// Write one child into the currently open element (or at document level
/// for [`Child::Element`]).
pub fn write_child<W>(writer: &mut W, child: &Child) -> Result<()>
where
    W: MarkupWriter + ?Sized,
{
    match child {
        Child::Element(e) => write_element(writer, &e.name, &e.node),
        Child::Attributes(pairs) => write_attributes(writer, pairs),
        Child::Text(scalar) => writer.text(&scalar.to_text()),
    }
}

/// Write `node` as the content of one or more elements named `name`.
///
/// A [`Node::Sequence`] produces one `name` element per item; nested
/// sequences flatten into further siblings.
pub fn write_element<W>(writer: &mut W, name: &str, node: &Node) -> Result<()>
where
    W: MarkupWriter + ?Sized,
{
    match node {
        Node::Scalar(scalar) => write_scalar_element(writer, name, scalar),
        Node::Sequence(items) => {
            debug!(element = name, count = items.len(), "writing repeated elements");
            for item in items {
                write_element(writer, name, item)?;
            }
            Ok(())
        }
        Node::Children(children) => {
            writer.start_element(name)?;
            // Attributes must land on the start tag before any content.
            for child in children {
                if let Child::Attributes(pairs) = child {
                    write_attributes(writer, pairs)?;
                }
            }
            for child in children {
                if !matches!(child, Child::Attributes(_)) {
                    write_child(writer, child)?;
                }
            }
            writer.end_element()
        }
    }
}

fn write_attributes<W>(writer: &mut W, pairs: &[(String, Scalar)]) -> Result<()>
where
    W: MarkupWriter + ?Sized,
{
    for (name, value) in pairs {
        writer.start_attribute(name)?;
        writer.attribute_text(&value.to_text())?;
        writer.end_attribute()?;
    }
    Ok(())
}

/// `Null` writes an empty element; text containing markup characters is
/// written as CDATA; everything else is escaped text.
fn write_scalar_element<W>(writer: &mut W, name: &str, scalar: &Scalar) -> Result<()>
where
    W: MarkupWriter + ?Sized,
{
    if scalar.is_null() {
        writer.start_element(name)?;
        return writer.end_element();
    }
    let text = scalar.to_text();
    if needs_cdata(&text) {
        writer.start_element(name)?;
        writer.cdata(&text)?;
        writer.end_element()
    } else {
        writer.write_element(name, &text)
    }
}

fn needs_cdata(text: &str) -> bool {
    text.contains('<') || text.contains('>')
}

/// Check if a key looks like a number, the test used to recognize
/// numerically-indexed sequences in keyed documents.
///
/// Accepts surrounding whitespace, an optional sign, integers, decimals and
/// exponents, including leading-zero forms like `"05"`.
pub(crate) fn looks_numeric(s: &str) -> bool {
    let s = s.trim();
    if s.is_empty() {
        return false;
    }
    let bytes = s.as_bytes();
    let start = if bytes[0] == b'-' || bytes[0] == b'+' { 1 } else { 0 };
    let rest = &s[start..];
    if rest.is_empty() {
        return false;
    }
    let mut has_dot = false;
    let mut has_e = false;
    let mut digits_since_e = false;
    let mut prev = 0u8;
    for (i, &b) in rest.as_bytes().iter().enumerate() {
        match b {
            b'0'..=b'9' => digits_since_e = true,
            b'.' if !has_dot && !has_e => has_dot = true,
            b'e' | b'E' if !has_e && i > 0 => {
                has_e = true;
                digits_since_e = false;
            }
            b'+' | b'-' if matches!(prev, b'e' | b'E') => {}
            _ => return false,
        }
        prev = b;
    }
    // At least one digit overall, and a digit after any exponent marker
    rest.as_bytes().iter().any(|b| b.is_ascii_digit()) && (!has_e || digits_since_e)
}

#[cfg(test)]
mod tests {
    use super::looks_numeric;

    #[test]
    fn numeric_keys() {
        for key in ["0", "12", "05", "-1", "+3", "1.5", "1e3", " 7 "] {
            assert!(looks_numeric(key), "{key:?} should be numeric");
        }
        for key in ["", "-", "a1", "1a", "1e", ".", "id", "1.2.3"] {
            assert!(!looks_numeric(key), "{key:?} should not be numeric");
        }
    }
}
