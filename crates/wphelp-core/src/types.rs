//! Tagged markup model used by the serializer and decoder.
//!
//! A document is a tree of [`Node`]s. Metadata that the keyed representation
//! smuggles through reserved keys (`@attributes`, `@value`) is expressed here
//! as dedicated [`Child`] variants, and repeated sibling elements are an
//! explicit [`Node::Sequence`] rather than a mapping that happens to have
//! numeric keys.
//!
//! ```
//! use wphelp_core::types::{Child, Element, Node};
//!
//! let order = Element::new(
//!     "order",
//!     Node::children([
//!         Child::attributes([("id", "5")]),
//!         Child::element("total", 12),
//!     ]),
//! );
//! assert_eq!(order.name, "order");
//! ```

/// A leaf value. Rendered as element text or an attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    /// Text form of the scalar as it appears in markup.
    ///
    /// `Null` and non-finite floats render as the empty string.
    pub fn to_text(&self) -> String {
        match self {
            Scalar::Null => String::new(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Integer(i) => i.to_string(),
            Scalar::Float(f) => format_float(*f),
            Scalar::String(s) => s.clone(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Integer(i)
    }
}

impl From<i32> for Scalar {
    fn from(i: i32) -> Self {
        Scalar::Integer(i64::from(i))
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Scalar::Float(f)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

/// The content of one element.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Text-only content: `<key>text</key>`.
    Scalar(Scalar),
    /// Attributes, child elements and text, in document order.
    Children(Vec<Child>),
    /// N sibling elements sharing the parent's name, one per item.
    Sequence(Vec<Node>),
}

impl Node {
    pub fn children<I>(children: I) -> Self
    where
        I: IntoIterator<Item = Child>,
    {
        Node::Children(children.into_iter().collect())
    }

    pub fn sequence<I, N>(items: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        Node::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl From<Scalar> for Node {
    fn from(value: Scalar) -> Self {
        Node::Scalar(value)
    }
}

macro_rules! node_from_scalar {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Node {
                fn from(value: $ty) -> Self {
                    Node::Scalar(value.into())
                }
            }
        )*
    };
}

node_from_scalar!(&str, String, i64, i32, f64, bool);

/// One entry inside an element.
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    /// A nested element.
    Element(Element),
    /// Attributes of the enclosing element, in insertion order.
    Attributes(Vec<(String, Scalar)>),
    /// Raw text content of the enclosing element.
    Text(Scalar),
}

impl Child {
    pub fn element(name: impl Into<String>, node: impl Into<Node>) -> Self {
        Child::Element(Element::new(name, node))
    }

    pub fn attributes<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Scalar>,
    {
        Child::Attributes(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn text(value: impl Into<Scalar>) -> Self {
        Child::Text(value.into())
    }
}

/// A named element and its content.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub node: Node,
}

impl Element {
    pub fn new(name: impl Into<String>, node: impl Into<Node>) -> Self {
        Self {
            name: name.into(),
            node: node.into(),
        }
    }
}

/// Format a float for markup output:
/// - No scientific notation
/// - No trailing fractional zeros (3.10 → 3.1)
/// - Whole numbers without a fraction (1.0 → 1)
/// - Negative zero normalizes to 0
/// - NaN and infinities render as the empty string
pub(crate) fn format_float(f: f64) -> String {
    if !f.is_finite() {
        return String::new();
    }
    let f = if f == 0.0 { 0.0 } else { f };
    if f.fract() == 0.0 && f.abs() < (i64::MAX as f64) {
        return (f as i64).to_string();
    }
    let s = format!("{}", f);
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Test whether `name` is usable as an XML element or attribute name.
///
/// Accepts a leading letter, `_` or `:`, followed by letters, digits, `-`,
/// `.`, `_` or `:`. Non-ASCII alphabetic characters are allowed anywhere a
/// letter is.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '.' | '_' | ':'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_formatting() {
        assert_eq!(format_float(1.0), "1");
        assert_eq!(format_float(-0.0), "0");
        assert_eq!(format_float(3.10), "3.1");
        assert_eq!(format_float(f64::NAN), "");
    }

    #[test]
    fn name_validation() {
        assert!(is_valid_name("order"));
        assert!(is_valid_name("line_item-2"));
        assert!(is_valid_name("ns:tag"));
        assert!(is_valid_name("prénom"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("0"));
        assert!(!is_valid_name("a b"));
        assert!(!is_valid_name("@value"));
    }
}
