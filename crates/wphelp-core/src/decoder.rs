//! Markup decoder — reads XML back into the tagged model.
//!
//! The decoder is the inverse of [`crate::encoder`] for documents it
//! produced. It uses `quick-xml`'s pull reader and a stack of partially
//! built elements:
//!
//! - Attributes become a leading [`Child::Attributes`]
//! - Repeated sibling names merge into one [`Node::Sequence`] at the
//!   position of the first occurrence
//! - Text-only elements become [`Node::Scalar`] with string content;
//!   numbers are not re-typed
//! - `<key/>` becomes `Scalar::Null`, `<key></key>` becomes an empty string
//! - Text next to child elements or attributes becomes a [`Child::Text`];
//!   whitespace-only text between child elements is dropped
//!
//! # Example
//! ```
//! use wphelp_core::decoder::parse;
//! use wphelp_core::types::{Child, Node};
//!
//! let root = parse(r#"<order id="5"><id>1</id></order>"#).unwrap();
//! assert_eq!(root.name, "order");
//! assert_eq!(
//!     root.node,
//!     Node::children([Child::attributes([("id", "5")]), Child::element("id", "1")])
//! );
//! ```

use crate::error::{HelperError, Result};
use crate::keyed::to_keyed;
use crate::types::{Child, Element, Node, Scalar};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// An element whose end tag has not been read yet.
struct Frame {
    name: String,
    attributes: Vec<(String, Scalar)>,
    elements: Vec<Element>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>, position: u64) -> Result<Self> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| parse_error(position, e))?
            .to_string();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| parse_error(position, e))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| parse_error(position, e))?
                .to_string();
            let value = attr
                .unescape_value()
                .map_err(|e| parse_error(position, e))?
                .into_owned();
            attributes.push((key, Scalar::String(value)));
        }
        Ok(Self {
            name,
            attributes,
            elements: Vec::new(),
            text: String::new(),
        })
    }

    /// Add a finished child, folding repeated names into a sequence.
    fn push_element(&mut self, element: Element) {
        match self.elements.iter_mut().find(|e| e.name == element.name) {
            Some(existing) => match &mut existing.node {
                Node::Sequence(items) => items.push(element.node),
                node => {
                    let first = std::mem::replace(node, Node::Sequence(Vec::new()));
                    *node = Node::Sequence(vec![first, element.node]);
                }
            },
            None => self.elements.push(element),
        }
    }

    /// Close the frame. `self_closing` distinguishes `<a/>` from `<a></a>`.
    fn close(self, self_closing: bool) -> Element {
        let node = if self.attributes.is_empty() && self.elements.is_empty() {
            if self_closing {
                Node::Scalar(Scalar::Null)
            } else {
                Node::Scalar(Scalar::String(self.text))
            }
        } else {
            let mut children = Vec::with_capacity(self.elements.len() + 2);
            if !self.attributes.is_empty() {
                children.push(Child::Attributes(self.attributes));
            }
            if !self.text.trim().is_empty() {
                children.push(Child::Text(Scalar::String(self.text)));
            }
            children.extend(self.elements.into_iter().map(Child::Element));
            Node::Children(children)
        };
        Element {
            name: self.name,
            node,
        }
    }
}

/// Parse an XML document with a single root element.
///
/// The XML declaration, comments and processing instructions are skipped.
/// Content after the root element is ignored.
pub fn parse(xml: &str) -> Result<Element> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Frame> = Vec::new();

    loop {
        let position = reader.buffer_position() as u64;
        let event = reader
            .read_event()
            .map_err(|e| parse_error(position, e))?;
        match event {
            Event::Start(start) => stack.push(Frame::open(&start, position)?),
            Event::Empty(start) => {
                let element = Frame::open(&start, position)?.close(true);
                match stack.last_mut() {
                    Some(parent) => parent.push_element(element),
                    None => return Ok(element),
                }
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| parse_error(position, "unexpected end tag"))?;
                let element = frame.close(false);
                match stack.last_mut() {
                    Some(parent) => parent.push_element(element),
                    None => return Ok(element),
                }
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| parse_error(position, e))?;
                match stack.last_mut() {
                    Some(frame) => frame.text.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => return Err(parse_error(position, "text outside of root element")),
                }
            }
            Event::CData(data) => {
                let data = String::from_utf8(data.into_inner().into_owned())
                    .map_err(|e| parse_error(position, e))?;
                match stack.last_mut() {
                    Some(frame) => frame.text.push_str(&data),
                    None => return Err(parse_error(position, "CDATA outside of root element")),
                }
            }
            Event::Eof => {
                let message = match stack.last() {
                    Some(frame) => format!("element '{}' is not closed", frame.name),
                    None => "document has no root element".to_string(),
                };
                return Err(parse_error(position, message));
            }
            _ => {}
        }
    }
}

/// Parse an XML document and return its keyed JSON form.
pub fn parse_to_keyed(xml: &str) -> Result<serde_json::Value> {
    parse(xml).map(|root| to_keyed(&root))
}

fn parse_error(position: u64, message: impl std::fmt::Display) -> HelperError {
    HelperError::XmlParse {
        position,
        message: message.to_string(),
    }
}
