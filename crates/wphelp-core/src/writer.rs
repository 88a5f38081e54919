//! Streaming markup writer.
//!
//! [`MarkupWriter`] is the collaborator the serializer drives. It mirrors a
//! classic cursor-style XML writer: open an element, optionally attach
//! attributes, write text or CDATA, close the element. [`XmlWriter`] is the
//! in-memory implementation backed by `quick-xml`.
//!
//! Start tags are held back until the first piece of content is written so
//! that attributes can still be attached. An element closed without any
//! content is emitted in self-closing form (`<key/>`).

use crate::error::{HelperError, Result};
use crate::keyed::SequenceDetection;
use crate::types::is_valid_name;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::Deserialize;

/// Operations the serializer needs from a document writer.
///
/// Implementations own the output buffer. Callers are expected to balance
/// every `start_*` with its matching `end_*`.
pub trait MarkupWriter {
    /// Open an element. Attributes may be added until content is written.
    fn start_element(&mut self, name: &str) -> Result<()>;

    /// Close the innermost open element.
    fn end_element(&mut self) -> Result<()>;

    /// Write escaped character data into the current element.
    fn text(&mut self, text: &str) -> Result<()>;

    /// Write a literal CDATA block into the current element.
    fn cdata(&mut self, text: &str) -> Result<()>;

    /// Begin an attribute on the element whose start tag is still open.
    fn start_attribute(&mut self, name: &str) -> Result<()>;

    /// Append to the value of the attribute being written.
    fn attribute_text(&mut self, value: &str) -> Result<()>;

    /// Finish the attribute being written.
    fn end_attribute(&mut self) -> Result<()>;

    /// Write `<name>text</name>` in one call.
    fn write_element(&mut self, name: &str, text: &str) -> Result<()> {
        self.start_element(name)?;
        self.text(text)?;
        self.end_element()
    }
}

/// Output options for [`XmlWriter`] and the `to_xml` entry points.
///
/// Deserializable so it can be loaded from a JSON config file; missing
/// fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Emit `<?xml version="1.0" encoding="UTF-8"?>` before the first element.
    pub declaration: bool,
    /// Indent nested elements by this many spaces. `None` writes compact output.
    pub indent: Option<usize>,
    /// How keyed documents decide that a mapping is a run of sibling records.
    pub sequence_detection: SequenceDetection,
}

/// In-memory XML writer.
///
/// ```
/// use wphelp_core::writer::{MarkupWriter, WriterConfig, XmlWriter};
///
/// let mut w = XmlWriter::new(&WriterConfig::default()).unwrap();
/// w.start_element("order").unwrap();
/// w.start_attribute("id").unwrap();
/// w.attribute_text("5").unwrap();
/// w.end_attribute().unwrap();
/// w.write_element("total", "12").unwrap();
/// w.end_element().unwrap();
/// assert_eq!(w.finish().unwrap(), r#"<order id="5"><total>12</total></order>"#);
/// ```
pub struct XmlWriter {
    writer: Writer<Vec<u8>>,
    /// Names of open elements, innermost last.
    open: Vec<String>,
    /// Start tag not yet flushed; still accepts attributes.
    pending: Option<BytesStart<'static>>,
    /// Attribute currently being written: (name, accumulated value).
    attribute: Option<(String, String)>,
}

impl XmlWriter {
    /// Create a writer, emitting the XML declaration if configured.
    pub fn new(config: &WriterConfig) -> Result<Self> {
        let writer = match config.indent {
            Some(width) => Writer::new_with_indent(Vec::new(), b' ', width),
            None => Writer::new(Vec::new()),
        };
        let mut xml = Self {
            writer,
            open: Vec::new(),
            pending: None,
            attribute: None,
        };
        if config.declaration {
            xml.emit(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        }
        Ok(xml)
    }

    /// Number of elements currently open.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Consume the writer and return the document text.
    ///
    /// Fails if any element or attribute is still open.
    pub fn finish(mut self) -> Result<String> {
        if let Some((name, _)) = &self.attribute {
            return Err(HelperError::WriterState(format!(
                "attribute '{}' was never closed",
                name
            )));
        }
        if let Some(name) = self.open.last() {
            return Err(HelperError::WriterState(format!(
                "element '{}' was never closed",
                name
            )));
        }
        self.flush_pending()?;
        String::from_utf8(self.writer.into_inner())
            .map_err(|e| HelperError::XmlWrite(e.to_string()))
    }

    fn emit(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| HelperError::XmlWrite(e.to_string()))
    }

    /// Write the held-back start tag, if any. Called before any content.
    fn flush_pending(&mut self) -> Result<()> {
        if let Some(start) = self.pending.take() {
            self.emit(Event::Start(start))?;
        }
        Ok(())
    }

    fn ensure_no_attribute(&self, op: &str) -> Result<()> {
        match &self.attribute {
            Some((name, _)) => Err(HelperError::WriterState(format!(
                "{} while attribute '{}' is open",
                op, name
            ))),
            None => Ok(()),
        }
    }

    fn ensure_open_element(&self, op: &str) -> Result<()> {
        if self.open.is_empty() {
            return Err(HelperError::WriterState(format!(
                "{} outside of any element",
                op
            )));
        }
        Ok(())
    }
}

impl MarkupWriter for XmlWriter {
    fn start_element(&mut self, name: &str) -> Result<()> {
        self.ensure_no_attribute("start_element")?;
        if !is_valid_name(name) {
            return Err(HelperError::InvalidName(name.to_string()));
        }
        self.flush_pending()?;
        self.pending = Some(BytesStart::new(name.to_string()));
        self.open.push(name.to_string());
        Ok(())
    }

    fn end_element(&mut self) -> Result<()> {
        self.ensure_no_attribute("end_element")?;
        let name = self
            .open
            .pop()
            .ok_or_else(|| HelperError::WriterState("end_element with no open element".into()))?;
        match self.pending.take() {
            Some(start) => self.emit(Event::Empty(start)),
            None => self.emit(Event::End(BytesEnd::new(name))),
        }
    }

    fn text(&mut self, text: &str) -> Result<()> {
        self.ensure_no_attribute("text")?;
        self.ensure_open_element("text")?;
        self.flush_pending()?;
        self.emit(Event::Text(BytesText::new(text)))
    }

    /// A `]]>` inside `text` cannot appear in one CDATA section, so the
    /// content is split between `]]` and `>` into adjacent sections.
    fn cdata(&mut self, text: &str) -> Result<()> {
        self.ensure_no_attribute("cdata")?;
        self.ensure_open_element("cdata")?;
        self.flush_pending()?;
        let mut rest = text;
        while let Some(pos) = rest.find("]]>") {
            let (head, tail) = rest.split_at(pos + 2);
            self.emit(Event::CData(BytesCData::new(head)))?;
            rest = tail;
        }
        self.emit(Event::CData(BytesCData::new(rest)))
    }

    fn start_attribute(&mut self, name: &str) -> Result<()> {
        self.ensure_no_attribute("start_attribute")?;
        if self.pending.is_none() {
            return Err(HelperError::WriterState(format!(
                "attribute '{}' written after element content",
                name
            )));
        }
        if !is_valid_name(name) {
            return Err(HelperError::InvalidName(name.to_string()));
        }
        self.attribute = Some((name.to_string(), String::new()));
        Ok(())
    }

    fn attribute_text(&mut self, value: &str) -> Result<()> {
        match &mut self.attribute {
            Some((_, buf)) => {
                buf.push_str(value);
                Ok(())
            }
            None => Err(HelperError::WriterState(
                "attribute_text with no open attribute".into(),
            )),
        }
    }

    fn end_attribute(&mut self) -> Result<()> {
        let (name, value) = self
            .attribute
            .take()
            .ok_or_else(|| HelperError::WriterState("end_attribute with no open attribute".into()))?;
        match &mut self.pending {
            Some(start) => {
                start.push_attribute((name.as_str(), value.as_str()));
                Ok(())
            }
            None => Err(HelperError::WriterState(format!(
                "attribute '{}' has no start tag to attach to",
                name
            ))),
        }
    }
}
