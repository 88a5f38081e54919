//! Writer collaborator tests: call sequencing seen by a `MarkupWriter`, and
//! misuse detection in `XmlWriter`.

use serde_json::json;
use wphelp_core::encoder::serialize_keyed;
use wphelp_core::writer::{MarkupWriter, WriterConfig, XmlWriter};
use wphelp_core::{HelperError, Result, SequenceDetection};

/// Records every call as a short string, so tests can assert the exact
/// sequence the serializer issues.
#[derive(Default)]
struct Recorder {
    calls: Vec<String>,
}

impl MarkupWriter for Recorder {
    fn start_element(&mut self, name: &str) -> Result<()> {
        self.calls.push(format!("start {name}"));
        Ok(())
    }
    fn end_element(&mut self) -> Result<()> {
        self.calls.push("end".into());
        Ok(())
    }
    fn text(&mut self, text: &str) -> Result<()> {
        self.calls.push(format!("text {text}"));
        Ok(())
    }
    fn cdata(&mut self, text: &str) -> Result<()> {
        self.calls.push(format!("cdata {text}"));
        Ok(())
    }
    fn start_attribute(&mut self, name: &str) -> Result<()> {
        self.calls.push(format!("attr {name}"));
        Ok(())
    }
    fn attribute_text(&mut self, value: &str) -> Result<()> {
        self.calls.push(format!("attr-text {value}"));
        Ok(())
    }
    fn end_attribute(&mut self) -> Result<()> {
        self.calls.push("attr-end".into());
        Ok(())
    }
}

fn record(key: &str, value: serde_json::Value) -> Vec<String> {
    let mut rec = Recorder::default();
    serialize_keyed(&mut rec, key, &value, SequenceDetection::default()).unwrap();
    rec.calls
}

#[test]
fn attribute_bag_is_consumed_before_fields() {
    let calls = record("order", json!([{"id": 1, "@attributes": {"id": "5"}}]));
    assert_eq!(
        calls,
        [
            "start order",
            "attr id",
            "attr-text 5",
            "attr-end",
            "start id",
            "text 1",
            "end",
            "end",
        ]
    );
}

#[test]
fn attribute_bag_opens_no_element() {
    let calls = record("@attributes", json!({"a": "1", "b": 2}));
    assert_eq!(
        calls,
        ["attr a", "attr-text 1", "attr-end", "attr b", "attr-text 2", "attr-end"]
    );
}

#[test]
fn raw_value_writes_text_only() {
    assert_eq!(record("@value", json!("hi")), ["text hi"]);
}

#[test]
fn cdata_scalar_sequence() {
    assert_eq!(
        record("html", json!("<p>")),
        ["start html", "cdata <p>", "end"]
    );
}

#[test]
fn plain_scalar_uses_write_element() {
    assert_eq!(record("x", json!("y")), ["start x", "text y", "end"]);
}

#[test]
fn repeated_records_open_one_element_each() {
    let calls = record("row", json!({"0": {"v": 1}, "1": {"v": 2}}));
    assert_eq!(
        calls,
        [
            "start row", "start v", "text 1", "end", "end", "start row", "start v", "text 2",
            "end", "end",
        ]
    );
}

// ============================================================================
// XmlWriter misuse
// ============================================================================

fn writer() -> XmlWriter {
    XmlWriter::new(&WriterConfig::default()).unwrap()
}

#[test]
fn attribute_after_content_is_rejected() {
    let mut w = writer();
    w.start_element("a").unwrap();
    w.text("x").unwrap();
    let err = w.start_attribute("late").unwrap_err();
    assert!(matches!(err, HelperError::WriterState(_)));
}

#[test]
fn attribute_after_child_element_is_rejected() {
    let mut w = writer();
    w.start_element("a").unwrap();
    w.write_element("b", "1").unwrap();
    assert!(w.start_attribute("late").is_err());
}

#[test]
fn end_without_open_element() {
    let mut w = writer();
    assert!(matches!(
        w.end_element().unwrap_err(),
        HelperError::WriterState(_)
    ));
}

#[test]
fn text_outside_element() {
    let mut w = writer();
    assert!(w.text("stray").is_err());
    assert!(w.cdata("stray").is_err());
}

#[test]
fn unclosed_element_fails_finish() {
    let mut w = writer();
    w.start_element("a").unwrap();
    assert_eq!(w.depth(), 1);
    assert!(matches!(w.finish().unwrap_err(), HelperError::WriterState(_)));
}

#[test]
fn unclosed_attribute_blocks_other_calls() {
    let mut w = writer();
    w.start_element("a").unwrap();
    w.start_attribute("x").unwrap();
    assert!(w.start_element("b").is_err());
    assert!(w.text("t").is_err());
    w.end_attribute().unwrap();
    w.end_element().unwrap();
    assert_eq!(w.finish().unwrap(), r#"<a x=""/>"#);
}

#[test]
fn attribute_value_accumulates() {
    let mut w = writer();
    w.start_element("a").unwrap();
    w.start_attribute("x").unwrap();
    w.attribute_text("foo").unwrap();
    w.attribute_text("bar").unwrap();
    w.end_attribute().unwrap();
    w.end_element().unwrap();
    assert_eq!(w.finish().unwrap(), r#"<a x="foobar"/>"#);
}

#[test]
fn invalid_names_rejected() {
    let mut w = writer();
    assert!(matches!(
        w.start_element("1st").unwrap_err(),
        HelperError::InvalidName(_)
    ));
    w.start_element("ok").unwrap();
    assert!(matches!(
        w.start_attribute("bad attr").unwrap_err(),
        HelperError::InvalidName(_)
    ));
}

#[test]
fn empty_document() {
    assert_eq!(writer().finish().unwrap(), "");
}
