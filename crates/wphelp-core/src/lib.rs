//! # wphelp-core
//!
//! Stateless helpers for plugin and theme development: a nested-structure to
//! XML serializer, Unicode-safe text utilities, size and number formatting,
//! ordered-map helpers and order formatting.
//!
//! ## Quick start
//!
//! ```rust
//! use wphelp_core::{keyed_to_xml, parse_to_keyed, WriterConfig};
//!
//! // Keyed JSON → XML
//! let json = r#"{"order":{"@attributes":{"id":"5"},"total":"12.50"}}"#;
//! let xml = keyed_to_xml(json, &WriterConfig::default()).unwrap();
//! assert_eq!(xml, r#"<order id="5"><total>12.50</total></order>"#);
//!
//! // XML → keyed JSON
//! let back = parse_to_keyed(&xml).unwrap();
//! assert_eq!(back.to_string(), json);
//! ```
//!
//! ## Modules
//!
//! - [`types`] — tagged markup model (`Node`, `Child`, `Element`, `Scalar`)
//! - [`keyed`] — keyed JSON form (`@attributes`, `@value`) ↔ tagged model
//! - [`writer`] — `MarkupWriter` trait and the `quick-xml` backed `XmlWriter`
//! - [`encoder`] — serializer driving a `MarkupWriter`
//! - [`decoder`] — XML → tagged model
//! - [`text`] — prefix/suffix/contains, truncation, sanitizers, excerpts
//! - [`numbers`] — size strings, human-readable numbers, price formatting
//! - [`arrays`] — ordered-map insertion, containment, positional helpers
//! - [`commerce`] — country codes and order line items
//! - [`error`] — error type shared by all modules

pub mod arrays;
pub mod commerce;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod keyed;
pub mod numbers;
pub mod text;
pub mod types;
pub mod writer;

pub use decoder::{parse, parse_to_keyed};
pub use encoder::{keyed_to_xml, serialize_keyed, to_xml, write_child, write_element};
pub use error::{HelperError, Result};
pub use keyed::{to_keyed, SequenceDetection};
pub use types::{Child, Element, Node, Scalar};
pub use writer::{MarkupWriter, WriterConfig, XmlWriter};
