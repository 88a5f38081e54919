//! Error types for the wphelp helpers.

use thiserror::Error;

/// Errors that can occur in wphelp operations.
#[derive(Error, Debug)]
pub enum HelperError {
    /// The input string was not valid JSON (keyed serializer, line items).
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The input string was not well-formed XML (decoder path).
    /// `position` is the byte offset where the reader stopped.
    #[error("XML parse error at byte {position}: {message}")]
    XmlParse { position: u64, message: String },

    /// The underlying XML writer failed.
    #[error("XML write error: {0}")]
    XmlWrite(String),

    /// An element or attribute name is not a valid XML name.
    #[error("Invalid XML name: {0:?}")]
    InvalidName(String),

    /// The writer was driven out of sequence (e.g. an attribute after content).
    #[error("Writer state error: {0}")]
    WriterState(String),

    /// A value had the wrong shape for the operation.
    #[error("Invalid argument type: {0}")]
    InvalidArgumentType(String),

    /// A size string such as `"2M"` could not be parsed.
    #[error("Invalid size string: {0:?}")]
    InvalidSize(String),

    /// A user-supplied regular expression did not compile.
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Convenience alias used throughout wphelp-core.
pub type Result<T> = std::result::Result<T, HelperError>;
