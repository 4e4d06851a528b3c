//! Document model and codec
//!
//! A document is a flat map of field names to string values. On the wire it is
//! a JSON object whose values are all JSON strings; nothing is nested and no
//! value is typed.

use std::collections::BTreeMap;
use std::fmt;

mod codec;
mod error;
mod value;

pub use codec::{decode, encode};
pub use error::{DocumentError, DocumentResult};
pub use value::FieldValue;

/// Decoded document: field name -> field value.
///
/// Kept sorted so that encoding the same fields always yields the same bytes.
pub type Document = BTreeMap<String, String>;

/// A document as stored in the DHT.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SerializedDocument(String);

impl SerializedDocument {
    /// Wrap a raw string received from a binding
    pub fn new(raw: impl Into<String>) -> Self {
        SerializedDocument(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for SerializedDocument {
    fn from(raw: String) -> Self {
        SerializedDocument(raw)
    }
}

impl From<&str> for SerializedDocument {
    fn from(raw: &str) -> Self {
        SerializedDocument(raw.to_string())
    }
}

impl AsRef<str> for SerializedDocument {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SerializedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
