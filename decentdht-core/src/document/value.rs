//! Harness field values

use std::fmt;
use std::str::Utf8Error;

/// A single field value handed over by the workload driver.
///
/// Drivers produce raw bytes; only values that are valid UTF-8 can be stored
/// in a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldValue(Vec<u8>);

impl FieldValue {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        FieldValue(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Borrow the value as text
    pub fn as_str(&self) -> Result<&str, Utf8Error> {
        std::str::from_utf8(&self.0)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue(value.into_bytes())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue(value.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(value: Vec<u8>) -> Self {
        FieldValue(value)
    }
}

impl From<&[u8]> for FieldValue {
    fn from(value: &[u8]) -> Self {
        FieldValue(value.to_vec())
    }
}

impl AsRef<[u8]> for FieldValue {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}
