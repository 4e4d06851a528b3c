//! Test fixtures for records and documents

use std::collections::HashSet;

use crate::adapter::Record;
use crate::document::{Document, FieldValue};

/// Build a record from string pairs
pub fn record(pairs: &[(&str, &str)]) -> Record {
    pairs.iter().map(|(k, v)| (k.to_string(), FieldValue::from(*v))).collect()
}

/// Build a decoded document from string pairs
pub fn document(pairs: &[(&str, &str)]) -> Document {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

/// Build a field projection
pub fn field_set(names: &[&str]) -> HashSet<String> {
    names.iter().map(|name| name.to_string()).collect()
}

/// Workload-style record: `field0..fieldN` each holding `len` bytes of text
pub fn sized_record(field_count: usize, len: usize) -> Record {
    (0..field_count)
        .map(|i| {
            let value: String = std::iter::repeat((b'a' + (i % 26) as u8) as char).take(len).collect();
            (format!("field{}", i), FieldValue::from(value))
        })
        .collect()
}

/// Convert a driver record into a document for comparisons
pub fn to_document(record: &Record) -> Document {
    record.iter().map(|(k, v)| (k.clone(), v.to_string())).collect()
}
