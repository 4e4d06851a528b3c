//! Field map <-> document codec
//!
//! Both directions are pure. Encoding sorts fields by name, so two maps with
//! the same contents always produce the same document string.

use std::collections::HashSet;

use super::error::{DocumentError, DocumentResult};
use super::{Document, SerializedDocument};

/// Encode a field map into a serialized document.
///
/// Every field is written. A value that is not valid UTF-8 fails the whole
/// encoding with [`DocumentError::Encoding`] instead of being dropped.
pub fn encode<I, K, V>(fields: I) -> DocumentResult<SerializedDocument>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<[u8]>,
{
    let mut document = Document::new();

    for (name, value) in fields {
        let name = name.as_ref();
        let text = std::str::from_utf8(value.as_ref()).map_err(|e| DocumentError::Encoding {
            field: name.to_string(),
            reason: e.to_string(),
        })?;
        document.insert(name.to_string(), text.to_string());
    }

    serde_json::to_string(&document)
        .map(SerializedDocument::from)
        .map_err(|e| DocumentError::Encoding {
            field: String::new(),
            reason: e.to_string(),
        })
}

/// Decode a stored document, optionally projected onto `fields`.
///
/// With `fields == None` every stored field is returned. Otherwise exactly the
/// requested fields are returned and a field missing from the stored document
/// fails with [`DocumentError::MissingField`].
pub fn decode(
    raw: &SerializedDocument,
    fields: Option<&HashSet<String>>,
) -> DocumentResult<Document> {
    let stored: Document = serde_json::from_str(raw.as_str())
        .map_err(|e| DocumentError::Malformed(e.to_string()))?;

    match fields {
        None => Ok(stored),
        Some(fields) => project(stored, fields),
    }
}

fn project(mut stored: Document, fields: &HashSet<String>) -> DocumentResult<Document> {
    // Sorted so the reported missing field does not depend on hash order
    let mut names: Vec<&String> = fields.iter().collect();
    names.sort();

    let mut projected = Document::new();
    for name in names {
        let value = stored
            .remove(name)
            .ok_or_else(|| DocumentError::MissingField(name.clone()))?;
        projected.insert(name.clone(), value);
    }

    Ok(projected)
}
