//! Document codec error types

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// A field value has no string representation
    #[error("Cannot encode field '{field}': {reason}")]
    Encoding { field: String, reason: String },

    /// A requested field is absent from the stored document
    #[error("Missing field: {0}")]
    MissingField(String),

    /// The stored document is not a flat object of string values
    #[error("Malformed document: {0}")]
    Malformed(String),
}

/// Result type for codec operations
pub type DocumentResult<T> = Result<T, DocumentError>;
