/*
    error.rs - Umbrella error type for the adapter

    Every failure the core can produce converts into `AdapterError`, so the
    adapter boundary has a single type to turn into a status message.
*/

use thiserror::Error;

use crate::binding::{BindingError, LifecycleError};
use crate::config::ConfigError;
use crate::document::DocumentError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    /// Bad initialization parameter
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Misordered init/cleanup/use
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// The DHT binding failed
    #[error(transparent)]
    Binding(#[from] BindingError),

    /// Document serialization contract violated
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Result type for adapter operations
pub type AdapterResult<T> = Result<T, AdapterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        let err: AdapterError = LifecycleError::AlreadyInitialized.into();
        assert!(matches!(err, AdapterError::Lifecycle(LifecycleError::AlreadyInitialized)));

        let err: AdapterError = BindingError::NotFound("k".to_string()).into();
        assert!(matches!(err, AdapterError::Binding(_)));

        let err: AdapterError = DocumentError::MissingField("f".to_string()).into();
        assert!(matches!(err, AdapterError::Document(_)));
    }

    #[test]
    fn test_display_is_transparent() {
        let err: AdapterError = BindingError::NotFound("user7".to_string()).into();
        assert_eq!(err.to_string(), "Key not found: user7");
    }
}
