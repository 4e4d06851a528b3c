/*
    error.rs - Error types for the binding layer

    Covers failures reported by the DHT binding itself (lookups, transport,
    tickets) and misuse of the binding lifecycle.
*/

use thiserror::Error;

/// Failures reported by a DHT binding
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// No document is stored under the key
    #[error("Key not found: {0}")]
    NotFound(String),

    /// The binding variant does not offer this operation
    #[error("{binding} binding does not support {operation}")]
    Unsupported {
        binding: &'static str,
        operation: &'static str,
    },

    /// The transport has no open connection
    #[error("Transport not connected")]
    NotConnected,

    /// The transport failed to carry out the request
    #[error("Transport error: {0}")]
    Transport(String),

    /// A ticket could not be obtained
    #[error("Ticket error: {0}")]
    Ticket(String),
}

/// Result type for binding operations
pub type BindingResult<T> = Result<T, BindingError>;

/// Misordered initialize/cleanup/use of a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("Binding already initialized")]
    AlreadyInitialized,

    #[error("Binding not initialized")]
    NotInitialized,

    #[error("Binding already closed")]
    Closed,
}
