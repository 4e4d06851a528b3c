//! Configuration error types

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Failed to read adapter config file: {0}")]
    FileReadError(String),

    #[error("Failed to write adapter config file: {0}")]
    FileWriteError(String),

    #[error("Failed to parse adapter config: {0}")]
    ParseError(String),

    #[error("Failed to render adapter config as TOML: {0}")]
    SerializeError(String),

    /// Unrecognised binding variant name
    #[error("Unknown binding '{0}' (expected direct or ticketed)")]
    UnknownBinding(String),

    /// `max_ops_per_ticket` that is neither a positive count nor -1
    #[error("Invalid max_ops_per_ticket '{raw}': {reason} (use a positive count, or -1 for unbounded)")]
    InvalidTicketBound { raw: String, reason: String },

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_bound_message_names_the_setting() {
        let err = ConfigError::InvalidTicketBound {
            raw: "0".to_string(),
            reason: "zero operations per ticket".to_string(),
        };

        let message = err.to_string();
        assert!(message.contains("max_ops_per_ticket '0'"));
        assert!(message.contains("-1 for unbounded"));
    }

    #[test]
    fn test_unknown_binding_lists_variants() {
        let err = ConfigError::UnknownBinding("sideways".to_string());
        assert_eq!(err.to_string(), "Unknown binding 'sideways' (expected direct or ticketed)");
    }
}
