//! Configuration management for the DecentDHT adapter
//!
//! Configuration is an explicit value handed to the adapter at construction.
//! It can be loaded from a TOML file or from environment variables; the
//! environment loader takes a lookup function so it can be exercised without
//! touching the process environment.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

mod error;

pub use error::ConfigError;

use crate::binding::TicketConfig;
use crate::logging::{LogConfig, LogLevel};

/// Environment variable selecting the binding variant
pub const ENV_BINDING: &str = "DECENTDHT_BINDING";
/// Environment variable holding the ticket bound (`-1` = unbounded)
pub const ENV_MAX_OPS_PER_TICKET: &str = "DECENTDHT_MAX_OPS_PER_TICKET";
/// Environment variable holding the log level
pub const ENV_LOG_LEVEL: &str = "DECENTDHT_LOG_LEVEL";
/// Environment variable enabling JSON logs
pub const ENV_LOG_JSON: &str = "DECENTDHT_LOG_JSON";

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Binding configuration
    pub binding: BindingConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Which binding variant to drive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingKind {
    /// Enclave-backed, update via delete + insert
    #[default]
    Direct,
    /// Non-enclave, ticket-batched, native update
    Ticketed,
}

impl BindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BindingKind::Direct => "direct",
            BindingKind::Ticketed => "ticketed",
        }
    }
}

impl FromStr for BindingKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "direct" | "enclave" => Ok(BindingKind::Direct),
            "ticketed" | "non-enclave" | "nonenclave" => Ok(BindingKind::Ticketed),
            other => Err(ConfigError::UnknownBinding(other.to_string())),
        }
    }
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binding configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingConfig {
    /// Binding variant
    pub kind: BindingKind,

    /// Operations per ticket; only read by the ticketed binding
    pub max_ops_per_ticket: TicketConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON formatting
    pub json_format: bool,

    /// Include target module
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json_format: false, with_target: true }
    }
}

impl LoggingConfig {
    /// Translate into the logging subsystem's configuration
    pub fn to_log_config(&self) -> Result<LogConfig, ConfigError> {
        let level: LogLevel = self.level.parse()?;
        Ok(LogConfig::new(level).with_target(self.with_target).json_format(self.json_format))
    }
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// Variables: `DECENTDHT_BINDING`, `DECENTDHT_MAX_OPS_PER_TICKET`,
    /// `DECENTDHT_LOG_LEVEL`, `DECENTDHT_LOG_JSON`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_lookup(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields that are set in `lookup`
    pub fn apply_lookup<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(kind) = lookup(ENV_BINDING) {
            self.binding.kind = kind.parse()?;
        }
        if let Some(max_ops) = lookup(ENV_MAX_OPS_PER_TICKET) {
            self.binding.max_ops_per_ticket = TicketConfig::parse(Some(&max_ops))?;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        if let Some(json) = lookup(ENV_LOG_JSON) {
            self.logging.json_format = json
                .parse()
                .map_err(|e| ConfigError::InvalidValue(format!("Invalid JSON flag: {}", e)))?;
        }
        Ok(())
    }

    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadError(e.to_string()))?;

        Self::from_toml_str(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if LogLevel::from_str(&self.logging.level).is_err() {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}",
                self.logging.level
            )));
        }

        Ok(())
    }

    /// Render configuration as TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: impl AsRef<std::path::Path>) -> Result<(), ConfigError> {
        let contents = self.to_toml_string()?;

        std::fs::write(path, contents).map_err(|e| ConfigError::FileWriteError(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.binding.kind, BindingKind::Direct);
        assert_eq!(config.binding.max_ops_per_ticket, TicketConfig::Unbounded);
    }

    #[test]
    fn test_lookup_unset_is_unbounded() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.binding.max_ops_per_ticket, TicketConfig::Unbounded);
    }

    #[test]
    fn test_lookup_bounded() {
        let config = Config::from_lookup(lookup(&[
            (ENV_BINDING, "ticketed"),
            (ENV_MAX_OPS_PER_TICKET, "50"),
        ]))
        .unwrap();

        assert_eq!(config.binding.kind, BindingKind::Ticketed);
        assert_eq!(config.binding.max_ops_per_ticket.max_ops(), Some(50));
    }

    #[test]
    fn test_lookup_sentinel() {
        let config = Config::from_lookup(lookup(&[(ENV_MAX_OPS_PER_TICKET, "-1")])).unwrap();
        assert_eq!(config.binding.max_ops_per_ticket, TicketConfig::Unbounded);
    }

    #[test]
    fn test_lookup_non_numeric_is_error() {
        let result = Config::from_lookup(lookup(&[(ENV_MAX_OPS_PER_TICKET, "abc")]));
        assert!(matches!(result, Err(ConfigError::InvalidTicketBound { .. })));
    }

    #[test]
    fn test_lookup_bad_values() {
        assert_eq!(
            Config::from_lookup(lookup(&[(ENV_BINDING, "sideways")])),
            Err(ConfigError::UnknownBinding("sideways".to_string()))
        );
        assert!(Config::from_lookup(lookup(&[(ENV_LOG_JSON, "maybe")])).is_err());
        assert!(matches!(
            Config::from_lookup(lookup(&[(ENV_LOG_LEVEL, "loud")])),
            Err(ConfigError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_binding_kind_aliases() {
        assert_eq!("enclave".parse::<BindingKind>().unwrap(), BindingKind::Direct);
        assert_eq!("Non-Enclave".parse::<BindingKind>().unwrap(), BindingKind::Ticketed);
        assert_eq!(BindingKind::Ticketed.to_string(), "ticketed");
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = Config::default();
        config.binding.kind = BindingKind::Ticketed;
        config.binding.max_ops_per_ticket = TicketConfig::bounded(25).unwrap();
        config.logging.level = "debug".to_string();

        let text = config.to_toml_string().unwrap();
        assert!(text.contains("max_ops_per_ticket = 25"));
        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_toml_partial_uses_defaults() {
        let config = Config::from_toml_str("[binding]\nkind = \"ticketed\"\n").unwrap();

        assert_eq!(config.binding.kind, BindingKind::Ticketed);
        assert_eq!(config.binding.max_ops_per_ticket, TicketConfig::Unbounded);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_toml_rejects_invalid_ticket_bound() {
        let result = Config::from_toml_str("[binding]\nmax_ops_per_ticket = 0\n");
        match result {
            Err(ConfigError::ParseError(message)) => {
                assert!(message.contains("max_ops_per_ticket '0'"), "{}", message)
            }
            other => panic!("expected parse error, got {:?}", other),
        }

        let result = Config::from_toml_str("[binding]\nmax_ops_per_ticket = \"abc\"\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decentdht.toml");

        let mut config = Config::default();
        config.binding.max_ops_per_ticket = TicketConfig::bounded(10).unwrap();
        config.save_to_file(&path).unwrap();

        assert_eq!(Config::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let result = Config::from_file("/nonexistent/decentdht.toml");
        assert!(matches!(result, Err(ConfigError::FileReadError(_))));
    }

    #[test]
    fn test_to_log_config() {
        let mut logging = LoggingConfig::default();
        logging.level = "warn".to_string();
        logging.json_format = true;

        let log_config = logging.to_log_config().unwrap();
        assert_eq!(log_config.level, LogLevel::Warn);
        assert!(log_config.json_format);
    }
}
