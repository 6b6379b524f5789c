//! Configuration errors, raised while parsing connection settings

use thiserror::Error;

/// Result type for configuration parsing
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// URL does not follow `jdbc:aerospike:host[:port][,...][/namespace][?k=v&...]`
    #[error("cannot parse URL '{0}'")]
    InvalidUrl(String),

    /// A recognized option carried a value of the wrong shape
    #[error("invalid value '{value}' for option '{key}': {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    pub fn invalid_value(key: &str, value: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::InvalidUrl(_) => "AERO_SQL_CONFIG_INVALID_URL",
            ConfigError::InvalidValue { .. } => "AERO_SQL_CONFIG_INVALID_VALUE",
        }
    }
}
