//! Error types for propconf

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for propconf operations
pub type Result<T> = std::result::Result<T, Error>;

/// A single configuration value that could not be resolved.
///
/// Every variant names the offending key and the exact text that failed to
/// parse. For address specs this is the failing half (host or port), not the
/// whole `host:port` string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for '{key}': '{value}'")]
    MalformedValue { key: String, value: String },

    #[error("invalid address spec for '{key}': '{value}' has no ':' separator")]
    MissingSeparator { key: String, value: String },

    #[error("invalid host for '{key}': '{value}' is not an IPv4 address")]
    InvalidHost { key: String, value: String },

    #[error("invalid port for '{key}': '{value}'")]
    InvalidPort { key: String, value: String },
}

impl ConfigError {
    pub(crate) fn malformed(key: &str, value: &str) -> Self {
        ConfigError::MalformedValue {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    /// Key whose value failed to resolve
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            ConfigError::MalformedValue { key, .. }
            | ConfigError::MissingSeparator { key, .. }
            | ConfigError::InvalidHost { key, .. }
            | ConfigError::InvalidPort { key, .. } => key,
        }
    }

    /// Raw text that failed to parse
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            ConfigError::MalformedValue { value, .. }
            | ConfigError::MissingSeparator { value, .. }
            | ConfigError::InvalidHost { value, .. }
            | ConfigError::InvalidPort { value, .. } => value,
        }
    }

    /// Check if this error came from a `host:port` address spec
    #[must_use]
    pub fn is_address_error(&self) -> bool {
        matches!(
            self,
            ConfigError::MissingSeparator { .. }
                | ConfigError::InvalidHost { .. }
                | ConfigError::InvalidPort { .. }
        )
    }
}

/// Main error type for propconf
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Resolution Errors
    // -------------------------------------------------------------------------
    #[error(transparent)]
    Config(#[from] ConfigError),

    // -------------------------------------------------------------------------
    // Collaborator Errors
    // -------------------------------------------------------------------------
    #[error("Failed to read '{path}': {source}")]
    ResourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid MIME types table '{path}' at line {line}: {reason}")]
    MimeTypes {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

impl Error {
    /// The resolution failure, if this error came from parsing a setting
    #[must_use]
    pub fn as_config_error(&self) -> Option<&ConfigError> {
        match self {
            Error::Config(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_cover_every_variant() {
        let errors = [
            ConfigError::malformed("a.b", "x"),
            ConfigError::MissingSeparator {
                key: "a.b".into(),
                value: "x".into(),
            },
            ConfigError::InvalidHost {
                key: "a.b".into(),
                value: "x".into(),
            },
            ConfigError::InvalidPort {
                key: "a.b".into(),
                value: "x".into(),
            },
        ];

        for e in &errors {
            assert_eq!(e.key(), "a.b");
            assert_eq!(e.value(), "x");
        }
        assert!(!errors[0].is_address_error());
        assert!(errors[1..].iter().all(ConfigError::is_address_error));
    }

    #[test]
    fn test_display_names_key_and_value() {
        let err = Error::from(ConfigError::malformed("http.worker.count", "two"));
        let msg = err.to_string();

        assert!(msg.contains("http.worker.count"));
        assert!(msg.contains("two"));
        assert!(err.as_config_error().is_some());
    }
}
