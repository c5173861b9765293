//! Error types and result aliases for Rainmeas operations.
//!
//! Provides a unified error type covering registry fetches, configuration
//! loading and page rendering, with actionable error messages.

use thiserror::Error;

/// Unified error type for all Rainmeas operations
#[derive(Error, Debug)]
pub enum RainmeasError {
    // Config errors
    #[error("Failed to parse rainmeas.toml: {message}")]
    TomlParse { message: String },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    // Registry errors
    #[error("Package '{name}' not found in registry")]
    NotFound { name: String },

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Failed to parse {message}")]
    Parse { message: String },

    // Page errors
    #[error("Missing required parameter '{name}'")]
    MissingParameter { name: String },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for Rainmeas operations
pub type RainmeasResult<T> = Result<T, RainmeasError>;

impl RainmeasError {
    /// Create a network error from any error type
    pub fn network<E>(message: String, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            message,
            source: Some(Box::new(source)),
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RainmeasError::Network { .. } | RainmeasError::Io { .. })
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            RainmeasError::NotFound { .. } => {
                Some("Check the package name spelling or browse the package list")
            },
            RainmeasError::Network { .. } => Some("Check your internet connection and try again"),
            RainmeasError::MissingParameter { .. } => {
                Some("Pass the package as a query, e.g. '?name=nurashadeweather'")
            },
            RainmeasError::ConfigValidation { .. } | RainmeasError::TomlParse { .. } => {
                Some("Fix rainmeas.toml or the RAINMEAS_* environment variables")
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = RainmeasError::NotFound {
            name: "missing".to_string(),
        };
        assert_eq!(err.to_string(), "Package 'missing' not found in registry");

        let err = RainmeasError::MissingParameter {
            name: "name".to_string(),
        };
        assert_eq!(err.to_string(), "Missing required parameter 'name'");
    }

    #[test]
    fn test_recoverable() {
        let network = RainmeasError::Network {
            message: "timeout".to_string(),
            source: None,
        };
        assert!(network.is_recoverable());
        assert!(!RainmeasError::parse("homepage URL").is_recoverable());
    }

    #[test]
    fn test_suggestions() {
        let err = RainmeasError::NotFound {
            name: "x".to_string(),
        };
        assert!(err.suggestion().is_some());
        assert!(RainmeasError::parse("body").suggestion().is_none());
    }
}
