//! Error types and handling for the `TripAI` application

use thiserror::Error;

/// Main error type for the `TripAI` application
#[derive(Error, Debug)]
pub enum TripAiError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Trip request failed validation before any network call
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Model API communication errors (network, timeout, non-success status)
    #[error("Model request failed: {message}")]
    Request {
        message: String,
        status: Option<u16>,
    },

    /// The model response contained no usable itinerary
    #[error("Unusable model response: {message}")]
    Parse { message: String },

    /// Document export errors
    #[error("Export error: {message}")]
    Export { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl TripAiError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new request error without an HTTP status
    pub fn request<S: Into<String>>(message: S) -> Self {
        Self::Request {
            message: message.into(),
            status: None,
        }
    }

    /// Create a new request error for a non-success HTTP status
    pub fn request_status<S: Into<String>>(message: S, status: u16) -> Self {
        Self::Request {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new export error
    pub fn export<S: Into<String>>(message: S) -> Self {
        Self::Export {
            message: message.into(),
        }
    }

    /// Short machine-readable name of the error kind
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            TripAiError::Config { .. } => "config",
            TripAiError::Validation { .. } => "validation",
            TripAiError::Request { .. } => "request",
            TripAiError::Parse { .. } => "parse",
            TripAiError::Export { .. } => "export",
            TripAiError::Io { .. } => "io",
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TripAiError::Config { .. } => {
                "Configuration error. Please check your config file and API key.".to_string()
            }
            TripAiError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            TripAiError::Request { status: Some(status), .. } => {
                format!(
                    "The itinerary service answered with HTTP {status}. Please try again."
                )
            }
            TripAiError::Request { status: None, .. } => {
                "Unable to reach the itinerary service. Please check your connection and try again."
                    .to_string()
            }
            TripAiError::Parse { .. } => {
                "The itinerary service returned a response we could not understand. Please try again."
                    .to_string()
            }
            TripAiError::Export { message } => format!("Could not create the document: {message}"),
            TripAiError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = TripAiError::config("missing API key");
        assert!(matches!(config_err, TripAiError::Config { .. }));

        let request_err = TripAiError::request_status("server error", 500);
        assert!(matches!(
            request_err,
            TripAiError::Request {
                status: Some(500),
                ..
            }
        ));

        let validation_err = TripAiError::validation("destination is empty");
        assert!(matches!(validation_err, TripAiError::Validation { .. }));
        assert_eq!(validation_err.kind(), "validation");
    }

    #[test]
    fn test_user_messages() {
        let config_err = TripAiError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let request_err = TripAiError::request_status("test", 503);
        assert!(request_err.user_message().contains("HTTP 503"));

        let offline_err = TripAiError::request("timed out");
        assert!(offline_err.user_message().contains("Unable to reach"));

        let validation_err = TripAiError::validation("budget must be positive");
        assert!(validation_err.user_message().contains("budget must be positive"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let trip_err: TripAiError = io_err.into();
        assert!(matches!(trip_err, TripAiError::Io { .. }));
        assert_eq!(trip_err.kind(), "io");
    }
}
