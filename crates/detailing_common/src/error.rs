use std::fmt;
use thiserror::Error;

/// The base error type shared by all detailing crates.
///
/// Each crate converts its own error enum into this one via `From`, which gives
/// handlers a single type to map onto HTTP responses.
#[derive(Error, Debug)]
pub enum DetailingError {
    /// Error occurred during an HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to a conflict (e.g., slot already taken)
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Error occurred due to a timeout
    #[error("Timeout: {0}")]
    TimeoutError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for DetailingError {
    fn status_code(&self) -> u16 {
        match self {
            DetailingError::HttpError(_) => 500,
            DetailingError::ParseError(_) => 400,
            DetailingError::ConfigError(_) => 500,
            DetailingError::ValidationError(_) => 400,
            DetailingError::ExternalServiceError { .. } => 502,
            DetailingError::ConflictError(_) => 409,
            DetailingError::TimeoutError(_) => 504,
            DetailingError::InternalError(_) => 500,
        }
    }
}

impl DetailingError {
    /// Message safe to show to end users.
    ///
    /// Client errors carry their own text; server-side failures collapse to a
    /// generic sentence so upstream details never leak into the booking UI.
    pub fn public_message(&self) -> String {
        match self {
            DetailingError::ParseError(_)
            | DetailingError::ValidationError(_)
            | DetailingError::ConflictError(_) => self.to_string(),
            DetailingError::TimeoutError(_) => {
                "The request timed out. Please try again.".to_string()
            }
            _ => "Something went wrong. Please try again later.".to_string(),
        }
    }
}

// Common error conversions
impl From<reqwest::Error> for DetailingError {
    fn from(err: reqwest::Error) -> Self {
        DetailingError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for DetailingError {
    fn from(err: serde_json::Error) -> Self {
        DetailingError::ParseError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> DetailingError {
    DetailingError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> DetailingError {
    DetailingError::ValidationError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> DetailingError {
    DetailingError::ConflictError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> DetailingError {
    DetailingError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}
