// --- File: crates/detailing_maps/src/error.rs ---
use detailing_common::{external_service_error, DetailingError};
use thiserror::Error;

/// Errors from the Distance Matrix API.
#[derive(Error, Debug)]
pub enum MapsError {
    /// Transport failure or non-2xx response
    #[error("Distance Matrix request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Top-level status other than OK (e.g. REQUEST_DENIED, OVER_QUERY_LIMIT)
    #[error("Distance Matrix returned {status}: {message}")]
    ApiError { status: String, message: String },

    /// The single route element could not be resolved (NOT_FOUND, ZERO_RESULTS)
    #[error("No route from '{origin}' to '{destination}': {status}")]
    NoRoute {
        origin: String,
        destination: String,
        status: String,
    },

    #[error("Failed to parse Distance Matrix response: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Distance Matrix configuration error: {0}")]
    ConfigError(String),
}

impl From<MapsError> for DetailingError {
    fn from(err: MapsError) -> Self {
        match err {
            MapsError::ConfigError(msg) => DetailingError::ConfigError(msg),
            MapsError::ParseError(e) => DetailingError::ParseError(e.to_string()),
            other => external_service_error("Distance Matrix", other.to_string()),
        }
    }
}
