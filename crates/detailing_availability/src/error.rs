// --- File: crates/detailing_availability/src/error.rs ---
use chrono::{DateTime, Utc};
use detailing_common::DetailingError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityError {
    #[error("Invalid interval: start {start} is not before end {end}")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("{0} did not answer in time")]
    Timeout(String),
    #[error("{service} unavailable: {message}")]
    UpstreamUnavailable { service: String, message: String },
    #[error("Missing or invalid configuration: {0}")]
    ConfigurationMissing(String),
}

impl AvailabilityError {
    pub fn upstream(service: &str, message: impl ToString) -> Self {
        AvailabilityError::UpstreamUnavailable {
            service: service.to_string(),
            message: message.to_string(),
        }
    }
}

// Upstream failures become a plain 500 so no provider detail reaches the client.
impl From<AvailabilityError> for DetailingError {
    fn from(err: AvailabilityError) -> Self {
        match err {
            AvailabilityError::InvalidInterval { .. } | AvailabilityError::InvalidDate(_) => {
                DetailingError::ValidationError(err.to_string())
            }
            AvailabilityError::Timeout(_) => DetailingError::TimeoutError(err.to_string()),
            AvailabilityError::UpstreamUnavailable { .. } => {
                DetailingError::InternalError(err.to_string())
            }
            AvailabilityError::ConfigurationMissing(_) => {
                DetailingError::ConfigError(err.to_string())
            }
        }
    }
}
