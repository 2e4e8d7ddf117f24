// --- File: crates/detailing_stripe/src/error.rs ---
use detailing_common::{external_service_error, DetailingError};
use thiserror::Error;

/// Stripe-specific error types.
#[derive(Error, Debug)]
pub enum StripeError {
    /// Error occurred during a Stripe API request
    #[error("Stripe API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Error returned by the Stripe API
    #[error("Stripe API returned an error: {message} (Status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// Error parsing Stripe API response
    #[error("Failed to parse Stripe API response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing or incomplete Stripe configuration
    #[error("Stripe configuration missing or incomplete: {0}")]
    ConfigError(String),

    /// The checkout request itself is unusable
    #[error("Invalid checkout request: {0}")]
    InvalidRequest(String),

    /// Stripe answered 2xx without a redirect URL
    #[error("Stripe response missing checkout URL")]
    MissingCheckoutUrl,
}

impl From<StripeError> for DetailingError {
    fn from(err: StripeError) -> Self {
        match err {
            StripeError::RequestError(e) => {
                DetailingError::HttpError(format!("Stripe request error: {}", e))
            }
            StripeError::ApiError {
                status_code,
                message,
            } => external_service_error(
                "Stripe API",
                format!("Status: {}, Message: {}", status_code, message),
            ),
            StripeError::ParseError(e) => {
                DetailingError::ParseError(format!("Stripe response parse error: {}", e))
            }
            StripeError::ConfigError(msg) => DetailingError::ConfigError(msg),
            StripeError::InvalidRequest(msg) => DetailingError::ValidationError(msg),
            StripeError::MissingCheckoutUrl => {
                external_service_error("Stripe API", "response missing checkout URL")
            }
        }
    }
}
