// --- File: crates/detailing_stripe/src/service.rs ---
use detailing_common::services::{BoxFuture, CheckoutRequest, CheckoutSession, PaymentService};
use detailing_common::HTTP_CLIENT;
use detailing_config::StripeConfig;
use std::env;
use tracing::{info, warn};

use crate::error::StripeError;
use crate::logic::{
    checkout_form, error_message, StripeCheckoutSessionApiResponse, DEFAULT_API_BASE,
};

/// Hosted Stripe Checkout sessions.
pub struct StripeCheckoutService {
    config: StripeConfig,
    secret_key: String,
    api_base: String,
}

impl StripeCheckoutService {
    /// The secret comes from `stripe.secret_key`, else from `STRIPE_SECRET_KEY`.
    pub fn new(config: StripeConfig) -> Result<Self, StripeError> {
        let secret_key = config
            .secret_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| env::var("STRIPE_SECRET_KEY").ok())
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| StripeError::ConfigError("STRIPE_SECRET_KEY is not set".to_string()))?;

        if config.success_url.trim().is_empty() || config.cancel_url.trim().is_empty() {
            return Err(StripeError::ConfigError(
                "stripe.success_url and stripe.cancel_url are required".to_string(),
            ));
        }

        let api_base = config
            .api_base
            .clone()
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        Ok(Self {
            config,
            secret_key,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    async fn post_session(&self, request: CheckoutRequest) -> Result<CheckoutSession, StripeError> {
        let form_body = checkout_form(&self.config, &request)?;
        let api_url = format!("{}/v1/checkout/sessions", self.api_base);

        info!(
            "[Stripe] Creating Checkout Session for {:?} ({} {})",
            request.client_reference_id, request.amount, request.currency
        );

        let response = HTTP_CLIENT
            .post(&api_url)
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&form_body)
            .send()
            .await?;

        let status = response.status();
        let body_text = response.text().await?;

        if !status.is_success() {
            let message = error_message(&body_text);
            warn!(
                "[Stripe] Checkout request failed with HTTP status: {}. Message: {}",
                status, message
            );
            return Err(StripeError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let session: StripeCheckoutSessionApiResponse = serde_json::from_str(&body_text)?;
        let url = session.url.ok_or(StripeError::MissingCheckoutUrl)?;
        info!("[Stripe] Checkout Session {} created", session.id);

        Ok(CheckoutSession {
            id: session.id,
            url,
        })
    }
}

impl PaymentService for StripeCheckoutService {
    type Error = StripeError;

    fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> BoxFuture<'_, CheckoutSession, Self::Error> {
        Box::pin(self.post_session(request))
    }
}
