// --- File: crates/detailing_stripe/src/logic.rs ---
use detailing_common::services::CheckoutRequest;
use detailing_config::StripeConfig;
use serde::Deserialize;

use crate::error::StripeError;

pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";

#[derive(Deserialize, Debug)]
pub struct StripeCheckoutSessionApiResponse {
    pub id: String,
    pub url: Option<String>,
}

/// Builds the `application/x-www-form-urlencoded` body for `POST /v1/checkout/sessions`.
pub fn checkout_form(
    stripe_config: &StripeConfig,
    request: &CheckoutRequest,
) -> Result<Vec<(String, String)>, StripeError> {
    if request.amount <= 0 {
        return Err(StripeError::InvalidRequest(format!(
            "Amount must be positive, got {}",
            request.amount
        )));
    }
    if request.product_name.trim().is_empty() {
        return Err(StripeError::InvalidRequest(
            "Product name must not be empty".to_string(),
        ));
    }

    let currency = if request.currency.trim().is_empty() {
        stripe_config
            .default_currency
            .clone()
            .unwrap_or_else(|| "chf".to_string())
    } else {
        request.currency.clone()
    }
    .to_lowercase();

    let mut form_body: Vec<(String, String)> = vec![
        ("payment_method_types[]".to_string(), "card".to_string()),
        ("mode".to_string(), "payment".to_string()),
        ("success_url".to_string(), stripe_config.success_url.clone()),
        ("cancel_url".to_string(), stripe_config.cancel_url.clone()),
        ("line_items[0][price_data][currency]".to_string(), currency),
        (
            "line_items[0][price_data][product_data][name]".to_string(),
            request.product_name.clone(),
        ),
        (
            "line_items[0][price_data][unit_amount]".to_string(),
            request.amount.to_string(),
        ),
        ("line_items[0][quantity]".to_string(), "1".to_string()),
    ];
    if let Some(description) = &request.description {
        form_body.push((
            "line_items[0][price_data][product_data][description]".to_string(),
            description.clone(),
        ));
    }
    if let Some(email) = &request.customer_email {
        form_body.push(("customer_email".to_string(), email.clone()));
    }
    if let Some(client_ref_id) = &request.client_reference_id {
        form_body.push(("client_reference_id".to_string(), client_ref_id.clone()));
    }

    // Sorted so the body is stable for a given request
    let mut metadata: Vec<_> = request.metadata.iter().collect();
    metadata.sort();
    for (key, value) in metadata {
        form_body.push((format!("metadata[{}]", key), value.clone()));
    }

    Ok(form_body)
}

/// Pulls `error.message` out of a Stripe error body, falling back to the raw text.
pub fn error_message(body_text: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body_text)
        .ok()
        .and_then(|json_body| {
            json_body
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body_text.to_string())
}
