// --- File: crates/detailing_booking/src/logic.rs ---
//! Pricing and request shaping for bookings.
//!
//! Everything here is pure; the handlers own the calendar and payment calls.

use chrono::{DateTime, Duration, Utc};
use detailing_common::services::{CheckoutRequest, NewCalendarEvent};
use detailing_config::CatalogConfig;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::BookingError;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Customer {
    #[cfg_attr(feature = "openapi", schema(example = "Jane Muster"))]
    pub name: String,
    #[cfg_attr(feature = "openapi", schema(example = "jane@example.com"))]
    pub email: String,
    pub phone: Option<String>,
}

/// Booking payload from the booking page.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingRequest {
    #[cfg_attr(feature = "openapi", schema(example = "suv"))]
    pub vehicle_class: String,
    #[cfg_attr(feature = "openapi", schema(example = "full"))]
    pub package_id: String,
    #[serde(default)]
    pub option_ids: Vec<String>,
    /// Slot start, RFC 3339
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-06T09:00:00+02:00"))]
    pub date_time: String,
    pub customer: Customer,
    /// Where the vehicle will be detailed
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Quote {
    /// Total in the smallest currency unit
    pub amount: i64,
    pub currency: String,
    pub package_name: String,
    pub vehicle_class_name: String,
    pub option_names: Vec<String>,
    /// One-line summary, e.g. "Full detail (SUV) + Pet hair removal"
    pub description: String,
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingResponse {
    #[cfg_attr(feature = "openapi", schema(example = "5k2v0c8h1q9..."))]
    pub booking_id: String,
    #[cfg_attr(feature = "openapi", schema(example = "Booking confirmed for 2025-05-06 09:00"))]
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CheckoutResponse {
    #[cfg_attr(
        feature = "openapi",
        schema(example = "https://checkout.stripe.com/c/pay/cs_test_a1...")
    )]
    pub url: String,
    #[cfg_attr(feature = "openapi", schema(example = "cs_test_a1..."))]
    pub session_id: String,
}

/// Resolves catalog ids and sums the package price for the vehicle class plus option prices.
pub fn price_booking(catalog: &CatalogConfig, request: &BookingRequest) -> Result<Quote, BookingError> {
    let vehicle_class = catalog
        .vehicle_classes
        .iter()
        .find(|v| v.id == request.vehicle_class)
        .ok_or_else(|| BookingError::UnknownVehicleClass(request.vehicle_class.clone()))?;

    let package = catalog
        .packages
        .iter()
        .find(|p| p.id == request.package_id)
        .ok_or_else(|| BookingError::UnknownPackage(request.package_id.clone()))?;

    let base = *package
        .prices
        .get(&vehicle_class.id)
        .ok_or_else(|| BookingError::NotOffered {
            package: package.id.clone(),
            vehicle_class: vehicle_class.id.clone(),
        })?;

    let mut seen = HashSet::new();
    let mut amount = base;
    let mut option_names = Vec::with_capacity(request.option_ids.len());
    for option_id in &request.option_ids {
        if !seen.insert(option_id.as_str()) {
            return Err(BookingError::Validation(format!(
                "Option {} listed more than once",
                option_id
            )));
        }
        let option = catalog
            .options
            .iter()
            .find(|o| &o.id == option_id)
            .ok_or_else(|| BookingError::UnknownOption(option_id.clone()))?;
        amount += option.price;
        option_names.push(option.name.clone());
    }

    let mut description = format!("{} ({})", package.name, vehicle_class.name);
    if !option_names.is_empty() {
        description.push_str(" + ");
        description.push_str(&option_names.join(", "));
    }

    Ok(Quote {
        amount,
        currency: catalog.currency.to_lowercase(),
        package_name: package.name.clone(),
        vehicle_class_name: vehicle_class.name.clone(),
        option_names,
        description,
    })
}

/// Checks the customer fields and returns the requested slot start.
pub fn validate_request(request: &BookingRequest) -> Result<DateTime<Utc>, BookingError> {
    if request.customer.name.trim().is_empty() {
        return Err(BookingError::Validation("Customer name is required".to_string()));
    }
    if !looks_like_email(&request.customer.email) {
        return Err(BookingError::Validation(format!(
            "Invalid email address: {}",
            request.customer.email
        )));
    }
    DateTime::parse_from_rfc3339(&request.date_time)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            BookingError::Validation(format!(
                "Invalid date_time '{}', expected RFC 3339",
                request.date_time
            ))
        })
}

fn looks_like_email(email: &str) -> bool {
    match email.trim().split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.trim().contains(char::is_whitespace)
        }
        None => false,
    }
}

/// "CHF 249.00"
pub fn format_amount(amount: i64, currency: &str) -> String {
    format!(
        "{} {}.{:02}",
        currency.to_uppercase(),
        amount / 100,
        (amount % 100).abs()
    )
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Calendar entry for a confirmed booking.
pub fn booking_event(
    request: &BookingRequest,
    quote: &Quote,
    start: DateTime<Utc>,
    duration: Duration,
) -> NewCalendarEvent {
    let mut lines = vec![
        format!("Customer: {}", request.customer.name.trim()),
        format!("Email: {}", request.customer.email.trim()),
    ];
    if let Some(phone) = non_blank(&request.customer.phone) {
        lines.push(format!("Phone: {}", phone));
    }
    lines.push(format!("Vehicle: {}", quote.vehicle_class_name));
    lines.push(format!("Package: {}", quote.package_name));
    if !quote.option_names.is_empty() {
        lines.push(format!("Options: {}", quote.option_names.join(", ")));
    }
    lines.push(format!("Price: {}", format_amount(quote.amount, &quote.currency)));
    if let Some(notes) = non_blank(&request.notes) {
        lines.push(format!("Notes: {}", notes));
    }

    NewCalendarEvent {
        start,
        end: start + duration,
        summary: format!("{} - {}", quote.package_name, request.customer.name.trim()),
        description: Some(lines.join("\n")),
        location: non_blank(&request.location).map(str::to_string),
    }
}

/// Checkout session request carrying the booking details as metadata.
pub fn checkout_request(
    request: &BookingRequest,
    quote: &Quote,
    start: DateTime<Utc>,
    slot_label: &str,
    reference: &str,
) -> CheckoutRequest {
    let mut metadata = HashMap::from([
        ("slot".to_string(), start.to_rfc3339()),
        ("package_id".to_string(), request.package_id.clone()),
        ("vehicle_class".to_string(), request.vehicle_class.clone()),
        ("customer_email".to_string(), request.customer.email.trim().to_string()),
        ("customer_name".to_string(), request.customer.name.trim().to_string()),
    ]);
    if !request.option_ids.is_empty() {
        metadata.insert("option_ids".to_string(), request.option_ids.join(","));
    }
    if let Some(location) = non_blank(&request.location) {
        metadata.insert("location".to_string(), location.to_string());
    }

    CheckoutRequest {
        amount: quote.amount,
        currency: quote.currency.clone(),
        product_name: quote.description.clone(),
        description: Some(format!("Appointment {}", slot_label)),
        customer_email: Some(request.customer.email.trim().to_string()),
        client_reference_id: Some(reference.to_string()),
        metadata,
    }
}
