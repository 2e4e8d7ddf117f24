// File: crates/detailing_booking/src/handlers.rs
use axum::{extract::State, http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use detailing_availability::AvailabilityService;
use detailing_common::services::{DynCalendarService, DynPaymentService};
use detailing_common::DetailingError;
use detailing_config::CatalogConfig;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::BookingError;
use crate::logic::{
    booking_event, checkout_request, price_booking, validate_request, BookingRequest,
    BookingResponse, CheckoutResponse, Quote,
};

// Shared state needed by the booking handlers
#[derive(Clone)]
pub struct BookingState {
    pub availability: Arc<AvailabilityService>,
    pub calendar: DynCalendarService,
    /// `None` when online payment is switched off.
    pub payments: Option<DynPaymentService>,
    pub catalog: Arc<CatalogConfig>,
}

/// Validates, prices and re-checks the slot. Shared by both booking paths.
async fn prepare(
    state: &BookingState,
    request: &BookingRequest,
    now: DateTime<Utc>,
) -> Result<(DateTime<Utc>, Quote), BookingError> {
    let start = validate_request(request)?;
    let quote = price_booking(&state.catalog, request)?;

    let free = state
        .availability
        .is_slot_available(start, request.location.as_deref(), now)
        .await?;
    if !free {
        info!("Slot {} rejected: not available", start);
        return Err(BookingError::SlotTaken);
    }
    Ok((start, quote))
}

fn slot_label(state: &BookingState, start: DateTime<Utc>) -> String {
    start
        .with_timezone(&state.availability.policy().time_zone)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// Returns the configured catalog.
#[axum::debug_handler]
pub async fn get_catalog_handler(State(state): State<Arc<BookingState>>) -> Json<CatalogConfig> {
    Json(state.catalog.as_ref().clone())
}

/// Books a slot directly: re-checks availability, then writes the calendar event.
#[axum::debug_handler]
pub async fn create_booking_handler(
    State(state): State<Arc<BookingState>>,
    Json(request): Json<BookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), DetailingError> {
    let (start, quote) = prepare(&state, &request, Utc::now()).await?;

    let calendar_id = &state.availability.settings().calendar_id;
    let duration = state.availability.policy().appointment_duration;
    let event = booking_event(&request, &quote, start, duration);

    let created = state
        .calendar
        .create_event(calendar_id, event)
        .await
        .map_err(|e| {
            if e.is_slot_taken() {
                BookingError::SlotTaken
            } else {
                error!("Failed to create calendar event: {}", e);
                BookingError::Calendar(e.to_string())
            }
        })?;

    // Later availability reads must see the new event
    state.availability.forget_cached_events().await;

    let booking_id = created.event_id.unwrap_or_else(|| {
        warn!("Calendar returned no event id, issuing a local one");
        uuid::Uuid::new_v4().to_string()
    });
    let label = slot_label(&state, start);
    info!(
        "Booked {} for {} at {} ({})",
        quote.description, request.customer.email, label, booking_id
    );

    Ok((
        StatusCode::CREATED,
        Json(BookingResponse {
            booking_id,
            message: format!("Booking confirmed for {}", label),
        }),
    ))
}

/// Starts a hosted checkout for the booking. The slot is not reserved until payment.
#[axum::debug_handler]
pub async fn create_checkout_handler(
    State(state): State<Arc<BookingState>>,
    Json(request): Json<BookingRequest>,
) -> Result<Json<CheckoutResponse>, DetailingError> {
    let payments = state
        .payments
        .as_ref()
        .ok_or(BookingError::PaymentsDisabled)?;
    let (start, quote) = prepare(&state, &request, Utc::now()).await?;

    let reference = uuid::Uuid::new_v4().to_string();
    let checkout = checkout_request(&request, &quote, start, &slot_label(&state, start), &reference);

    let session = payments
        .create_checkout_session(checkout)
        .await
        .map_err(|e| {
            error!("Failed to create checkout session: {}", e);
            BookingError::Payment(e.to_string())
        })?;

    info!(
        "Checkout session {} created for {} ({})",
        session.id, request.customer.email, reference
    );
    Ok(Json(CheckoutResponse {
        url: session.url,
        session_id: session.id,
    }))
}
