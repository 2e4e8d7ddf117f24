// --- File: crates/detailing_booking/src/routes.rs ---

use crate::handlers::{
    create_booking_handler, create_checkout_handler, get_catalog_handler, BookingState,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Creates a router containing the catalog and booking routes.
pub fn routes(state: Arc<BookingState>) -> Router {
    Router::new()
        .route("/catalog", get(get_catalog_handler))
        .route("/bookings", post(create_booking_handler))
        .route("/bookings/checkout", post(create_checkout_handler))
        .with_state(state)
}
