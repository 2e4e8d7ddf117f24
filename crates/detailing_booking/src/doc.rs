// File: crates/detailing_booking/src/doc.rs

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::logic::{BookingRequest, BookingResponse, CheckoutResponse, Customer, Quote};
use detailing_config::{AddOnOption, CatalogConfig, DetailingPackage, VehicleClass};

#[utoipa::path(
    get,
    path = "/catalog",
    responses(
        (status = 200, description = "Vehicle classes, packages and add-on options", body = CatalogConfig)
    ),
    tag = "booking"
)]
fn doc_get_catalog_handler() {}

#[utoipa::path(
    post,
    path = "/bookings",
    request_body = BookingRequest,
    responses(
        (status = 201, description = "Booking written to the calendar", body = BookingResponse),
        (status = 400, description = "Invalid payload or unknown catalog id",
         example = json!({ "error": { "message": "Validation error: Unknown package: gold", "code": 400 } })
        ),
        (status = 409, description = "Slot no longer available",
         example = json!({ "error": { "message": "Conflict: The requested time slot is no longer available", "code": 409 } })
        ),
        (status = 500, description = "Calendar unavailable")
    ),
    tag = "booking"
)]
fn doc_create_booking_handler() {}

#[utoipa::path(
    post,
    path = "/bookings/checkout",
    request_body = BookingRequest,
    responses(
        (status = 200, description = "Checkout session created; redirect the customer to `url`", body = CheckoutResponse),
        (status = 400, description = "Invalid payload or unknown catalog id"),
        (status = 409, description = "Slot no longer available"),
        (status = 502, description = "Payment provider error")
    ),
    tag = "booking"
)]
fn doc_create_checkout_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_get_catalog_handler,
        doc_create_booking_handler,
        doc_create_checkout_handler
    ),
    components(schemas(
        BookingRequest,
        BookingResponse,
        CheckoutResponse,
        Customer,
        Quote,
        CatalogConfig,
        VehicleClass,
        DetailingPackage,
        AddOnOption
    )),
    tags(
        (name = "booking", description = "Catalog, direct booking and checkout")
    ),
    servers(
        (url = "/api", description = "Detailing booking API")
    )
)]
pub struct BookingApiDoc;
