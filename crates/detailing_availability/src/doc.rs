// File: crates/detailing_availability/src/doc.rs

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::handlers::{AvailabilityQuery, SlotView};

#[utoipa::path(
    get,
    path = "/availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Candidate slots in chronological order", body = [SlotView],
         example = json!([
             { "time": "08:00", "dateTime": "2025-05-06T08:00:00+02:00", "isAvailable": true },
             { "time": "08:30", "dateTime": "2025-05-06T08:30:00+02:00", "isAvailable": false }
         ])
        ),
        (status = 400, description = "Invalid date or range",
         example = json!({ "error": { "message": "Validation error: Invalid date 'tomorrow', expected YYYY-MM-DD", "code": 400 } })
        ),
        (status = 500, description = "Calendar unavailable",
         example = json!({ "error": { "message": "Something went wrong. Please try again later.", "code": 500 } })
        )
    ),
    tag = "availability"
)]
fn doc_get_availability_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(doc_get_availability_handler),
    components(schemas(AvailabilityQuery, SlotView)),
    tags(
        (name = "availability", description = "Appointment slot availability")
    ),
    servers(
        (url = "/api", description = "Detailing booking API")
    )
)]
pub struct AvailabilityApiDoc;
